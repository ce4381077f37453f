//! Error types for position loading and notation parsing.

use std::fmt;

/// Errors produced when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// The string does not have exactly 6 space-separated fields.
    WrongFieldCount {
        /// Number of fields found.
        found: usize,
    },
    /// The placement field does not have exactly 8 `/`-separated ranks.
    WrongRankCount {
        /// Number of ranks found.
        found: usize,
    },
    /// A placement rank describes more or fewer than 8 squares.
    BadRankLength {
        /// Zero-based index into the placement field (0 = rank 8).
        rank_index: usize,
        /// Number of squares the rank described.
        length: usize,
    },
    /// An unrecognized character in the placement field.
    InvalidPieceChar {
        /// The offending character.
        character: char,
    },
    /// The active-color field is not `w` or `b`.
    InvalidColor {
        /// The field as written.
        found: String,
    },
    /// An unrecognized character in the castling field.
    InvalidCastlingChar {
        /// The offending character.
        character: char,
    },
    /// The en-passant field is not `-` or an algebraic square on rank 3 or 6.
    InvalidEnPassant {
        /// The field as written.
        found: String,
    },
    /// A move counter is not a non-negative number.
    InvalidMoveCounter {
        /// Which counter ("halfmove clock" or "fullmove number").
        field: &'static str,
        /// The field as written.
        found: String,
    },
    /// The placement parsed but fails structural validation.
    InvalidPosition {
        /// The underlying validation error.
        source: PositionError,
    },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount { found } => {
                write!(f, "expected 6 FEN fields, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "expected 8 ranks in piece placement, found {found}")
            }
            FenError::BadRankLength { rank_index, length } => {
                write!(f, "placement rank {rank_index} describes {length} squares, expected 8")
            }
            FenError::InvalidPieceChar { character } => {
                write!(f, "invalid piece character: '{character}'")
            }
            FenError::InvalidColor { found } => {
                write!(f, "invalid active color: \"{found}\"")
            }
            FenError::InvalidCastlingChar { character } => {
                write!(f, "invalid castling character: '{character}'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "invalid en passant square: \"{found}\"")
            }
            FenError::InvalidMoveCounter { field, found } => {
                write!(f, "invalid {field}: \"{found}\"")
            }
            FenError::InvalidPosition { source } => {
                write!(f, "invalid position: {source}")
            }
        }
    }
}

impl std::error::Error for FenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FenError::InvalidPosition { source } => Some(source),
            _ => None,
        }
    }
}

impl From<PositionError> for FenError {
    fn from(source: PositionError) -> Self {
        FenError::InvalidPosition { source }
    }
}

/// Structural validation failures for a [`Position`](crate::position::Position).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// A side does not have exactly one king.
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount {
        /// Which side.
        color: &'static str,
        /// Number of kings found.
        count: u32,
    },
    /// A pawn sits on rank 1 or rank 8.
    #[error("pawns found on a back rank")]
    PawnsOnBackRank,
    /// Two piece bitboards claim the same square.
    #[error("overlapping piece bitboards")]
    OverlappingPieces,
    /// A side bitboard disagrees with the union of its piece bitboards.
    #[error("side bitboard inconsistent with piece bitboards")]
    InconsistentSides,
    /// The square-indexed array disagrees with the bitboards.
    #[error("square array inconsistent with bitboards at {square}")]
    InconsistentSquares {
        /// The square in algebraic form.
        square: String,
    },
    /// The en-passant square is not on the capture rank for the side to move.
    #[error("en passant square {square} not on a valid rank")]
    InvalidEnPassantRank {
        /// The square in algebraic form.
        square: String,
    },
}

/// Errors from resolving short algebraic notation against a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanError {
    /// The string is not recognizable SAN.
    #[error("unparsable SAN: \"{text}\"")]
    Unparsable {
        /// The input as written.
        text: String,
    },
    /// No legal move in the position matches.
    #[error("no legal move matches \"{text}\"")]
    NoMatch {
        /// The input as written.
        text: String,
    },
    /// More than one legal move matches; a disambiguator is required.
    #[error("\"{text}\" is ambiguous in this position")]
    Ambiguous {
        /// The input as written.
        text: String,
    },
}
