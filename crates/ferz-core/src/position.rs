//! Position state: piece placement, side to move, castling, en passant,
//! move counters, hash, and the undo stack for make/unmake.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::PositionError;
use crate::fen::STARTING_FEN;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::rank::Rank;
use crate::square::Square;
use crate::zobrist;

/// Everything needed to reverse one made move exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Undo {
    pub(crate) mv: Move,
    /// The captured piece and the square it stood on (which differs from the
    /// move's destination for en passant).
    pub(crate) captured: Option<(Piece, Square)>,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) hash: u64,
}

/// A complete chess position.
///
/// A `Position` owns its undo stack and is therefore a single-threaded
/// object; give each worker its own clone. The attack tables it reads are
/// immutable and shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece bitboards indexed `[Color::index()][PieceKind::index()]`.
    pieces: [[Bitboard; PieceKind::COUNT]; Color::COUNT],
    /// Per-side occupancy; always the union of that side's piece bitboards.
    sides: [Bitboard; Color::COUNT],
    /// Union of both sides, cached.
    occupied: Bitboard,
    /// Square-indexed inverse of the bitboards.
    squares: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
    castling: CastleRights,
    /// Capture square for an en-passant reply, set by a double pawn push.
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
    undo_stack: Vec<Undo>,
}

impl Position {
    /// The standard starting position.
    pub fn starting_position() -> Position {
        STARTING_FEN.parse().expect("starting FEN is well-formed")
    }

    /// Assemble a position from parsed parts. The caller (FEN parsing)
    /// supplies a consistent placement; `validate` is run separately.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        pieces: [[Bitboard; PieceKind::COUNT]; Color::COUNT],
        squares: [Option<Piece>; Square::COUNT],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Position {
        let mut sides = [Bitboard::EMPTY; Color::COUNT];
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                sides[color.index()] |= pieces[color.index()][kind.index()];
            }
        }
        let occupied = sides[0] | sides[1];

        let mut pos = Position {
            pieces,
            sides,
            occupied,
            squares,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            undo_stack: Vec::new(),
        };
        pos.hash = zobrist::hash_from_scratch(&pos);
        pos
    }

    /// Bitboard of one side's pieces of one kind.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    /// Bitboard of all of one side's pieces.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// Bitboard of every occupied square.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// The piece on `sq`, if any.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// The king square of `color`.
    ///
    /// # Panics
    ///
    /// Panics if the side has no king, which [`Position::validate`] rules out
    /// for every constructed position.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, PieceKind::King)
            .lsb()
            .expect("each side has exactly one king")
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Zobrist hash of the position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Number of made-but-not-unmade moves.
    #[inline]
    pub fn ply_from_root(&self) -> usize {
        self.undo_stack.len()
    }

    // --- Mutators used by make/unmake ---

    /// XOR a piece into or out of the board. The `squares` entry flips between
    /// `Some(piece)` and `None` in lockstep with the bitboards.
    #[inline]
    pub(crate) fn toggle_piece(&mut self, sq: Square, piece: Piece) {
        let mask = sq.bitboard();
        let (color, kind) = (piece.color(), piece.kind());
        self.pieces[color.index()][kind.index()] ^= mask;
        self.sides[color.index()] ^= mask;
        self.occupied ^= mask;
        self.squares[sq.index()] = match self.squares[sq.index()] {
            Some(_) => None,
            None => Some(piece),
        };
        self.hash ^= zobrist::KEYS.piece_square[piece.index()][sq.index()];
    }

    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    #[inline]
    pub(crate) fn set_halfmove_clock(&mut self, clock: u16) {
        self.halfmove_clock = clock;
    }

    #[inline]
    pub(crate) fn set_fullmove_number(&mut self, number: u16) {
        self.fullmove_number = number;
    }

    #[inline]
    pub(crate) fn xor_hash(&mut self, key: u64) {
        self.hash ^= key;
    }

    #[inline]
    pub(crate) fn set_hash(&mut self, hash: u64) {
        self.hash = hash;
    }

    #[inline]
    pub(crate) fn push_undo(&mut self, undo: Undo) {
        self.undo_stack.push(undo);
    }

    #[inline]
    pub(crate) fn pop_undo(&mut self) -> Option<Undo> {
        self.undo_stack.pop()
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), PositionError> {
        for color in Color::ALL {
            let kings = self.pieces(color, PieceKind::King).count();
            if kings != 1 {
                return Err(PositionError::InvalidKingCount {
                    color: match color {
                        Color::White => "white",
                        Color::Black => "black",
                    },
                    count: kings,
                });
            }
        }

        let pawns = self.pieces(Color::White, PieceKind::Pawn)
            | self.pieces(Color::Black, PieceKind::Pawn);
        if (pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).any() {
            return Err(PositionError::PawnsOnBackRank);
        }

        // Every pair of piece bitboards must be disjoint, and each side
        // bitboard must be exactly the union of its piece bitboards.
        let mut seen = Bitboard::EMPTY;
        for color in Color::ALL {
            let mut union = Bitboard::EMPTY;
            for kind in PieceKind::ALL {
                let bb = self.pieces(color, kind);
                if (bb & seen).any() {
                    return Err(PositionError::OverlappingPieces);
                }
                seen |= bb;
                union |= bb;
            }
            if union != self.side(color) {
                return Err(PositionError::InconsistentSides);
            }
        }
        if self.occupied != (self.side(Color::White) | self.side(Color::Black)) {
            return Err(PositionError::InconsistentSides);
        }

        for sq in Square::all() {
            let from_bitboards = Color::ALL.into_iter().find_map(|color| {
                PieceKind::ALL
                    .into_iter()
                    .find(|&kind| self.pieces(color, kind).contains(sq))
                    .map(|kind| Piece::new(kind, color))
            });
            if from_bitboards != self.squares[sq.index()] {
                return Err(PositionError::InconsistentSquares {
                    square: sq.to_string(),
                });
            }
        }

        if let Some(ep) = self.en_passant {
            let expected = match self.side_to_move {
                Color::White => Rank::Rank6,
                Color::Black => Rank::Rank3,
            };
            if ep.rank() != expected {
                return Err(PositionError::InvalidEnPassantRank {
                    square: ep.to_string(),
                });
            }
        }

        Ok(())
    }

    /// A display wrapper that renders the board as an 8x8 grid.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

/// Renders the piece placement rank by rank, White at the bottom.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0u8..8 {
                let sq = Square::from_index(rank * 8 + file).unwrap();
                let c = match self.0.piece_on(sq) {
                    Some(piece) => piece.fen_char(),
                    None => '.',
                };
                write!(f, "{c}")?;
                if file < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use crate::color::Color;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    #[test]
    fn starting_position_is_valid() {
        Position::starting_position().validate().unwrap();
    }

    #[test]
    fn starting_position_placement() {
        let pos = Position::starting_position();
        assert_eq!(pos.piece_on(Square::E1), Some(Piece::WHITE_KING));
        assert_eq!(pos.piece_on(Square::D8), Some(Piece::BLACK_QUEEN));
        assert_eq!(pos.piece_on(Square::A1), Some(Piece::WHITE_ROOK));
        assert_eq!(pos.piece_on(Square::C7), Some(Piece::BLACK_PAWN));
        assert_eq!(pos.piece_on(Square::E4), None);
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.side(Color::White).count(), 16);
        assert_eq!(pos.side(Color::Black).count(), 16);
    }

    #[test]
    fn king_squares() {
        let pos = Position::starting_position();
        assert_eq!(pos.king_square(Color::White), Square::E1);
        assert_eq!(pos.king_square(Color::Black), Square::E8);
    }

    #[test]
    fn toggle_piece_keeps_arrays_in_sync() {
        let mut pos = Position::starting_position();
        pos.toggle_piece(Square::E2, Piece::WHITE_PAWN);
        assert_eq!(pos.piece_on(Square::E2), None);
        assert!(!pos.occupied().contains(Square::E2));

        pos.toggle_piece(Square::E4, Piece::WHITE_PAWN);
        assert_eq!(pos.piece_on(Square::E4), Some(Piece::WHITE_PAWN));
        assert!(pos.pieces(Color::White, PieceKind::Pawn).contains(Square::E4));

        // Restore and the full invariant check passes again.
        pos.toggle_piece(Square::E4, Piece::WHITE_PAWN);
        pos.toggle_piece(Square::E2, Piece::WHITE_PAWN);
        pos.validate().unwrap();
        assert_eq!(pos, Position::starting_position());
    }

    #[test]
    fn pretty_grid() {
        let rendered = format!("{}", Position::starting_position().pretty());
        assert!(rendered.contains("r n b q k b n r"));
        assert!(rendered.contains("R N B Q K B N R"));
        assert!(rendered.ends_with("a b c d e f g h"));
    }

    #[test]
    fn clone_is_equal_and_independent() {
        let pos = Position::starting_position();
        let copy = pos.clone();
        assert_eq!(pos, copy);
    }
}
