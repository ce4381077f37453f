//! FEN parsing and serialization for [`Position`].

use std::fmt;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// The standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut pieces = [[Bitboard::EMPTY; PieceKind::COUNT]; Color::COUNT];
        let mut squares = [None; Square::COUNT];

        // FEN lists rank 8 first.
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            let rank_base = (7 - rank_index) * 8;
            let mut file = 0usize;

            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    file += run as usize;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or(FenError::InvalidPieceChar { character: c })?;
                    if file >= 8 {
                        return Err(FenError::BadRankLength {
                            rank_index,
                            length: file + 1,
                        });
                    }
                    let sq = Square::from_index((rank_base + file) as u8).unwrap();
                    pieces[piece.color().index()][piece.kind().index()] =
                        pieces[piece.color().index()][piece.kind().index()].with(sq);
                    squares[sq.index()] = Some(piece);
                    file += 1;
                }
            }

            if file != 8 {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: file,
                });
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let castling = CastleRights::from_fen(fields[2])?;

        let en_passant = match fields[3] {
            "-" => None,
            s => Some(Square::from_algebraic(s).ok_or_else(|| FenError::InvalidEnPassant {
                found: s.to_string(),
            })?),
        };

        let halfmove_clock = fields[4]
            .parse::<u16>()
            .map_err(|_| FenError::InvalidMoveCounter {
                field: "halfmove clock",
                found: fields[4].to_string(),
            })?;

        let fullmove_number = fields[5]
            .parse::<u16>()
            .map_err(|_| FenError::InvalidMoveCounter {
                field: "fullmove number",
                found: fields[5].to_string(),
            })?;

        let pos = Position::from_parts(
            pieces,
            squares,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        );
        pos.validate()?;
        Ok(pos)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            let mut empty_run = 0;
            for file in 0u8..8 {
                let sq = Square::from_index(rank * 8 + file).unwrap();
                match self.piece_on(sq) {
                    Some(piece) => {
                        if empty_run > 0 {
                            write!(f, "{empty_run}")?;
                            empty_run = 0;
                        }
                        write!(f, "{piece}")?;
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }

        write!(f, " {} {}", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::color::Color;
    use crate::position::Position;
    use crate::square::Square;

    fn roundtrip(fen: &str) {
        let pos: Position = fen.parse().unwrap();
        assert_eq!(format!("{pos}"), fen);
        let again: Position = format!("{pos}").parse().unwrap();
        assert_eq!(pos, again);
    }

    #[test]
    fn roundtrip_startpos() {
        roundtrip(STARTING_FEN);
    }

    #[test]
    fn roundtrip_kiwipete() {
        roundtrip("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    }

    #[test]
    fn roundtrip_with_en_passant() {
        roundtrip("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2");
        roundtrip("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    }

    #[test]
    fn roundtrip_sparse_endgame() {
        roundtrip("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    }

    #[test]
    fn parsed_fields() {
        let pos: Position = "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2"
            .parse()
            .unwrap();
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.en_passant(), Some(Square::C6));
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 2);
    }

    #[test]
    fn starting_constructor_matches_fen() {
        let parsed: Position = STARTING_FEN.parse().unwrap();
        assert_eq!(parsed, Position::starting_position());
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!("8/8/8/8/8/8/8/8 w - -".parse::<Position>().is_err());
    }

    #[test]
    fn rejects_bad_placement() {
        // Unknown piece letter.
        assert!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"
                .parse::<Position>()
                .is_err()
        );
        // Rank with only 7 squares.
        assert!(
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
                .parse::<Position>()
                .is_err()
        );
        // Rank overflow.
        assert!(
            "rnbqkbnrr/ppppppp1/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
                .parse::<Position>()
                .is_err()
        );
    }

    #[test]
    fn rejects_bad_metadata_fields() {
        assert!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"
                .parse::<Position>()
                .is_err()
        );
        assert!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KXkq - 0 1"
                .parse::<Position>()
                .is_err()
        );
        assert!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq j9 0 1"
                .parse::<Position>()
                .is_err()
        );
        assert!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1"
                .parse::<Position>()
                .is_err()
        );
    }

    #[test]
    fn rejects_structurally_invalid_positions() {
        // No white king.
        assert!("4k3/8/8/8/8/8/8/8 w - - 0 1".parse::<Position>().is_err());
        // Two black kings.
        assert!("4k2k/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().is_err());
        // Pawn on the back rank.
        assert!("4k3/8/8/8/8/8/8/P3K3 w - - 0 1".parse::<Position>().is_err());
        // En passant square on an impossible rank.
        assert!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1"
                .parse::<Position>()
                .is_err()
        );
    }
}
