//! Move representation: from/to squares, a move type, and a flag packed into a `u32`.

use std::fmt;

use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

const FROM_MASK: u32 = 0x0000_003F;
const TO_MASK: u32 = 0x0000_0FC0;
const TYPE_MASK: u32 = 0x0000_3000;
const FLAG_MASK: u32 = 0x0001_C000;
const TO_SHIFT: u32 = 6;
const TYPE_SHIFT: u32 = 12;
const FLAG_SHIFT: u32 = 14;

/// The broad category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveType {
    /// Non-capturing move (including pushes and double pushes).
    Quiet = 0,
    /// Capture, including en passant.
    Attack = 1,
    /// King-side or queen-side castling, encoded by the king's travel.
    Castle = 2,
    /// Pawn promotion, capturing or not.
    Promotion = 3,
}

/// Extra detail attached to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    None = 0,
    /// The capture is en passant; the victim is not on the destination square.
    EnPassant = 1,
    KnightPromotion = 2,
    BishopPromotion = 3,
    RookPromotion = 4,
    QueenPromotion = 5,
}

impl MoveFlag {
    /// The four promotion flags in the order they are generated.
    pub const PROMOTIONS: [MoveFlag; 4] = [
        MoveFlag::KnightPromotion,
        MoveFlag::BishopPromotion,
        MoveFlag::RookPromotion,
        MoveFlag::QueenPromotion,
    ];

    /// The piece kind a promotion flag stands for.
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        match self {
            MoveFlag::KnightPromotion => Some(PieceKind::Knight),
            MoveFlag::BishopPromotion => Some(PieceKind::Bishop),
            MoveFlag::RookPromotion => Some(PieceKind::Rook),
            MoveFlag::QueenPromotion => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// The lowercase letter appended in long algebraic notation.
    pub const fn promotion_char(self) -> Option<char> {
        match self {
            MoveFlag::KnightPromotion => Some('n'),
            MoveFlag::BishopPromotion => Some('b'),
            MoveFlag::RookPromotion => Some('r'),
            MoveFlag::QueenPromotion => Some('q'),
            _ => None,
        }
    }
}

/// A chess move packed into 17 bits of a `u32`.
///
/// ```text
/// bits  0-5:  from square
/// bits  6-11: to square
/// bits 12-13: MoveType
/// bits 14-16: MoveFlag
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// All-zero sentinel (a1→a1 quiet). Never produced by the generator.
    pub const NULL: Move = Move(0);

    /// Pack a move from its four fields.
    #[inline]
    pub const fn new(from: Square, to: Square, move_type: MoveType, flag: MoveFlag) -> Move {
        Move(
            from.index() as u32
                | (to.index() as u32) << TO_SHIFT
                | (move_type as u32) << TYPE_SHIFT
                | (flag as u32) << FLAG_SHIFT,
        )
    }

    /// A non-capturing move.
    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Move {
        Move::new(from, to, MoveType::Quiet, MoveFlag::None)
    }

    /// A plain capture.
    #[inline]
    pub const fn capture(from: Square, to: Square) -> Move {
        Move::new(from, to, MoveType::Attack, MoveFlag::None)
    }

    /// An en-passant capture; `to` is the en-passant target square.
    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Move {
        Move::new(from, to, MoveType::Attack, MoveFlag::EnPassant)
    }

    /// A castling move described by the king's from/to squares.
    #[inline]
    pub const fn castle(from: Square, to: Square) -> Move {
        Move::new(from, to, MoveType::Castle, MoveFlag::None)
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & FROM_MASK) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked(((self.0 & TO_MASK) >> TO_SHIFT) as u8)
    }

    #[inline]
    pub const fn move_type(self) -> MoveType {
        match (self.0 & TYPE_MASK) >> TYPE_SHIFT {
            0 => MoveType::Quiet,
            1 => MoveType::Attack,
            2 => MoveType::Castle,
            _ => MoveType::Promotion,
        }
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        match (self.0 & FLAG_MASK) >> FLAG_SHIFT {
            0 => MoveFlag::None,
            1 => MoveFlag::EnPassant,
            2 => MoveFlag::KnightPromotion,
            3 => MoveFlag::BishopPromotion,
            4 => MoveFlag::RookPromotion,
            _ => MoveFlag::QueenPromotion,
        }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// `true` for captures, including en passant. Capturing promotions are
    /// identified by the destination square's occupancy instead.
    #[inline]
    pub const fn is_attack(self) -> bool {
        matches!(self.move_type(), MoveType::Attack)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag(), MoveFlag::EnPassant)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.move_type(), MoveType::Castle)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self.move_type(), MoveType::Promotion)
    }

    /// The promoted-to piece kind, when this is a promotion.
    #[inline]
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        self.flag().promotion_kind()
    }

    /// Parse long algebraic notation ("e2e4", "e7e8q") against a position.
    ///
    /// The position is consulted to recover what the string leaves implicit:
    /// whether the destination is a capture, a castling king-move, or the
    /// en-passant target.
    pub fn from_uci(s: &str, pos: &Position) -> Option<Move> {
        if !(4..=5).contains(&s.len()) {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;

        if s.len() == 5 {
            let flag = match s.as_bytes()[4] {
                b'n' => MoveFlag::KnightPromotion,
                b'b' => MoveFlag::BishopPromotion,
                b'r' => MoveFlag::RookPromotion,
                b'q' => MoveFlag::QueenPromotion,
                _ => return None,
            };
            return Some(Move::new(from, to, MoveType::Promotion, flag));
        }

        let moving = pos.piece_on(from).map(|p| p.kind());

        if moving == Some(PieceKind::King)
            && from.file().index().abs_diff(to.file().index()) == 2
        {
            return Some(Move::castle(from, to));
        }

        if moving == Some(PieceKind::Pawn)
            && pos.en_passant() == Some(to)
            && from.file() != to.file()
        {
            return Some(Move::en_passant(from, to));
        }

        if pos.occupied().contains(to) {
            Some(Move::capture(from, to))
        } else {
            Some(Move::quiet(from, to))
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(c) = self.flag().promotion_char() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?}/{:?})", self, self.move_type(), self.flag())
    }
}
