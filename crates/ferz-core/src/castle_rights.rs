//! Castling permissions, one bit per side and wing.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use crate::error::FenError;

/// Bit 0 = white kingside, 1 = white queenside, 2 = black kingside, 3 = black queenside.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    pub const WHITE_KINGSIDE: CastleRights = CastleRights(0b0001);
    pub const WHITE_QUEENSIDE: CastleRights = CastleRights(0b0010);
    pub const BLACK_KINGSIDE: CastleRights = CastleRights(0b0100);
    pub const BLACK_QUEENSIDE: CastleRights = CastleRights(0b1000);

    pub const WHITE_BOTH: CastleRights = CastleRights(0b0011);
    pub const BLACK_BOTH: CastleRights = CastleRights(0b1100);

    /// Raw bits, always within the low nibble.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every bit of `other` is present.
    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn insert(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    #[inline]
    pub const fn remove(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & !other.0)
    }

    /// Parse the FEN castling field ("KQkq", "Kq", "-", ...).
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        let mut rights = CastleRights::NONE;
        for c in s.chars() {
            rights = rights.insert(match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            });
        }
        Ok(rights)
    }
}

impl BitAnd for CastleRights {
    type Output = CastleRights;
    #[inline]
    fn bitand(self, rhs: CastleRights) -> CastleRights {
        CastleRights(self.0 & rhs.0)
    }
}

impl BitOr for CastleRights {
    type Output = CastleRights;
    #[inline]
    fn bitor(self, rhs: CastleRights) -> CastleRights {
        CastleRights(self.0 | rhs.0)
    }
}

impl Not for CastleRights {
    type Output = CastleRights;
    #[inline]
    fn not(self) -> CastleRights {
        CastleRights(!self.0 & 0b1111)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.contains(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}
