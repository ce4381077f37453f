//! In-place move execution with exact reversal via the undo stack.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, MoveType};
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::{Position, Undo};
use crate::square::Square;
use crate::zobrist;

/// Castling rights lost when a move touches the given square, as source or
/// destination. Covers the king moving, a rook moving, and a rook being
/// captured on its home corner.
const CASTLE_REVOKE: [CastleRights; 64] = {
    let mut table = [CastleRights::NONE; 64];
    table[Square::E1.index()] = CastleRights::WHITE_BOTH;
    table[Square::A1.index()] = CastleRights::WHITE_QUEENSIDE;
    table[Square::H1.index()] = CastleRights::WHITE_KINGSIDE;
    table[Square::E8.index()] = CastleRights::BLACK_BOTH;
    table[Square::A8.index()] = CastleRights::BLACK_QUEENSIDE;
    table[Square::H8.index()] = CastleRights::BLACK_KINGSIDE;
    table
};

/// Rook travel for a castling move, keyed by the king's destination.
fn castle_rook_travel(king_to: Square) -> (Square, Square) {
    if king_to == Square::G1 {
        (Square::H1, Square::F1)
    } else if king_to == Square::C1 {
        (Square::A1, Square::D1)
    } else if king_to == Square::G8 {
        (Square::H8, Square::F8)
    } else {
        (Square::A8, Square::D8)
    }
}

impl Position {
    /// Is `sq` attacked by any piece of `by`?
    ///
    /// Superpiece test: every attack pattern is cast *from* `sq` and
    /// intersected with the attacker's pieces of the matching kind. The pawn
    /// pattern is cast with the defender's color — a pawn of `by` attacks
    /// `sq` exactly when a defender-colored pawn on `sq` would attack it.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        if (knight_attacks(sq) & self.pieces(by, PieceKind::Knight)).any() {
            return true;
        }
        if (king_attacks(sq) & self.pieces(by, PieceKind::King)).any() {
            return true;
        }
        if (pawn_attacks(by.flip(), sq) & self.pieces(by, PieceKind::Pawn)).any() {
            return true;
        }

        let occupied = self.occupied();
        let orthogonal = self.pieces(by, PieceKind::Rook) | self.pieces(by, PieceKind::Queen);
        if (rook_attacks(sq, occupied) & orthogonal).any() {
            return true;
        }
        let diagonal = self.pieces(by, PieceKind::Bishop) | self.pieces(by, PieceKind::Queen);
        if (bishop_attacks(sq, occupied) & diagonal).any() {
            return true;
        }

        false
    }

    /// Is the side to move's king currently attacked?
    #[inline]
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move();
        self.is_square_attacked(self.king_square(us), us.flip())
    }

    /// Apply a pseudo-legal move.
    ///
    /// Returns `true` and leaves the move applied when it is legal; the
    /// caller must then unmake it with exactly one [`Position::unmake`]
    /// before mutating the position again. Returns `false` when the move
    /// would leave the mover's king attacked — the position is then already
    /// restored and the caller must *not* unmake.
    pub fn make(&mut self, mv: Move) -> bool {
        let us = self.side_to_move();
        let them = us.flip();
        let from = mv.from();
        let to = mv.to();

        // A move not produced against this position may name an empty square;
        // treat it as illegal without touching anything.
        let Some(moving) = self.piece_on(from) else {
            return false;
        };

        let captured = if mv.is_en_passant() {
            // The victim stands one rank behind the target square.
            let victim_sq = to.offset_ranks(-us.pawn_direction());
            Some((Piece::new(PieceKind::Pawn, them), victim_sq))
        } else if mv.is_castle() {
            None
        } else {
            self.piece_on(to).map(|victim| (victim, to))
        };

        self.push_undo(Undo {
            mv,
            captured,
            castling: self.castling(),
            en_passant: self.en_passant(),
            halfmove_clock: self.halfmove_clock(),
            hash: self.hash(),
        });

        // Retire the outgoing en-passant and castling hash keys before the
        // state they describe changes.
        if let Some(ep) = self.en_passant() {
            self.xor_hash(zobrist::KEYS.en_passant_file[ep.file().index()]);
        }
        self.xor_hash(zobrist::KEYS.castling[self.castling().bits() as usize]);
        self.set_en_passant(None);

        if let Some((victim, victim_sq)) = captured {
            self.toggle_piece(victim_sq, victim);
        }

        self.toggle_piece(from, moving);
        match mv.move_type() {
            MoveType::Promotion => {
                debug_assert!(mv.promotion_kind().is_some());
                let kind = mv.promotion_kind().unwrap_or(PieceKind::Queen);
                self.toggle_piece(to, Piece::new(kind, us));
            }
            _ => self.toggle_piece(to, moving),
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_travel(to);
            let rook = Piece::new(PieceKind::Rook, us);
            self.toggle_piece(rook_from, rook);
            self.toggle_piece(rook_to, rook);
        }

        // A double push opens the skipped square to en passant.
        if moving.kind() == PieceKind::Pawn && from.index().abs_diff(to.index()) == 16 {
            let skipped = from.offset_ranks(us.pawn_direction());
            self.set_en_passant(Some(skipped));
            self.xor_hash(zobrist::KEYS.en_passant_file[skipped.file().index()]);
        }

        let rights = self
            .castling()
            .remove(CASTLE_REVOKE[from.index()])
            .remove(CASTLE_REVOKE[to.index()]);
        self.set_castling(rights);
        self.xor_hash(zobrist::KEYS.castling[rights.bits() as usize]);

        if moving.kind() == PieceKind::Pawn || captured.is_some() {
            self.set_halfmove_clock(0);
        } else {
            self.set_halfmove_clock(self.halfmove_clock() + 1);
        }

        if us == Color::Black {
            self.set_fullmove_number(self.fullmove_number() + 1);
        }

        self.set_side_to_move(them);
        self.xor_hash(zobrist::KEYS.side_to_move);

        // Legality filter: the mover may not leave their own king attacked.
        if self.is_square_attacked(self.king_square(us), them) {
            self.unmake(mv);
            return false;
        }

        true
    }

    /// Reverse the most recent successful [`Position::make`].
    ///
    /// `mv` must be that move; make/unmake pairs must nest properly. The
    /// pairing is checked against the undo stack in debug builds.
    pub fn unmake(&mut self, mv: Move) {
        let undo = self
            .pop_undo()
            .expect("unmake called with no outstanding move");
        debug_assert_eq!(undo.mv, mv, "unmake does not match the last made move");

        let us = self.side_to_move().flip();
        self.set_side_to_move(us);
        if us == Color::Black {
            self.set_fullmove_number(self.fullmove_number() - 1);
        }

        let from = mv.from();
        let to = mv.to();

        match mv.move_type() {
            MoveType::Promotion => {
                let kind = mv.promotion_kind().unwrap_or(PieceKind::Queen);
                self.toggle_piece(to, Piece::new(kind, us));
                self.toggle_piece(from, Piece::new(PieceKind::Pawn, us));
            }
            _ => {
                let moving = self
                    .piece_on(to)
                    .expect("unmake: moved piece missing from destination");
                self.toggle_piece(to, moving);
                self.toggle_piece(from, moving);
            }
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_travel(to);
            let rook = Piece::new(PieceKind::Rook, us);
            self.toggle_piece(rook_to, rook);
            self.toggle_piece(rook_from, rook);
        }

        if let Some((victim, victim_sq)) = undo.captured {
            self.toggle_piece(victim_sq, victim);
        }

        self.set_castling(undo.castling);
        self.set_en_passant(undo.en_passant);
        self.set_halfmove_clock(undo.halfmove_clock);
        self.set_hash(undo.hash);
    }
}
