//! Short algebraic notation resolution.
//!
//! Human-authored test suites write moves like `Nf3`, `exd5`, `O-O`, or
//! `e8=Q+`. Rather than reimplement SAN's rules, the notation is resolved
//! against the position: generate every move, keep the legal ones matching
//! the written piece kind, destination, disambiguator, and promotion, and
//! demand that exactly one survives.

use crate::chess_move::Move;
use crate::error::SanError;
use crate::file::File;
use crate::movegen::generate_moves;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::rank::Rank;
use crate::square::Square;

/// What a SAN string pins down before matching.
struct SanPattern {
    kind: PieceKind,
    dest: Square,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    promotion: Option<PieceKind>,
}

/// Resolve `text` to the unique legal move it denotes in `pos`.
pub fn resolve_san(pos: &mut Position, text: &str) -> Result<Move, SanError> {
    let trimmed = text.trim().trim_end_matches(['+', '#', '!', '?']);

    // Castling is keyed off the king's two-file travel rather than coordinates.
    if let Some(kingside) = match trimmed {
        "O-O" | "0-0" => Some(true),
        "O-O-O" | "0-0-0" => Some(false),
        _ => None,
    } {
        let wanted_file = if kingside { File::FileG } else { File::FileC };
        return unique_match(pos, text, |_, mv| {
            mv.is_castle() && mv.to().file() == wanted_file
        });
    }

    let pattern = parse_pattern(trimmed).ok_or_else(|| SanError::Unparsable {
        text: text.to_string(),
    })?;

    unique_match(pos, text, |pos, mv| {
        let Some(piece) = pos.piece_on(mv.from()) else {
            return false;
        };
        piece.kind() == pattern.kind
            && mv.to() == pattern.dest
            && pattern.from_file.is_none_or(|f| mv.from().file() == f)
            && pattern.from_rank.is_none_or(|r| mv.from().rank() == r)
            && mv.promotion_kind() == pattern.promotion
            && !mv.is_castle()
    })
}

/// Split a SAN body into kind, disambiguator, destination, and promotion.
fn parse_pattern(s: &str) -> Option<SanPattern> {
    // Promotion suffix: "e8=Q" (the '=' form; bare "e8Q" also appears in
    // older suites).
    let (body, promotion) = match s.split_once('=') {
        Some((body, promo)) => (body, Some(piece_letter(promo.chars().next()?)?)),
        None => match s.chars().last() {
            Some(c) if c.is_ascii_uppercase() && s.len() > 2 => {
                (&s[..s.len() - 1], Some(piece_letter(c)?))
            }
            _ => (s, None),
        },
    };

    let mut chars = body.chars().peekable();
    let kind = match chars.peek() {
        Some(&c) if c.is_ascii_uppercase() => {
            chars.next();
            piece_letter(c)?
        }
        _ => PieceKind::Pawn,
    };

    // Whatever remains is coordinates plus an optional 'x'.
    let coords: String = chars.filter(|&c| c != 'x').collect();
    if !(2..=4).contains(&coords.len()) {
        return None;
    }

    let dest = Square::from_algebraic(&coords[coords.len() - 2..])?;
    let mut from_file = None;
    let mut from_rank = None;
    for c in coords[..coords.len() - 2].chars() {
        match c {
            'a'..='h' => from_file = Some(File::from_index(c as u8 - b'a')?),
            '1'..='8' => from_rank = Some(Rank::from_index(c as u8 - b'1')?),
            _ => return None,
        }
    }

    // Promotions only make sense for pawn moves to a back rank.
    if promotion.is_some()
        && (kind != PieceKind::Pawn || !matches!(dest.rank(), Rank::Rank1 | Rank::Rank8))
    {
        return None;
    }

    Some(SanPattern {
        kind,
        dest,
        from_file,
        from_rank,
        promotion,
    })
}

fn piece_letter(c: char) -> Option<PieceKind> {
    match c {
        'N' => Some(PieceKind::Knight),
        'B' => Some(PieceKind::Bishop),
        'R' => Some(PieceKind::Rook),
        'Q' => Some(PieceKind::Queen),
        'K' => Some(PieceKind::King),
        _ => None,
    }
}

/// Find the single legal move satisfying `matches`.
fn unique_match(
    pos: &mut Position,
    text: &str,
    matches: impl Fn(&Position, Move) -> bool,
) -> Result<Move, SanError> {
    let mut found: Option<Move> = None;
    let moves = generate_moves(pos);
    for &mv in &moves {
        if !matches(pos, mv) {
            continue;
        }
        // Pseudo-legal matches that lose the king do not count; SAN
        // disambiguation is defined over legal moves only.
        if !pos.make(mv) {
            continue;
        }
        pos.unmake(mv);
        if found.is_some() {
            return Err(SanError::Ambiguous {
                text: text.to_string(),
            });
        }
        found = Some(mv);
    }
    found.ok_or_else(|| SanError::NoMatch {
        text: text.to_string(),
    })
}
