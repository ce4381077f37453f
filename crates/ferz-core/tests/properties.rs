//! Whole-stack property checks: random playouts that hammer generation,
//! make/unmake, and the structural invariants together.

use ferz_core::{Move, Position, generate_captures, generate_moves};

/// Deterministic xorshift so failures reproduce.
fn xorshift(state: &mut u64) -> u64 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    *state
}

const SUITE: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
];

/// Play random legal moves; after every make and every unmake the position
/// must still satisfy its invariants, and the final unwind must restore the
/// root exactly.
#[test]
fn random_playouts_preserve_invariants_and_unwind_cleanly() {
    let mut rng = 0xFEB8_1C64_02D9_553Bu64;

    for fen in SUITE {
        let root: Position = fen.parse().unwrap();
        let mut pos = root.clone();
        let mut line: Vec<Move> = Vec::new();

        for _ in 0..60 {
            let moves = generate_moves(&pos);
            let legal: Vec<Move> = {
                let mut out = Vec::new();
                for &mv in &moves {
                    if pos.make(mv) {
                        pos.unmake(mv);
                        out.push(mv);
                    }
                }
                out
            };
            if legal.is_empty() {
                break;
            }

            let mv = legal[(xorshift(&mut rng) % legal.len() as u64) as usize];
            assert!(pos.make(mv));
            pos.validate().unwrap_or_else(|e| panic!("after {mv} in {fen}: {e}"));
            line.push(mv);
        }

        while let Some(mv) = line.pop() {
            pos.unmake(mv);
            pos.validate().unwrap_or_else(|e| panic!("unwinding {mv} in {fen}: {e}"));
        }
        assert_eq!(pos, root, "unwind did not restore the root for {fen}");
    }
}

/// Captures-only generation must be exactly the capturing subset of full
/// generation, in every position a short random walk reaches.
#[test]
fn capture_generation_matches_full_generation_along_playouts() {
    let mut rng = 0x1357_9BDF_2468_ACE0u64;

    for fen in SUITE {
        let mut pos: Position = fen.parse().unwrap();
        let mut line: Vec<Move> = Vec::new();

        for _ in 0..40 {
            let all = generate_moves(&pos);
            let captures = generate_captures(&pos);
            let enemy = pos.side(pos.side_to_move().flip());

            let expected = all
                .iter()
                .filter(|m| enemy.contains(m.to()) || m.is_en_passant())
                .count();
            assert_eq!(captures.len(), expected, "capture subset broken in {pos}");
            for &mv in &captures {
                assert!(all.contains(mv), "{mv} generated only as a capture in {pos}");
            }

            let legal: Vec<Move> = all
                .iter()
                .copied()
                .filter(|&mv| {
                    let ok = pos.make(mv);
                    if ok {
                        pos.unmake(mv);
                    }
                    ok
                })
                .collect();
            if legal.is_empty() {
                break;
            }
            let mv = legal[(xorshift(&mut rng) % legal.len() as u64) as usize];
            assert!(pos.make(mv));
            line.push(mv);
        }

        while let Some(mv) = line.pop() {
            pos.unmake(mv);
        }
    }
}

/// Every accepted move must correspond to a generated one: making an
/// arbitrary generated move and unmaking it is a no-op even when the move
/// is rejected as illegal.
#[test]
fn rejected_moves_leave_no_trace() {
    for fen in SUITE {
        let root: Position = fen.parse().unwrap();
        let mut pos = root.clone();
        let moves = generate_moves(&pos);
        for &mv in &moves {
            if pos.make(mv) {
                pos.unmake(mv);
            }
            assert_eq!(pos, root, "state leaked after probing {mv} in {fen}");
        }
    }
}
