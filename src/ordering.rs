//! Move ordering for alpha-beta pruning.
//!
//! Captures are tried before quiet moves since they are the likeliest to
//! produce an early cutoff. The sort is stable, so within each group the
//! move generator's order is kept and the search stays reproducible.

use chess::ChessMove;

use crate::position::{is_capture, Position};

/// Order `moves` for searching: captures first, generator order otherwise.
pub fn order_moves(pos: &Position, moves: &[ChessMove]) -> Vec<ChessMove> {
    let mut ordered = moves.to_vec();
    ordered.sort_by_key(|&mv| !is_capture(pos, mv));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{legal_moves, parse_fen, play_moves, start_position};

    #[test]
    fn test_quiet_position_keeps_generator_order() {
        let pos = start_position();
        let moves = legal_moves(&pos);
        assert_eq!(order_moves(&pos, &moves), moves);
    }

    #[test]
    fn test_captures_come_first() {
        let pos = play_moves(&start_position(), &["e2e4", "d7d5", "g1f3", "b8c6"]).unwrap();
        let moves = legal_moves(&pos);
        let ordered = order_moves(&pos, &moves);

        assert_eq!(ordered.len(), moves.len());
        assert_eq!(ordered[0].to_string(), "e4d5");
        assert!(ordered[1..].iter().all(|&mv| !is_capture(&pos, mv)));
    }

    #[test]
    fn test_order_is_stable_within_groups() {
        // Rook takes on a5, queen takes on d5
        let pos = parse_fen("3rk3/8/8/p2p4/8/8/8/R2QK3 w - - 0 1").unwrap();
        let moves = legal_moves(&pos);
        let ordered = order_moves(&pos, &moves);

        let captures: Vec<_> = moves.iter().copied().filter(|&m| is_capture(&pos, m)).collect();
        let quiets: Vec<_> = moves.iter().copied().filter(|&m| !is_capture(&pos, m)).collect();
        assert_eq!(captures.len(), 2);
        assert_eq!(&ordered[..captures.len()], captures.as_slice());
        assert_eq!(&ordered[captures.len()..], quiets.as_slice());
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let pos = play_moves(&start_position(), &["e2e4", "d7d5"]).unwrap();
        let moves = legal_moves(&pos);
        assert_eq!(order_moves(&pos, &moves), order_moves(&pos, &moves));
    }
}
