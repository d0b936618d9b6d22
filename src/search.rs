//! Depth-bounded minimax search with alpha-beta pruning.
//!
//! The search walks the game tree on the call stack: each recursive call
//! owns its position, remaining depth, (alpha, beta) window and the side to
//! optimize for. No tree is materialized and no positions are cached.
//!
//! Scores come from [`evaluate`] and are always from White's perspective,
//! so White maximizes and Black minimizes. A child only replaces the current
//! best move when its score is strictly better, which together with the
//! stable [`order_moves`] makes the result fully deterministic.
//!
//! The search runs to completion on the calling thread. It has no
//! cancellation point; a `stop` arriving mid-search is not observed.

use chess::ChessMove;
use log::{debug, info};
use thiserror::Error;

use crate::eval::{evaluate, Score};
use crate::ordering::order_moves;
use crate::position::{legal_moves, play_move, str_line, white_to_move, Position};

/// Search configuration errors, raised before any node is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A search must look at least one ply ahead.
    #[error("search depth must be at least 1")]
    ZeroDepth,
    /// The requested depth is beyond the configured limit.
    #[error("search depth {depth} exceeds the maximum of {max_depth}")]
    DepthTooLarge { depth: usize, max_depth: usize },
}

/// Counters collected during one search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions whose moves were expanded
    pub nodes: u64,
    /// Positions scored by the evaluator
    pub leaves: u64,
    /// Sibling loops cut short by the alpha-beta window
    pub cutoffs: u64,
    /// Deepest ply (distance from the root) that was visited
    pub max_ply: usize,
}

/// Outcome of a search: the score and the principal line behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Score of the root position from White's perspective
    pub score: Score,
    /// Best move at each ply, starting from the root. Empty only if the
    /// root has no legal moves.
    pub line: Vec<ChessMove>,
    pub stats: SearchStats,
}

impl SearchResult {
    /// The move to play: the first move of the principal line.
    #[inline]
    pub fn best_move(&self) -> Option<ChessMove> {
        self.line.first().copied()
    }
}

/// Validate a requested depth against the configured maximum.
pub fn check_depth(depth: usize, max_depth: usize) -> Result<(), SearchError> {
    if depth == 0 {
        return Err(SearchError::ZeroDepth);
    }
    if depth > max_depth {
        return Err(SearchError::DepthTooLarge { depth, max_depth });
    }
    Ok(())
}

/// Search `pos` to `depth` plies and return the best line found.
///
/// The side to move at the root is the side being optimized for.
/// Depths of zero or beyond `max_depth` are rejected, never clamped.
pub fn find_best_move(
    pos: &Position,
    depth: usize,
    max_depth: usize,
) -> Result<SearchResult, SearchError> {
    check_depth(depth, max_depth)?;

    let mut stats = SearchStats::default();
    let maximizing = white_to_move(pos);
    let (score, line) = alphabeta(
        pos,
        depth,
        0,
        Score::NEG_INFINITY,
        Score::INFINITY,
        maximizing,
        &mut stats,
    );

    info!(
        "depth {depth} score {score} line [{}] nodes {} leaves {} cutoffs {}",
        str_line(&line),
        stats.nodes,
        stats.leaves,
        stats.cutoffs
    );

    Ok(SearchResult { score, line, stats })
}

/// Recursive alpha-beta over `pos`, `depth` plies deep, `ply` plies from the root.
///
/// Returns the score of `pos` and the principal line below it. Positions
/// without legal moves are scored directly, whatever depth remains.
fn alphabeta(
    pos: &Position,
    depth: usize,
    ply: usize,
    mut alpha: Score,
    mut beta: Score,
    maximizing: bool,
    stats: &mut SearchStats,
) -> (Score, Vec<ChessMove>) {
    stats.max_ply = stats.max_ply.max(ply);

    if depth == 0 {
        stats.leaves += 1;
        return (evaluate(pos), Vec::new());
    }

    let moves = legal_moves(pos);
    if moves.is_empty() {
        stats.leaves += 1;
        return (evaluate(pos), Vec::new());
    }
    stats.nodes += 1;

    let mut best_score = if maximizing {
        Score::NEG_INFINITY
    } else {
        Score::INFINITY
    };
    let mut best_line: Option<Vec<ChessMove>> = None;

    for mv in order_moves(pos, &moves) {
        let child = play_move(pos, mv);
        let (score, mut line) =
            alphabeta(&child, depth - 1, ply + 1, alpha, beta, !maximizing, stats);

        // Strictly better only: ties keep the earlier move.
        let improves = best_line.is_none()
            || (maximizing && score > best_score)
            || (!maximizing && score < best_score);
        if improves {
            line.insert(0, mv);
            best_score = score;
            best_line = Some(line);
        }

        if maximizing {
            alpha = alpha.max(best_score);
            if best_score >= beta {
                stats.cutoffs += 1;
                debug!("beta cutoff at ply {ply} after {mv}");
                break;
            }
        } else {
            beta = beta.min(best_score);
            if best_score <= alpha {
                stats.cutoffs += 1;
                debug!("alpha cutoff at ply {ply} after {mv}");
                break;
            }
        }
    }

    (best_score, best_line.unwrap_or_default())
}
