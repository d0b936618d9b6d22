//! Constants for evaluation weights, search limits and the protocol loop.
//!
//! Everything tunable about the engine lives here. Runtime overrides
//! (depth, worker count) go through [`EngineConfig`].

use std::time::Duration;

// =============================================================================
// Engine Identity
// =============================================================================

/// Name reported in response to `uci`.
pub const ENGINE_NAME: &str = "badchess";

/// Author reported in response to `uci`.
pub const ENGINE_AUTHOR: &str = "Kevin Schaul";

// =============================================================================
// Search Parameters
// =============================================================================

/// Search depth (in plies) used by `go` unless overridden.
pub const DEFAULT_DEPTH: usize = 3;

/// Deepest search the engine will accept. Anything beyond this is rejected.
pub const MAX_DEPTH: usize = 4;

/// Move token sent when the position has no legal moves.
pub const NULL_MOVE: &str = "0000";

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Pawn value in material units.
pub const PAWN_VALUE: f64 = 1.0;

/// Knight value in material units.
pub const KNIGHT_VALUE: f64 = 3.0;

/// Bishop value in material units.
pub const BISHOP_VALUE: f64 = 3.0;

/// Rook value in material units.
pub const ROOK_VALUE: f64 = 5.0;

/// Queen value in material units.
pub const QUEEN_VALUE: f64 = 9.0;

/// Weight of the piece-square component relative to material.
///
/// With at most 16 pieces per side and six tables the positional term stays
/// below 0.1 * 16 / 6, well under one pawn.
pub const POSITIONAL_WEIGHT: f64 = 0.1;

// =============================================================================
// Protocol Loop
// =============================================================================

/// Number of consumer threads pulling commands from the queue.
pub const N_CONSUMERS: usize = 2;

/// Longest time any loop thread blocks before re-checking the quit flag.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime configuration shared by the command processor and the I/O loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Depth used for every `go`.
    pub depth: usize,
    /// Largest depth the search accepts.
    pub max_depth: usize,
    /// Consumer pool size.
    pub workers: usize,
    /// Bounded wait for the producer and consumers.
    pub poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            max_depth: MAX_DEPTH,
            workers: N_CONSUMERS,
            poll_interval: POLL_INTERVAL,
        }
    }
}
