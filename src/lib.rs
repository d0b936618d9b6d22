//! Badchess-Rust: a small alpha-beta chess engine speaking UCI.
//!
//! The engine searches a fixed number of plies with minimax and alpha-beta
//! pruning and scores leaves by material and piece placement. Chess rules
//! come from the [`chess`] crate.
//!
//! ## Modules
//!
//! - [`constants`] - Evaluation weights, search limits, loop settings
//! - [`position`] - Thin layer over the `chess` crate (moves, FEN, mate)
//! - [`eval`] - Static evaluation from White's perspective
//! - [`ordering`] - Captures-first move ordering
//! - [`search`] - Depth-bounded alpha-beta search
//! - [`uci`] - UCI command parsing and handling
//! - [`server`] - Producer/consumer threads around the command handler
//!
//! ## Example
//!
//! ```
//! use badchess_rust::position::{play_moves, start_position, str_move};
//! use badchess_rust::search::find_best_move;
//!
//! // Reach a position from the initial layout
//! let pos = play_moves(&start_position(), &["e2e4", "e7e5"]).unwrap();
//!
//! // Look three plies ahead for White's reply
//! let result = find_best_move(&pos, 3, 4).unwrap();
//! println!("Best move: {}", str_move(result.best_move()));
//! ```

pub mod constants;
pub mod eval;
pub mod ordering;
pub mod position;
pub mod search;
pub mod server;
pub mod uci;
