//! Chess position handling on top of the `chess` crate.
//!
//! The rules of chess (move generation, move application, mate detection
//! and FEN parsing) are delegated to [`chess::Board`]. This module narrows
//! that API down to what the search and the protocol layer need:
//!
//! - Positions are immutable values; [`play_move`] returns a new one.
//! - Moves coming from the protocol are matched against the legal moves
//!   by their UCI token, never constructed directly.

use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Color, MoveGen};
use thiserror::Error;

use crate::constants::NULL_MOVE;

/// A chess position. Cheap to copy.
pub type Position = Board;

/// Errors raised while building a position from protocol input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The FEN description could not be parsed or is not a legal position.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    /// The move token does not name a legal move in the position.
    #[error("illegal move {token} in position {fen}")]
    IllegalMove { token: String, fen: String },
}

/// The standard initial layout.
pub fn start_position() -> Position {
    Board::default()
}

/// Parse a six-field FEN description.
pub fn parse_fen(fen: &str) -> Result<Position, PositionError> {
    Board::from_str(fen).map_err(|_| PositionError::InvalidFen(fen.to_string()))
}

/// All legal moves, in the order the move generator produces them.
pub fn legal_moves(pos: &Position) -> Vec<ChessMove> {
    MoveGen::new_legal(pos).collect()
}

/// Apply a legal move, returning the resulting position.
#[inline]
pub fn play_move(pos: &Position, mv: ChessMove) -> Position {
    pos.make_move_new(mv)
}

/// Resolve a UCI move token (`e2e4`, `e7e8q`) against the legal moves.
pub fn parse_move(pos: &Position, token: &str) -> Result<ChessMove, PositionError> {
    let token = token.to_lowercase();
    legal_moves(pos)
        .into_iter()
        .find(|mv| mv.to_string() == token)
        .ok_or_else(|| PositionError::IllegalMove {
            token,
            fen: pos.to_string(),
        })
}

/// Replay a sequence of move tokens from `pos`.
///
/// Stops at the first token that is not legal; `pos` itself is never touched.
pub fn play_moves<S: AsRef<str>>(
    pos: &Position,
    tokens: &[S],
) -> Result<Position, PositionError> {
    tokens.iter().try_fold(*pos, |acc, token| {
        let mv = parse_move(&acc, token.as_ref())?;
        Ok(play_move(&acc, mv))
    })
}

/// Format a move as a UCI token, or the null move when there is none.
pub fn str_move(mv: Option<ChessMove>) -> String {
    mv.map(|m| m.to_string())
        .unwrap_or_else(|| NULL_MOVE.to_string())
}

/// Format a line of moves as space-separated UCI tokens.
pub fn str_line(line: &[ChessMove]) -> String {
    line.iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Is the side to move checkmated?
#[inline]
pub fn is_checkmate(pos: &Position) -> bool {
    pos.status() == BoardStatus::Checkmate
}

/// Is the side to move stalemated?
#[inline]
pub fn is_stalemate(pos: &Position) -> bool {
    pos.status() == BoardStatus::Stalemate
}

/// Is it White's turn? White is the maximizing side for every score.
#[inline]
pub fn white_to_move(pos: &Position) -> bool {
    pos.side_to_move() == Color::White
}

/// Does `mv` land on a square occupied by an opponent piece?
///
/// En passant lands on an empty square and is not counted.
#[inline]
pub fn is_capture(pos: &Position, mv: ChessMove) -> bool {
    pos.color_on(mv.get_dest()) == Some(!pos.side_to_move())
}
