//! Static position evaluation.
//!
//! Scores are always from White's point of view: positive favours White,
//! negative favours Black. Checkmate is scored as an infinity so that it
//! survives backup through the search tree unchanged.
//!
//! The score has two parts:
//! - Material, using the classic 9/5/3/3/1 piece values (kings excluded)
//! - Piece placement, using one 64-square table per piece type, weighted
//!   by [`POSITIONAL_WEIGHT`] so it only ever breaks material ties

use chess::{Color, Piece, Square, ALL_PIECES};

use crate::constants::{
    BISHOP_VALUE, KNIGHT_VALUE, PAWN_VALUE, POSITIONAL_WEIGHT, QUEEN_VALUE, ROOK_VALUE,
};
use crate::position::{is_checkmate, is_stalemate, white_to_move, Position};

/// Position strength from White's perspective.
pub type Score = f64;

/// Number of piece-square tables; the positional sum is normalized by it.
const N_TABLES: f64 = 6.0;

// =============================================================================
// Piece-Square Tables
// =============================================================================
//
// Written as seen from White's side of the board: the first row is rank 8,
// the last row is rank 1. Black pieces look up the vertically mirrored square.

#[rustfmt::skip]
const PAWN_TABLE: [f64; 64] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    0.6, 0.6, 0.7, 0.8, 0.8, 0.7, 0.6, 0.6,
    0.4, 0.4, 0.5, 0.7, 0.7, 0.5, 0.4, 0.4,
    0.3, 0.3, 0.4, 0.6, 0.6, 0.4, 0.3, 0.3,
    0.3, 0.2, 0.2, 0.3, 0.3, 0.2, 0.2, 0.3,
    0.3, 0.4, 0.4, 0.0, 0.0, 0.4, 0.4, 0.3,
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [f64; 64] = [
    0.0, 0.1, 0.2, 0.2, 0.2, 0.2, 0.1, 0.0,
    0.1, 0.3, 0.5, 0.5, 0.5, 0.5, 0.3, 0.1,
    0.2, 0.5, 0.6, 0.7, 0.7, 0.6, 0.5, 0.2,
    0.2, 0.5, 0.7, 0.8, 0.8, 0.7, 0.5, 0.2,
    0.2, 0.5, 0.7, 0.8, 0.8, 0.7, 0.5, 0.2,
    0.2, 0.5, 0.6, 0.7, 0.7, 0.6, 0.5, 0.2,
    0.1, 0.3, 0.5, 0.5, 0.5, 0.5, 0.3, 0.1,
    0.0, 0.1, 0.2, 0.2, 0.2, 0.2, 0.1, 0.0,
];

#[rustfmt::skip]
const BISHOP_TABLE: [f64; 64] = [
    0.2, 0.3, 0.3, 0.3, 0.3, 0.3, 0.3, 0.2,
    0.3, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.3,
    0.3, 0.5, 0.6, 0.7, 0.7, 0.6, 0.5, 0.3,
    0.3, 0.6, 0.6, 0.7, 0.7, 0.6, 0.6, 0.3,
    0.3, 0.5, 0.7, 0.7, 0.7, 0.7, 0.5, 0.3,
    0.3, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.3,
    0.3, 0.6, 0.5, 0.5, 0.5, 0.5, 0.6, 0.3,
    0.2, 0.3, 0.3, 0.3, 0.3, 0.3, 0.3, 0.2,
];

#[rustfmt::skip]
const ROOK_TABLE: [f64; 64] = [
    0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5,
    0.7, 0.8, 0.8, 0.8, 0.8, 0.8, 0.8, 0.7,
    0.4, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.4,
    0.4, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.4,
    0.4, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.4,
    0.4, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.4,
    0.4, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.4,
    0.5, 0.5, 0.5, 0.6, 0.6, 0.5, 0.5, 0.5,
];

#[rustfmt::skip]
const QUEEN_TABLE: [f64; 64] = [
    0.2, 0.3, 0.3, 0.4, 0.4, 0.3, 0.3, 0.2,
    0.3, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.3,
    0.3, 0.5, 0.6, 0.6, 0.6, 0.6, 0.5, 0.3,
    0.4, 0.5, 0.6, 0.6, 0.6, 0.6, 0.5, 0.4,
    0.5, 0.5, 0.6, 0.6, 0.6, 0.6, 0.5, 0.4,
    0.3, 0.6, 0.6, 0.6, 0.6, 0.6, 0.5, 0.3,
    0.3, 0.5, 0.6, 0.5, 0.5, 0.5, 0.5, 0.3,
    0.2, 0.3, 0.3, 0.4, 0.4, 0.3, 0.3, 0.2,
];

#[rustfmt::skip]
const KING_TABLE: [f64; 64] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1,
    0.2, 0.1, 0.1, 0.0, 0.0, 0.1, 0.1, 0.2,
    0.3, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.3,
    0.7, 0.7, 0.5, 0.5, 0.5, 0.5, 0.7, 0.7,
    0.7, 0.9, 0.8, 0.5, 0.5, 0.6, 1.0, 0.8,
];

/// Material value of a piece type. Kings are never counted.
#[inline]
pub fn piece_value(piece: Piece) -> f64 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0.0,
    }
}

fn piece_table(piece: Piece) -> &'static [f64; 64] {
    match piece {
        Piece::Pawn => &PAWN_TABLE,
        Piece::Knight => &KNIGHT_TABLE,
        Piece::Bishop => &BISHOP_TABLE,
        Piece::Rook => &ROOK_TABLE,
        Piece::Queen => &QUEEN_TABLE,
        Piece::King => &KING_TABLE,
    }
}

/// Table index for a square, seen from `color`'s side of the board.
#[inline]
fn table_index(sq: Square, color: Color) -> usize {
    let rank = sq.get_rank().to_index();
    let file = sq.get_file().to_index();
    let row = match color {
        Color::White => 7 - rank,
        Color::Black => rank,
    };
    row * 8 + file
}

/// Material balance, White minus Black.
pub fn material(pos: &Position) -> f64 {
    let side_total = |color: Color| -> f64 {
        let own = *pos.color_combined(color);
        ALL_PIECES
            .iter()
            .map(|&piece| (*pos.pieces(piece) & own).popcnt() as f64 * piece_value(piece))
            .sum()
    };
    side_total(Color::White) - side_total(Color::Black)
}

/// Piece placement balance, White minus Black, normalized by the table count.
pub fn positional(pos: &Position) -> f64 {
    let side_total = |color: Color| -> f64 {
        let own = *pos.color_combined(color);
        let mut total = 0.0;
        for piece in ALL_PIECES {
            let table = piece_table(piece);
            for sq in *pos.pieces(piece) & own {
                total += table[table_index(sq, color)];
            }
        }
        total / N_TABLES
    };
    side_total(Color::White) - side_total(Color::Black)
}

/// Evaluate a position from White's perspective.
///
/// - Checkmate: `+inf` if White delivered it, `-inf` if Black did
/// - Stalemate: `0.0`
/// - Otherwise: material plus weighted piece placement
pub fn evaluate(pos: &Position) -> Score {
    if is_checkmate(pos) {
        // The side to move is the side that has been mated.
        return if white_to_move(pos) {
            Score::NEG_INFINITY
        } else {
            Score::INFINITY
        };
    }
    if is_stalemate(pos) {
        return 0.0;
    }
    material(pos) + POSITIONAL_WEIGHT * positional(pos)
}
