//! Chess position model and legal move generation.
//!
//! This crate provides:
//! - [`Position`] - full game state: mailbox board, side to move, castling
//!   rights, en passant target, move history, captured pieces, and the
//!   terminal outcome
//! - Move generation and validation, including check, castling, en passant,
//!   and promotion
//! - Attack queries ([`is_square_attacked`], [`is_in_check`])
//! - [`perft`] for move-generator validation
//!
//! # Architecture
//!
//! The board is an 8x8 mailbox: an array of 64 optional pieces. Move
//! generation produces pseudo-legal moves per piece kind and filters them
//! by simulating each move on a scratch copy of the board and testing
//! whether the mover's own king would be attacked. Search code explores
//! the game tree by cloning positions per branch, so [`Position`] keeps
//! its invariants (king-square cache, terminal outcome) up to date on
//! every applied move.
//!
//! # Example
//!
//! ```
//! use chess_core::Color;
//! use chess_engine::{legal_moves, Position};
//!
//! let position = Position::startpos();
//! let moves = legal_moves(&position, Color::White);
//! assert_eq!(moves.len(), 20);
//! ```

mod movegen;
mod perft;
mod position;

pub use movegen::{
    has_any_legal_move, is_in_check, is_square_attacked, legal_moves, legal_moves_from,
};
pub use perft::{perft, perft_divide};
pub use position::{CastlingRights, MoveError, Outcome, Position};
