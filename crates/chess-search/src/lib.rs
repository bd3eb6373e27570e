//! Adversarial search engine for chess.
//!
//! This crate selects a move for the side to play using:
//! - an opening-book stage for the first moves of a game
//! - iterative-deepening alpha-beta search with aspiration windows and
//!   principal-variation search
//! - quiescence search over capture sequences at the leaves
//! - a transposition table plus killer-move and history-based move
//!   ordering
//! - a tiered static evaluator whose heuristic layers are enabled
//!   progressively by the configured [`Strength`]
//!
//! The whole engine is single-threaded and cooperative: a move-selection
//! request runs to completion, checking its time budget every fixed
//! number of node expansions and falling back to the best fully-searched
//! move when the budget runs out.
//!
//! # Example
//!
//! ```
//! use chess_engine::Position;
//! use chess_search::{SearchConfig, Searcher, Strength};
//!
//! let position = Position::startpos();
//! let mut searcher = Searcher::new(SearchConfig::for_strength(Strength::Easy));
//! let mv = searcher.choose_move(&position);
//! assert!(mv.is_some());
//! ```

mod book;
pub mod eval;
mod ordering;
mod search;
mod strength;
mod tt;

pub use eval::{evaluate, MATE_SCORE};
pub use search::Searcher;
pub use strength::{SearchConfig, Strength};
pub use tt::{Bound, TranspositionTable, TtEntry};
