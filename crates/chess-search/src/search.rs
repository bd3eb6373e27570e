//! Iterative-deepening alpha-beta search.
//!
//! The searcher runs one move-selection request at a time: an opening
//! book probe, then deepening passes with aspiration windows around the
//! previous score, each pass a principal-variation search over cloned
//! positions with a transposition table, killer ordering, and a
//! capture-only quiescence search at the leaves. Time is enforced
//! cooperatively: the node counter is checked every fixed interval and
//! an expired budget unwinds the search to the last completed depth.

use std::time::{Duration, Instant};

use chess_core::{Color, Move};
use chess_engine::{legal_moves, Outcome, Position};
use chess_openings::{builtin_database, MoveDatabase};

use crate::book;
use crate::eval::{evaluate, MATE_SCORE};
use crate::ordering::{order_moves, HistoryTable, KillerTable};
use crate::strength::SearchConfig;
use crate::tt::{Bound, TranspositionTable, TtEntry};

/// Window sentinel; mate scores stay well below it so window arithmetic
/// never overflows.
const INFINITY: i32 = 1_000_000;

/// Half-width of the aspiration window used from depth 4 on.
const ASPIRATION_WINDOW: i32 = 50;

/// Maximum quiescence recursion below a leaf.
const QUIESCENCE_DEPTH: u8 = 4;

/// Nodes between time-budget checks.
const TIME_CHECK_INTERVAL: u64 = 1000;

/// Scores at or above this are treated as mate and stop the deepening.
const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

/// The search engine. Holds the opening book and the caches that persist
/// across move selections (transposition table, killer and history
/// tables).
pub struct Searcher {
    config: SearchConfig,
    book: MoveDatabase,
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    nodes: u64,
    start_time: Instant,
    deadline: Instant,
    stopped: bool,
}

impl Searcher {
    /// Creates a searcher with the built-in opening book.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_book(config, builtin_database())
    }

    /// Creates a searcher with a custom opening book.
    pub fn with_book(config: SearchConfig, book: MoveDatabase) -> Self {
        let now = Instant::now();
        Searcher {
            config,
            book,
            tt: TranspositionTable::new(),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            nodes: 0,
            start_time: now,
            deadline: now,
            stopped: false,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Number of nodes expanded by the last move selection.
    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    /// Selects a move for the side to play.
    ///
    /// Returns `None` exactly when the side to move has no legal moves
    /// (the position's terminal flags already reflect this). A single
    /// legal move is returned without searching; otherwise the opening
    /// book is consulted, and failing that the iterative-deepening
    /// search runs until its depth ceiling, a mate score, or the time
    /// budget. The returned move is always drawn from the legal move
    /// list, even when the budget expires mid-search.
    pub fn choose_move(&mut self, position: &Position) -> Option<Move> {
        let moves = legal_moves(position, position.side_to_move());
        if moves.is_empty() {
            return None;
        }
        if moves.len() == 1 {
            return Some(moves[0]);
        }

        let mut rng = rand::thread_rng();
        if let Some(book_mv) =
            book::book_move(&self.book, position, &moves, self.config.strength, &mut rng)
        {
            return Some(book_mv);
        }

        self.nodes = 0;
        self.stopped = false;
        self.start_time = Instant::now();
        self.deadline = self.start_time + self.config.time_budget;
        self.tt.maintain();

        // Fall back to the first legal move if depth 1 never completes.
        let mut best_move = moves[0];
        let mut best_score = -INFINITY;

        for depth in 1..=self.config.max_depth {
            if self.stopped {
                break;
            }

            let (alpha, beta) = if depth >= 4 {
                (
                    best_score - ASPIRATION_WINDOW,
                    best_score + ASPIRATION_WINDOW,
                )
            } else {
                (-INFINITY, INFINITY)
            };

            let mut result = self.search_root(position, &moves, depth, alpha, beta);
            if self.stopped {
                break;
            }

            // Re-search with an unbounded window if the score fell
            // outside the aspiration window.
            if result.1 <= alpha || result.1 >= beta {
                result = self.search_root(position, &moves, depth, -INFINITY, INFINITY);
                if self.stopped {
                    break;
                }
            }

            if let (Some(mv), score) = result {
                best_move = mv;
                best_score = score;
            }

            if best_score.abs() >= MATE_THRESHOLD {
                break;
            }
        }

        Some(best_move)
    }

    /// One full-width pass at the root: returns the best move and its
    /// score, or `(None, 0)` when aborted mid-pass.
    fn search_root(
        &mut self,
        position: &Position,
        moves: &[Move],
        depth: u8,
        mut alpha: i32,
        beta: i32,
    ) -> (Option<Move>, i32) {
        let key = position.transposition_key();
        let tt_move = self.tt.probe(&key).and_then(|entry| entry.best_move);
        let ordered = order_moves(moves, tt_move, depth, &self.killers, &self.history);

        let alpha_orig = alpha;
        let mut best_move = None;
        let mut best_score = -INFINITY;

        for (i, mv) in ordered.iter().enumerate() {
            let child = position.make_move(*mv);
            let score = if i == 0 {
                -self.alpha_beta(&child, depth - 1, -beta, -alpha, 1)
            } else {
                let probe = -self.alpha_beta(&child, depth - 1, -alpha - 1, -alpha, 1);
                if probe > alpha && probe < beta {
                    -self.alpha_beta(&child, depth - 1, -beta, -alpha, 1)
                } else {
                    probe
                }
            };
            if self.stopped {
                return (None, 0);
            }

            if score > best_score {
                best_score = score;
                best_move = Some(*mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.killers.add(depth, *mv);
                break;
            }
        }

        self.store_entry(key, depth, best_score, alpha_orig, beta, best_move);
        (best_move, best_score)
    }

    /// Negamax alpha-beta with principal-variation search. Scores are
    /// relative to the side to move at this node.
    fn alpha_beta(
        &mut self,
        position: &Position,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        ply: u8,
    ) -> i32 {
        if self.stopped {
            return 0;
        }
        self.tick();

        // Terminal positions score by distance from the root so the
        // search prefers faster mates and slower losses.
        if let Some(outcome) = position.outcome() {
            return match outcome {
                Outcome::Draw => 0,
                _ => -(MATE_SCORE - ply as i32),
            };
        }

        let key = position.transposition_key();
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(&key) {
            tt_move = entry.best_move;
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    return entry.score;
                }
            }
        }

        if depth == 0 {
            return self.quiescence(position, alpha, beta, QUIESCENCE_DEPTH);
        }

        let moves = legal_moves(position, position.side_to_move());
        let ordered = order_moves(&moves, tt_move, depth, &self.killers, &self.history);

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for (i, mv) in ordered.iter().enumerate() {
            let child = position.make_move(*mv);
            let score = if i == 0 {
                -self.alpha_beta(&child, depth - 1, -beta, -alpha, ply + 1)
            } else {
                let probe = -self.alpha_beta(&child, depth - 1, -alpha - 1, -alpha, ply + 1);
                if probe > alpha && probe < beta {
                    -self.alpha_beta(&child, depth - 1, -beta, -alpha, ply + 1)
                } else {
                    probe
                }
            };
            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(*mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.killers.add(depth, *mv);
                break;
            }
        }

        self.store_entry(key, depth, best_score, alpha_orig, beta, best_move);
        best_score
    }

    /// Capture-only search below the horizon. The stand-pat evaluation
    /// bounds the score: the side to move can never be forced below the
    /// value of simply not capturing.
    fn quiescence(&mut self, position: &Position, mut alpha: i32, beta: i32, depth: u8) -> i32 {
        self.tick();
        if depth == 0 || self.stopped {
            return self.eval_relative(position);
        }

        let stand_pat = self.eval_relative(position);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        for mv in legal_moves(position, position.side_to_move()) {
            if mv.captured.is_none() {
                continue;
            }
            let child = position.make_move(mv);
            let score = -self.quiescence(&child, -beta, -alpha, depth - 1);
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    fn store_entry(
        &mut self,
        key: String,
        depth: u8,
        score: i32,
        alpha_orig: i32,
        beta: i32,
        best_move: Option<Move>,
    ) {
        let bound = if score <= alpha_orig {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(
            key,
            TtEntry {
                depth,
                score,
                bound,
                best_move,
            },
        );
    }

    fn eval_relative(&self, position: &Position) -> i32 {
        let white_score = evaluate(position, self.config.strength);
        match position.side_to_move() {
            Color::White => white_score,
            Color::Black => -white_score,
        }
    }

    /// Cooperative time check, run every `TIME_CHECK_INTERVAL` node
    /// expansions. A deep probe can overrun the budget until the next
    /// check; the iterative-deepening loop absorbs the overshoot.
    fn tick(&mut self) {
        self.nodes += 1;
        if self.nodes % TIME_CHECK_INTERVAL == 0 && Instant::now() >= self.deadline {
            self.stopped = true;
        }
    }

    /// Elapsed time of the last move selection.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Strength;

    fn searcher(strength: Strength) -> Searcher {
        Searcher::new(SearchConfig::for_strength(strength))
    }

    #[test]
    fn quiescence_never_scores_below_stand_pat() {
        // White to move with a queen en prise: stand pat floors the score.
        let position =
            Position::from_fen("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1").unwrap();
        let mut s = searcher(Strength::Easy);
        s.deadline = Instant::now() + Duration::from_secs(60);

        let stand_pat = s.eval_relative(&position);
        let score = s.quiescence(&position, -INFINITY, INFINITY, QUIESCENCE_DEPTH);
        assert!(score >= stand_pat);
    }

    #[test]
    fn alpha_beta_sees_hanging_material() {
        let position =
            Position::from_fen("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1").unwrap();
        let mut s = searcher(Strength::Easy);
        s.deadline = Instant::now() + Duration::from_secs(60);

        let score = s.alpha_beta(&position, 2, -INFINITY, INFINITY, 0);
        // Capturing the queen leaves White at least a rook ahead.
        assert!(score > 300);
    }

    #[test]
    fn mate_scores_prefer_shorter_mates() {
        // Mated-in-zero from the mover's perspective at increasing plies.
        let mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 3")
                .unwrap();
        let mut s = searcher(Strength::Easy);
        s.deadline = Instant::now() + Duration::from_secs(60);

        let near = s.alpha_beta(&mated, 1, -INFINITY, INFINITY, 1);
        let far = s.alpha_beta(&mated, 1, -INFINITY, INFINITY, 5);
        assert!(near < far);
        assert!(near <= -MATE_THRESHOLD);
    }

    #[test]
    fn search_stores_and_reuses_exact_entries() {
        let position =
            Position::from_fen("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1").unwrap();
        let mut s = searcher(Strength::Easy);
        s.deadline = Instant::now() + Duration::from_secs(60);

        let depth = 3;
        let first = s.alpha_beta(&position, depth, -INFINITY, INFINITY, 0);
        let entry = s.tt.probe(&position.transposition_key()).copied().unwrap();
        assert_eq!(entry.depth, depth);
        assert_eq!(entry.bound, Bound::Exact);

        // A fresh search from the same position reproduces the score.
        let second = s.alpha_beta(&position, depth, -INFINITY, INFINITY, 0);
        assert_eq!(first, second);
    }
}
