//! Static position evaluation.
//!
//! Scores are white-positive centipawns. The base term (material plus
//! piece-square placement) is always active; the configured [`Strength`]
//! tier enables additional layers on top:
//!
//! - `Hard` and up: per-piece mobility/safety and minor structural
//!   bonuses
//! - `Insane` and up: king safety, pawn structure, mobility differential,
//!   and tactical-pattern scanning
//! - `Grandmaster` and up: piece coordination, dynamic piece values,
//!   space and control accounting, endgame knowledge
//! - `Superhuman`: a further layer whose sub-terms are declared but inert

mod activity;
mod deep;
mod master;
mod tables;
mod tactics;

use chess_core::Color;
use chess_engine::{Outcome, Position};

use crate::Strength;

pub use tables::{piece_value, placement_value};

/// Score returned for a checkmated position (white-positive).
pub const MATE_SCORE: i32 = 100_000;

/// The board counts as an endgame below this many pieces.
const ENDGAME_PIECE_THRESHOLD: usize = 16;

/// Evaluates a position, positive favoring White.
///
/// Terminal positions short-circuit to the mate score (or 0 for a draw),
/// bypassing the additive terms.
pub fn evaluate(position: &Position, strength: Strength) -> i32 {
    if let Some(outcome) = position.outcome() {
        return match outcome {
            Outcome::WhiteWins => MATE_SCORE,
            Outcome::BlackWins => -MATE_SCORE,
            Outcome::Draw => 0,
        };
    }

    let total_pieces = position.piece_count();
    let endgame = total_pieces < ENDGAME_PIECE_THRESHOLD;
    let mut score = 0;

    for (sq, piece) in position.pieces() {
        let mut piece_score =
            piece_value(piece.kind) + placement_value(piece.kind, piece.color, sq, endgame);

        if strength >= Strength::Hard {
            piece_score += activity::piece_bonus(position, sq, piece);
        }
        if strength >= Strength::Grandmaster {
            piece_score += master::piece_bonus(position, sq, piece, total_pieces);
        }

        score += match piece.color {
            Color::White => piece_score,
            Color::Black => -piece_score,
        };
    }

    if strength >= Strength::Insane {
        score += activity::king_safety(position);
        score += activity::pawn_structure(position);
        score += activity::mobility_differential(position);
        score += tactics::tactical_themes(position);

        if strength >= Strength::Grandmaster {
            score += master::strategy(position);
            score += master::endgame_knowledge(position, total_pieces);
            score += master::positional_concepts(position);
        }

        if strength >= Strength::Superhuman {
            score += deep::superhuman_terms(position);
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced_at_every_tier() {
        let position = Position::startpos();
        for strength in [
            Strength::Easy,
            Strength::Medium,
            Strength::Hard,
            Strength::Insane,
            Strength::Grandmaster,
            Strength::Superhuman,
        ] {
            assert_eq!(evaluate(&position, strength), 0, "{:?}", strength);
        }
    }

    #[test]
    fn missing_queen_is_a_big_deficit() {
        let position =
            Position::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let score = evaluate(&position, Strength::Easy);
        assert!(score > 800, "got {}", score);
    }

    #[test]
    fn checkmate_short_circuits_to_mate_score() {
        let mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 3")
                .unwrap();
        assert!(mated.is_over());
        assert_eq!(evaluate(&mated, Strength::Easy), -MATE_SCORE);
        assert_eq!(evaluate(&mated, Strength::Superhuman), -MATE_SCORE);
    }

    #[test]
    fn stalemate_short_circuits_to_zero() {
        let stalemate = Position::from_fen("k7/8/1Q6/8/8/8/8/K7 b - - 0 1").unwrap();
        assert!(stalemate.is_over());
        assert_eq!(evaluate(&stalemate, Strength::Grandmaster), 0);
    }

    #[test]
    fn material_dominates_across_tiers() {
        // A rook up should stay clearly winning whatever heuristics are
        // stacked on top.
        let position = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        for strength in [Strength::Easy, Strength::Insane, Strength::Superhuman] {
            assert!(evaluate(&position, strength) > 300, "{:?}", strength);
        }
    }
}
