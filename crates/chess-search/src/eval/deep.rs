//! The top evaluation layer for the `Superhuman` tier.
//!
//! Every sub-term here is declared and wired into the dispatch but
//! currently contributes nothing. Keep them callable: the dispatch shape
//! is part of the evaluator's interface, and future detection logic
//! slots in here without touching the tier plumbing.

use chess_core::{Color, Move};
use chess_engine::Position;

/// Sum of the deep positional, tactical, and prophylactic layers.
pub(super) fn superhuman_terms(position: &Position) -> i32 {
    deep_positional(position) + advanced_tactics(position) + prophylaxis(position)
}

fn deep_positional(position: &Position) -> i32 {
    long_term_planning(position) + structural_weaknesses(position) + dynamic_factors(position)
}

fn advanced_tactics(position: &Position) -> i32 {
    deflection(position) + decoy(position) + interference(position) + zwischenzug(position)
}

/// Evaluates measures against the opponent's plans.
fn prophylaxis(position: &Position) -> i32 {
    let opponent = position.side_to_move().opposite();
    let threats = opponent_threats(position, opponent);
    preventive_measures(position, &threats)
}

fn deflection(_position: &Position) -> i32 {
    0
}

fn decoy(_position: &Position) -> i32 {
    0
}

fn interference(_position: &Position) -> i32 {
    0
}

fn zwischenzug(_position: &Position) -> i32 {
    0
}

fn long_term_planning(_position: &Position) -> i32 {
    0
}

fn structural_weaknesses(_position: &Position) -> i32 {
    0
}

fn dynamic_factors(_position: &Position) -> i32 {
    0
}

fn opponent_threats(_position: &Position, _color: Color) -> Vec<Move> {
    Vec::new()
}

fn preventive_measures(_position: &Position, _threats: &[Move]) -> i32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_is_inert() {
        let position = Position::startpos();
        assert_eq!(superhuman_terms(&position), 0);

        let tactical =
            Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4")
                .unwrap();
        assert_eq!(superhuman_terms(&tactical), 0);
    }
}
