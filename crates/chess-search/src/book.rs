//! Opening-book stage of move selection.

use chess_core::Move;
use chess_engine::Position;
use chess_openings::MoveDatabase;
use rand::Rng;

use crate::Strength;

/// Attempts a book move for the current position.
///
/// The book is only consulted while the game history is shorter than the
/// tier's ceiling. Candidates are filtered to the currently-legal moves;
/// the strongest tiers pick among them weighted by book frequency, lower
/// tiers pick uniformly.
pub(crate) fn book_move<R: Rng>(
    book: &MoveDatabase,
    position: &Position,
    legal: &[Move],
    strength: Strength,
    rng: &mut R,
) -> Option<Move> {
    if position.history().len() >= strength.book_move_limit() {
        return None;
    }

    let key = position
        .history()
        .iter()
        .map(|m| m.to_uci())
        .collect::<Vec<_>>()
        .join(" ");

    let candidates = book.lookup(&key)?;
    let playable: Vec<_> = candidates
        .iter()
        .filter(|c| legal.iter().any(|m| m.to_uci() == c.uci))
        .cloned()
        .collect();
    if playable.is_empty() {
        return None;
    }

    let picked = if strength >= Strength::Grandmaster {
        MoveDatabase::select_weighted(&playable, rng)
    } else {
        MoveDatabase::select_uniform(&playable, rng)
    }?;

    legal.iter().find(|m| m.to_uci() == picked.uci).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;
    use chess_engine::legal_moves;
    use chess_openings::builtin_database;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn book_covers_the_opening() {
        let book = builtin_database();
        let position = Position::startpos();
        let legal = legal_moves(&position, Color::White);
        let mut rng = StdRng::seed_from_u64(1);

        let mv = book_move(&book, &position, &legal, Strength::Medium, &mut rng).unwrap();
        assert!(legal.iter().any(|m| m.same_squares(mv)));
    }

    #[test]
    fn book_respects_ply_ceiling() {
        let book = builtin_database();
        let mut position = Position::startpos();
        // Play past the Easy-tier ceiling of 4 plies.
        for uci in ["e2e4", "e7e5", "g1f3", "b8c6"] {
            let mv = legal_moves(&position, position.side_to_move())
                .into_iter()
                .find(|m| m.to_uci() == uci)
                .unwrap();
            position.apply_move(mv);
        }
        let legal = legal_moves(&position, position.side_to_move());
        let mut rng = StdRng::seed_from_u64(1);

        assert!(book_move(&book, &position, &legal, Strength::Easy, &mut rng).is_none());
        // Higher tiers still find the Italian/Spanish continuations.
        assert!(book_move(&book, &position, &legal, Strength::Superhuman, &mut rng).is_some());
    }

    #[test]
    fn book_misses_unknown_positions() {
        let book = builtin_database();
        let mut position = Position::startpos();
        for uci in ["a2a3", "h7h6"] {
            let mv = legal_moves(&position, position.side_to_move())
                .into_iter()
                .find(|m| m.to_uci() == uci)
                .unwrap();
            position.apply_move(mv);
        }
        let legal = legal_moves(&position, position.side_to_move());
        let mut rng = StdRng::seed_from_u64(1);

        assert!(book_move(&book, &position, &legal, Strength::Medium, &mut rng).is_none());
    }

    #[test]
    fn book_filters_to_legal_moves() {
        // A book whose only candidate is not legal in the position.
        let mut book = MoveDatabase::new();
        book.add_position("", vec![chess_openings::OpeningMove::new("e2e5", 10)]);
        let position = Position::startpos();
        let legal = legal_moves(&position, Color::White);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(book_move(&book, &position, &legal, Strength::Medium, &mut rng).is_none());
    }
}
