//! Built-in opening book data.
//!
//! A compact repertoire compiled into the library: principled first moves
//! for White, the main defenses to 1.e4 and 1.d4, and continuation lines
//! for the most common structures, weighted by frequency of play.

use crate::database::MoveDatabase;
use crate::opening::OpeningMove;

/// Creates the built-in opening database.
#[must_use]
pub fn builtin_database() -> MoveDatabase {
    let mut db = MoveDatabase::new();

    // Starting position - first moves for White
    db.add_position(
        "",
        vec![
            OpeningMove::new("e2e4", 10), // King's Pawn
            OpeningMove::new("d2d4", 10), // Queen's Pawn
            OpeningMove::new("g1f3", 8),  // King's Knight
            OpeningMove::new("c2c4", 7),  // English
            OpeningMove::new("b1c3", 6),  // Queen's Knight
        ],
    );

    // Defenses to 1.e4
    db.add_position(
        "e2e4",
        vec![
            OpeningMove::new("e7e5", 10), // Open Game
            OpeningMove::new("c7c5", 9),  // Sicilian
            OpeningMove::new("e7e6", 7),  // French
            OpeningMove::new("c7c6", 6),  // Caro-Kann
            OpeningMove::new("g8f6", 5),  // Alekhine
        ],
    );

    // Defenses to 1.d4
    db.add_position(
        "d2d4",
        vec![
            OpeningMove::new("d7d5", 10), // Closed Game
            OpeningMove::new("g8f6", 9),  // Indian Defenses
            OpeningMove::new("f7f5", 8),  // Dutch
            OpeningMove::new("g7g6", 7),  // King's Indian setup
        ],
    );

    // Open Game: 1.e4 e5
    db.add_position(
        "e2e4 e7e5",
        vec![
            OpeningMove::new("g1f3", 10), // King's Knight
            OpeningMove::new("f1c4", 4),  // Bishop's Opening
            OpeningMove::new("b1c3", 3),  // Vienna
        ],
    );

    // Sicilian: 1.e4 c5
    db.add_position(
        "e2e4 c7c5",
        vec![
            OpeningMove::new("g1f3", 10), // Open Sicilian
            OpeningMove::new("b1c3", 8),  // Closed Sicilian
        ],
    );

    // French: 1.e4 e6 2.d4
    db.add_position(
        "e2e4 e7e6",
        vec![
            OpeningMove::new("d2d4", 10),
            OpeningMove::new("b1c3", 4),
        ],
    );
    db.add_position(
        "e2e4 e7e6 d2d4",
        vec![
            OpeningMove::new("d7d5", 9), // French main line
            OpeningMove::new("b8c6", 8), // Classical setup
        ],
    );

    // Caro-Kann: 1.e4 c6 2.d4 d5
    db.add_position("e2e4 c7c6", vec![OpeningMove::new("d2d4", 10)]);
    db.add_position(
        "e2e4 c7c6 d2d4",
        vec![OpeningMove::new("d7d5", 10)],
    );

    // Closed Game: 1.d4 d5
    db.add_position(
        "d2d4 d7d5",
        vec![
            OpeningMove::new("c2c4", 10), // Queen's Gambit
            OpeningMove::new("g1f3", 6),
        ],
    );

    // Indian: 1.d4 Nf6
    db.add_position(
        "d2d4 g8f6",
        vec![
            OpeningMove::new("c2c4", 10),
            OpeningMove::new("g1f3", 7),
        ],
    );

    // Italian structure: 1.e4 e5 2.Nf3 Nc6
    db.add_position(
        "e2e4 e7e5 g1f3",
        vec![
            OpeningMove::new("b8c6", 10),
            OpeningMove::new("g8f6", 5), // Petrov
        ],
    );
    db.add_position(
        "e2e4 e7e5 g1f3 b8c6",
        vec![
            OpeningMove::new("f1c4", 8), // Italian
            OpeningMove::new("f1b5", 9), // Spanish
            OpeningMove::new("d2d4", 5), // Scotch
        ],
    );

    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_starting_position() {
        let db = builtin_database();
        let first = db.lookup("").unwrap();
        assert!(first.iter().any(|m| m.uci == "e2e4"));
        assert!(first.iter().any(|m| m.uci == "d2d4"));
    }

    #[test]
    fn builtin_covers_main_defenses() {
        let db = builtin_database();
        assert!(db.lookup("e2e4").is_some());
        assert!(db.lookup("d2d4").is_some());
        assert!(db.lookup("e2e4 c7c5").is_some());
        assert!(db.lookup("e2e4 e7e6 d2d4").is_some());
    }

    #[test]
    fn builtin_moves_are_valid_uci() {
        let db = builtin_database();
        for key in ["", "e2e4", "d2d4", "e2e4 e7e5 g1f3 b8c6"] {
            for mv in db.lookup(key).unwrap() {
                assert_eq!(mv.uci.len(), 4);
                assert!(mv.uci.is_ascii());
            }
        }
    }
}
