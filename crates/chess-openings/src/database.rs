//! Opening database storage and lookup.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::opening::OpeningMove;

/// Errors that can occur when loading an opening database.
#[derive(Debug, Error)]
pub enum BookError {
    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A move database that maps game prefixes to candidate moves.
///
/// Keys are the moves played so far, space-joined in UCI notation; the
/// empty string keys the starting position.
#[derive(Debug, Clone, Default)]
pub struct MoveDatabase {
    positions: HashMap<String, Vec<OpeningMove>>,
}

impl MoveDatabase {
    /// Creates a new empty move database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a database from a JSON object mapping prefix keys to moves.
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let positions: HashMap<String, Vec<OpeningMove>> = serde_json::from_str(json)?;
        Ok(Self { positions })
    }

    /// Returns true if the database is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the number of positions in the database.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Adds a position with its candidate moves to the database.
    pub fn add_position(&mut self, position_key: impl Into<String>, moves: Vec<OpeningMove>) {
        self.positions.insert(position_key.into(), moves);
    }

    /// Looks up candidate moves for a position.
    #[must_use]
    pub fn lookup(&self, position_key: &str) -> Option<&[OpeningMove]> {
        self.positions.get(position_key).map(|v| v.as_slice())
    }

    /// Selects a random move from the candidates, weighted by their weights.
    ///
    /// Falls back to uniform selection if all weights are zero.
    pub fn select_weighted<'a, R: Rng>(
        moves: &'a [OpeningMove],
        rng: &mut R,
    ) -> Option<&'a OpeningMove> {
        if moves.is_empty() {
            return None;
        }

        let total_weight: u32 = moves.iter().map(|m| m.weight).sum();
        if total_weight == 0 {
            return moves.choose(rng);
        }

        let mut choice = rng.gen_range(0..total_weight);
        for mv in moves {
            if choice < mv.weight {
                return Some(mv);
            }
            choice -= mv.weight;
        }

        moves.last()
    }

    /// Selects a random move from the candidates, ignoring weights.
    pub fn select_uniform<'a, R: Rng>(
        moves: &'a [OpeningMove],
        rng: &mut R,
    ) -> Option<&'a OpeningMove> {
        moves.choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_db() -> MoveDatabase {
        let mut db = MoveDatabase::new();
        db.add_position(
            "",
            vec![OpeningMove::new("e2e4", 10), OpeningMove::new("d2d4", 5)],
        );
        db.add_position("e2e4", vec![OpeningMove::new("e7e5", 1)]);
        db
    }

    #[test]
    fn lookup_by_prefix() {
        let db = sample_db();
        assert_eq!(db.lookup("").unwrap().len(), 2);
        assert_eq!(db.lookup("e2e4").unwrap()[0].uci, "e7e5");
        assert!(db.lookup("a2a3").is_none());
    }

    #[test]
    fn weighted_selection_respects_weights() {
        let moves = vec![OpeningMove::new("e2e4", 100), OpeningMove::new("d2d4", 0)];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = MoveDatabase::select_weighted(&moves, &mut rng).unwrap();
            assert_eq!(picked.uci, "e2e4");
        }
    }

    #[test]
    fn weighted_selection_zero_weights_falls_back_to_uniform() {
        let moves = vec![OpeningMove::new("e2e4", 0), OpeningMove::new("d2d4", 0)];
        let mut rng = StdRng::seed_from_u64(7);
        assert!(MoveDatabase::select_weighted(&moves, &mut rng).is_some());
    }

    #[test]
    fn selection_from_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(MoveDatabase::select_weighted(&[], &mut rng).is_none());
        assert!(MoveDatabase::select_uniform(&[], &mut rng).is_none());
    }

    #[test]
    fn from_json_roundtrip() {
        let json = r#"{
            "": [{"uci": "e2e4", "weight": 10}],
            "e2e4": [{"uci": "c7c5", "weight": 7}, {"uci": "e7e5", "weight": 8}]
        }"#;
        let db = MoveDatabase::from_json(json).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.lookup("e2e4").unwrap().len(), 2);
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(MoveDatabase::from_json("not json").is_err());
    }
}
