//! End-to-end tests for move selection.

use std::time::Duration;

use chess_engine::{legal_moves, Position};
use chess_search::{SearchConfig, Searcher, Strength};

fn from_fen(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn is_legal(position: &Position, mv: chess_core::Move) -> bool {
    legal_moves(position, position.side_to_move())
        .iter()
        .any(|m| *m == mv)
}

#[test]
fn startpos_move_is_legal_at_every_tier() {
    let position = Position::startpos();
    for strength in [
        Strength::Easy,
        Strength::Medium,
        Strength::Hard,
        Strength::Insane,
        Strength::Grandmaster,
        Strength::Superhuman,
    ] {
        let mut searcher = Searcher::new(SearchConfig::for_strength(strength));
        let mv = searcher.choose_move(&position).unwrap();
        assert!(is_legal(&position, mv), "{:?} played {}", strength, mv);
    }
}

#[test]
fn startpos_move_comes_from_the_book() {
    let position = Position::startpos();
    let mut searcher = Searcher::new(SearchConfig::for_strength(Strength::Medium));
    let mv = searcher.choose_move(&position).unwrap().to_uci();
    assert!(
        ["e2e4", "d2d4", "g1f3", "c2c4", "b1c3"].contains(&mv.as_str()),
        "unexpected opening move {}",
        mv
    );
}

#[test]
fn finds_mate_in_one() {
    let position = from_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1");
    let mut searcher = Searcher::new(SearchConfig::for_strength(Strength::Medium));
    let mv = searcher.choose_move(&position).unwrap();
    assert_eq!(mv.to_uci(), "a1a8");

    let mated = position.make_move(mv);
    assert!(mated.is_over());
}

#[test]
fn single_legal_move_is_returned_without_search() {
    let position = from_fen("k7/8/KP6/8/8/8/8/8 b - - 0 1");
    assert_eq!(legal_moves(&position, position.side_to_move()).len(), 1);

    let mut searcher = Searcher::new(SearchConfig::for_strength(Strength::Superhuman));
    let mv = searcher.choose_move(&position).unwrap();
    assert_eq!(mv.to_uci(), "a8b8");
    assert_eq!(searcher.nodes_searched(), 0);
}

#[test]
fn finished_game_returns_no_move() {
    let mated = from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 3");
    assert!(mated.is_over());

    let mut searcher = Searcher::new(SearchConfig::for_strength(Strength::Medium));
    assert!(searcher.choose_move(&mated).is_none());
}

#[test]
fn captures_hanging_queen() {
    let position = from_fen("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1");
    let mut searcher = Searcher::new(SearchConfig::for_strength(Strength::Medium));
    let mv = searcher.choose_move(&position).unwrap();
    assert_eq!(mv.to_uci(), "d2d5");
}

#[test]
fn fresh_searchers_agree_on_forced_positions() {
    let position = from_fen("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1");
    let mut a = Searcher::new(SearchConfig::for_strength(Strength::Medium));
    let mut b = Searcher::new(SearchConfig::for_strength(Strength::Medium));
    assert_eq!(
        a.choose_move(&position).map(|m| m.to_uci()),
        b.choose_move(&position).map(|m| m.to_uci())
    );
}

#[test]
fn exhausted_time_budget_still_yields_a_legal_move() {
    let position = from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    );
    let config = SearchConfig {
        strength: Strength::Easy,
        max_depth: 12,
        time_budget: Duration::from_millis(10),
    };
    let mut searcher = Searcher::new(config);
    let mv = searcher.choose_move(&position).unwrap();
    assert!(is_legal(&position, mv));
    assert!(searcher.nodes_searched() > 0);
}

#[test]
fn search_runs_when_book_has_no_line() {
    // An offbeat position the built-in book does not know.
    let mut position = Position::startpos();
    for uci in ["a2a3", "h7h6", "h2h3"] {
        let mv = legal_moves(&position, position.side_to_move())
            .into_iter()
            .find(|m| m.to_uci() == uci)
            .unwrap();
        position.apply_move(mv);
    }

    let mut searcher = Searcher::new(SearchConfig::for_strength(Strength::Easy));
    let mv = searcher.choose_move(&position).unwrap();
    assert!(is_legal(&position, mv));
    assert!(searcher.nodes_searched() > 0);
}
