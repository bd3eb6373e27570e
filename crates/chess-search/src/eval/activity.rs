//! Mobility, safety, and structural evaluation terms.
//!
//! The per-piece bonuses activate at the `Hard` tier; the aggregate terms
//! (king safety, pawn structure, mobility differential) at `Insane`.

use chess_core::{Color, File, Piece, PieceKind, Square};
use chess_engine::{is_square_attacked, legal_moves, legal_moves_from, Position};

use super::tables::piece_value;

/// Per-piece mobility, safety, and structural bonuses.
pub(super) fn piece_bonus(position: &Position, sq: Square, piece: Piece) -> i32 {
    let mut bonus = 0;

    bonus += legal_moves_from(position, sq).len() as i32 * 3;

    let attacked = is_square_attacked(position, sq, piece.color.opposite());
    let defended = is_square_attacked(position, sq, piece.color);
    if attacked && !defended {
        bonus -= piece_value(piece.kind) / 8;
    } else if defended {
        bonus += 5;
    }

    match piece.kind {
        PieceKind::Bishop => {
            if bishop_count(position, piece.color) >= 2 {
                bonus += 30;
            }
        }
        PieceKind::Rook => {
            if is_open_file(position, sq.file()) {
                bonus += 25;
            }
            if sq.rank().index() == seventh_rank(piece.color) {
                bonus += 20;
            }
        }
        PieceKind::Knight => {
            if is_knight_outpost(position, sq, piece.color) {
                bonus += 25;
            }
        }
        _ => {}
    }

    bonus
}

/// Pawn shield strength minus nearby enemy move density, white-positive.
pub(super) fn king_safety(position: &Position) -> i32 {
    king_safety_for(position, Color::White) - king_safety_for(position, Color::Black)
}

fn king_safety_for(position: &Position, color: Color) -> i32 {
    let king = position.king_square(color);
    let dir = color.pawn_direction();
    let mut safety = 0;

    for df in -1..=1 {
        if let Some(sq) = king.offset(dir, df) {
            if position.piece_at(sq) == Some(Piece::new(PieceKind::Pawn, color)) {
                safety += 10;
            }
        }
    }

    let enemy_moves = legal_moves(position, color.opposite());
    let near_king = enemy_moves
        .iter()
        .filter(|mv| {
            mv.to.rank().index().abs_diff(king.rank().index()) <= 2
                && mv.to.file().index().abs_diff(king.file().index()) <= 2
        })
        .count();
    safety -= near_king as i32 * 5;

    safety
}

/// Doubled, isolated, passed, and backward pawn accounting, white-positive.
pub(super) fn pawn_structure(position: &Position) -> i32 {
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let pawns: Vec<Square> = position
            .pieces()
            .filter(|(_, p)| p.kind == PieceKind::Pawn && p.color == color)
            .map(|(sq, _)| sq)
            .collect();

        let mut color_score = 0;
        for &pawn in &pawns {
            let same_file = pawns.iter().filter(|p| p.file() == pawn.file()).count();
            if same_file > 1 {
                color_score -= 10;
            }

            let has_neighbor = pawns
                .iter()
                .any(|p| p.file().index().abs_diff(pawn.file().index()) == 1);
            if !has_neighbor {
                color_score -= 15;
            }

            if is_passed_pawn(position, pawn, color) {
                color_score += 20 + relative_rank(pawn, color) * 10;
            }

            if is_backward_pawn(position, pawn, color) {
                color_score -= 12;
            }
        }

        score += match color {
            Color::White => color_score,
            Color::Black => -color_score,
        };
    }
    score
}

/// Aggregate legal-move-count differential, white-positive.
pub(super) fn mobility_differential(position: &Position) -> i32 {
    (mobility(position, Color::White) - mobility(position, Color::Black)) * 2
}

fn mobility(position: &Position, color: Color) -> i32 {
    position
        .pieces()
        .filter(|(_, p)| p.color == color && p.kind != PieceKind::King)
        .map(|(sq, _)| legal_moves_from(position, sq).len() as i32)
        .sum()
}

pub(super) fn bishop_count(position: &Position, color: Color) -> usize {
    position
        .pieces()
        .filter(|(_, p)| p.kind == PieceKind::Bishop && p.color == color)
        .count()
}

pub(super) fn is_open_file(position: &Position, file: File) -> bool {
    !position
        .pieces()
        .any(|(sq, p)| p.kind == PieceKind::Pawn && sq.file() == file)
}

fn seventh_rank(color: Color) -> u8 {
    match color {
        Color::White => 6,
        Color::Black => 1,
    }
}

/// A knight posted with pawn support from behind.
fn is_knight_outpost(position: &Position, sq: Square, color: Color) -> bool {
    let dir = color.pawn_direction();
    for df in [-1, 1] {
        if let Some(support) = sq.offset(-dir, df) {
            if position.piece_at(support) == Some(Piece::new(PieceKind::Pawn, color)) {
                return true;
            }
        }
    }
    false
}

/// Progress of a pawn toward promotion (0 = back rank, 7 = last rank).
pub(super) fn relative_rank(sq: Square, color: Color) -> i32 {
    match color {
        Color::White => sq.rank().index() as i32,
        Color::Black => 7 - sq.rank().index() as i32,
    }
}

fn is_passed_pawn(position: &Position, pawn: Square, color: Color) -> bool {
    let dir = color.pawn_direction();
    let mut rank = pawn.rank().index() as i8 + dir;
    while (0..8).contains(&rank) {
        for df in -1..=1i8 {
            let file = pawn.file().index() as i8 + df;
            if !(0..8).contains(&file) {
                continue;
            }
            if let Some(sq) = Square::from_coords(rank as u8, file as u8) {
                if position.piece_at(sq) == Some(Piece::new(PieceKind::Pawn, color.opposite())) {
                    return false;
                }
            }
        }
        rank += dir;
    }
    true
}

/// A pawn whose advance square is covered by the enemy while no friendly
/// pawn can support it from behind.
fn is_backward_pawn(position: &Position, pawn: Square, color: Color) -> bool {
    let dir = color.pawn_direction();
    let Some(advance) = pawn.offset(dir, 0) else {
        return false;
    };
    if !is_square_attacked(position, advance, color.opposite()) {
        return false;
    }
    for df in [-1, 1] {
        if let Some(support) = pawn.offset(-dir, df) {
            if position.piece_at(support) == Some(Piece::new(PieceKind::Pawn, color)) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn doubled_and_isolated_pawns_are_penalized() {
        // Doubled isolated e-pawns versus the same two pawns connected.
        let p = pos("4k3/8/8/8/4P3/4P3/8/4K3 w - - 0 1");
        let q = pos("4k3/8/8/8/8/3P4/4P3/4K3 w - - 0 1");
        assert!(pawn_structure(&q) > pawn_structure(&p));
    }

    #[test]
    fn passed_pawn_gains_with_advancement() {
        let far = pos("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        let close = pos("4k3/8/4P3/8/8/8/8/4K3 w - - 0 1");
        assert!(pawn_structure(&close) > pawn_structure(&far));
    }

    #[test]
    fn open_file_detection() {
        let p = pos("4k3/8/8/8/8/8/4P3/R3K3 w - - 0 1");
        assert!(is_open_file(&p, File::A));
        assert!(!is_open_file(&p, File::E));
    }

    #[test]
    fn shielded_king_is_safer() {
        let shielded = pos("4k3/8/8/8/8/8/3PPP2/4K3 w - - 0 1");
        let bare = pos("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(king_safety(&shielded) > king_safety(&bare));
    }

    #[test]
    fn side_with_more_mobility_scores_higher() {
        // A centralized queen against a cornered king.
        let p = pos("k7/8/8/8/3Q4/8/8/4K3 w - - 0 1");
        assert!(mobility_differential(&p) > 0);
    }
}
