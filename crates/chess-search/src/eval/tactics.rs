//! Tactical-pattern scanning for the `Insane` tier and above.

use chess_core::{Color, Piece, PieceKind, Square};
use chess_engine::Position;

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Scans the board for pins, knight forks, and discovered attacks,
/// white-positive.
pub(super) fn tactical_themes(position: &Position) -> i32 {
    let mut score = 0;

    for (sq, piece) in position.pieces() {
        if is_pinned(position, sq, piece.color) {
            score += match piece.color {
                Color::White => -15,
                Color::Black => 15,
            };
        }

        if fork_target_count(position, sq, piece) >= 2 {
            score += match piece.color {
                Color::White => 30,
                Color::Black => -30,
            };
        }

        if has_discovered_attack(position, sq, piece) {
            score += match piece.color {
                Color::White => 20,
                Color::Black => -20,
            };
        }
    }

    score
}

/// Ray-scan pin test: a friendly blocker followed by an enemy slider of
/// matching geometry on any of the eight rays from this piece.
fn is_pinned(position: &Position, sq: Square, color: Color) -> bool {
    for &(dr, df) in ORTHOGONAL.iter().chain(DIAGONAL.iter()) {
        let mut blocker = false;
        let mut attacker: Option<Piece> = None;

        let mut current = sq;
        while let Some(next) = current.offset(dr, df) {
            if let Some(piece) = position.piece_at(next) {
                if piece.color == color {
                    if blocker {
                        break;
                    }
                    blocker = true;
                } else {
                    attacker = Some(piece);
                    break;
                }
            }
            current = next;
        }

        if let (true, Some(attacker)) = (blocker, attacker) {
            let diagonal = dr != 0 && df != 0;
            let matches_geometry = if diagonal {
                matches!(attacker.kind, PieceKind::Bishop | PieceKind::Queen)
            } else {
                matches!(attacker.kind, PieceKind::Rook | PieceKind::Queen)
            };
            if matches_geometry {
                return true;
            }
        }
    }
    false
}

/// Number of high-value enemy pieces (king, queen, rook) a knight on
/// this square attacks simultaneously.
fn fork_target_count(position: &Position, sq: Square, piece: Piece) -> usize {
    if piece.kind != PieceKind::Knight {
        return 0;
    }
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(dr, df)| sq.offset(dr, df))
        .filter_map(|target| position.piece_at(target))
        .filter(|target| {
            target.color != piece.color
                && matches!(
                    target.kind,
                    PieceKind::King | PieceKind::Queen | PieceKind::Rook
                )
        })
        .count()
}

/// Discovered-attack detection hook. Currently contributes nothing.
fn has_discovered_attack(_position: &Position, _sq: Square, _piece: Piece) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn knight_fork_on_king_and_rook() {
        // The d5 knight attacks both the e7 king and the c7 rook.
        let p = pos("8/2r1k3/8/3N4/8/8/8/K7 w - - 0 1");
        assert_eq!(tactical_themes(&p), 30);
    }

    #[test]
    fn pinned_piece_is_penalized() {
        // White knight on c3 screened by the d3 pawn from the h3 rook:
        // blocker plus matching enemy slider on the rank.
        let p = pos("4k3/8/8/8/8/2NP3r/8/K7 w - - 0 1");
        assert!(tactical_themes(&p) <= -15);
    }

    #[test]
    fn quiet_position_has_no_tactics() {
        let p = pos("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(tactical_themes(&p), 0);
    }
}
