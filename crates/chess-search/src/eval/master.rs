//! Master-level evaluation terms for the `Grandmaster` tier and above:
//! piece coordination, dynamic piece values, space and control
//! accounting, and endgame knowledge.

use chess_core::{Color, Piece, PieceKind, Square};
use chess_engine::{is_square_attacked, legal_moves, legal_moves_from, Position};

use super::activity::{bishop_count, relative_rank};
use super::tables::piece_value;

/// Coordination, activity, and dynamic-value bonuses for one piece.
pub(super) fn piece_bonus(
    position: &Position,
    sq: Square,
    piece: Piece,
    total_pieces: usize,
) -> i32 {
    coordination(position, sq, piece)
        + capped_activity(position, sq, piece)
        + dynamic_value(sq, piece, total_pieces)
}

/// Synergy with nearby friendly pieces: doubled rooks, bishop batteries,
/// knight-bishop pairs.
fn coordination(position: &Position, sq: Square, piece: Piece) -> i32 {
    let mut bonus = 0;
    for (ally_sq, ally) in nearby_allies(position, sq, piece.color) {
        match piece.kind {
            PieceKind::Rook => {
                if ally.kind == PieceKind::Rook
                    && (ally_sq.rank() == sq.rank() || ally_sq.file() == sq.file())
                {
                    bonus += 15;
                }
            }
            PieceKind::Bishop => {
                if matches!(ally.kind, PieceKind::Bishop | PieceKind::Queen)
                    && on_same_diagonal(sq, ally_sq)
                {
                    bonus += 12;
                }
            }
            PieceKind::Knight => {
                if ally.kind == PieceKind::Bishop {
                    bonus += 8;
                }
            }
            _ => {}
        }
    }
    bonus
}

/// Control of key squares through this piece's moves, capped per piece.
fn capped_activity(position: &Position, sq: Square, piece: Piece) -> i32 {
    let mut activity = 0;
    for mv in legal_moves_from(position, sq) {
        if is_center(mv.to) {
            activity += 3;
        }
        if is_extended_center(mv.to) {
            activity += 2;
        }
        if is_enemy_territory(mv.to, piece.color) {
            activity += 2;
        }
    }
    activity.min(30)
}

/// Piece values shift with the game phase: kings and pawns gain weight as
/// material comes off, knights lose it, bishops gain it.
fn dynamic_value(sq: Square, piece: Piece, total_pieces: usize) -> i32 {
    let thinning = 32i32.saturating_sub(total_pieces as i32).max(0);
    match piece.kind {
        PieceKind::King => thinning * 50 / 32,
        PieceKind::Pawn => {
            let advancement = relative_rank(sq, piece.color);
            thinning * 20 / 32 + advancement * advancement * 2
        }
        PieceKind::Knight => -(thinning * 15) / 32,
        PieceKind::Bishop => thinning * 10 / 32,
        _ => 0,
    }
}

/// Space, weak squares, trade preferences, and initiative, white-positive.
pub(super) fn strategy(position: &Position) -> i32 {
    space_advantage(position)
        + weak_squares(position)
        + trade_offs(position)
        + initiative(position)
}

fn space_advantage(position: &Position) -> i32 {
    let mut white_space = 0;
    let mut black_space = 0;
    for file in 0..8 {
        for rank in 4..8 {
            if let Some(sq) = Square::from_coords(rank, file) {
                if is_square_attacked(position, sq, Color::White) {
                    white_space += 1;
                }
            }
        }
        for rank in 0..4 {
            if let Some(sq) = Square::from_coords(rank, file) {
                if is_square_attacked(position, sq, Color::Black) {
                    black_space += 1;
                }
            }
        }
    }
    (white_space - black_space) * 2
}

fn weak_squares(position: &Position) -> i32 {
    let mut score = 0;
    for idx in 0..64 {
        let Some(sq) = Square::from_index(idx) else {
            continue;
        };
        if position.piece_at(sq).is_some() {
            continue;
        }
        if is_weak_square(position, sq, Color::White)
            && is_square_attacked(position, sq, Color::Black)
        {
            score -= 8;
        }
        if is_weak_square(position, sq, Color::Black)
            && is_square_attacked(position, sq, Color::White)
        {
            score += 8;
        }
    }
    score
}

/// A square no friendly pawn can ever defend: nothing on adjacent files
/// behind it.
fn is_weak_square(position: &Position, sq: Square, color: Color) -> bool {
    let dir = color.pawn_direction();
    for df in -1..=1i8 {
        let file = sq.file().index() as i8 + df;
        if !(0..8).contains(&file) {
            continue;
        }
        let mut rank = sq.rank().index() as i8 - dir;
        while (0..8).contains(&rank) {
            if let Some(s) = Square::from_coords(rank as u8, file as u8) {
                if position.piece_at(s) == Some(Piece::new(PieceKind::Pawn, color)) {
                    return false;
                }
            }
            rank -= dir;
        }
    }
    true
}

/// The side ahead in material prefers trading.
fn trade_offs(position: &Position) -> i32 {
    (material_value(position, Color::White) - material_value(position, Color::Black)) / 10
}

fn material_value(position: &Position, color: Color) -> i32 {
    position
        .pieces()
        .filter(|(_, p)| p.color == color)
        .map(|(_, p)| piece_value(p.kind))
        .sum()
}

/// Tempo: raw move-count edge plus forcing moves (captures and checks).
fn initiative(position: &Position) -> i32 {
    let white_moves = legal_moves(position, Color::White).len() as i32;
    let black_moves = legal_moves(position, Color::Black).len() as i32;
    let mut score = (white_moves - black_moves) * 3 / 2;
    score += forcing_move_count(position, Color::White) * 3;
    score -= forcing_move_count(position, Color::Black) * 3;
    score
}

fn forcing_move_count(position: &Position, color: Color) -> i32 {
    let mut count = 0;
    for mv in legal_moves(position, color) {
        if mv.captured.is_some() {
            count += 1;
        }
        let next = position.make_move(mv);
        if chess_engine::is_in_check(&next, color.opposite()) {
            count += 1;
        }
    }
    count
}

/// Endgame-specific knowledge, gated by material count.
pub(super) fn endgame_knowledge(position: &Position, total_pieces: usize) -> i32 {
    if total_pieces > 16 {
        return 0;
    }

    let mut score = 0;
    if total_pieces <= 8 {
        score += king_pawn_endgame(position);
    }
    score += rook_endgame(position);
    score += bishop_knight_endgame(position, total_pieces);
    score
}

fn king_pawn_endgame(position: &Position) -> i32 {
    let white_king = position.king_square(Color::White);
    let black_king = position.king_square(Color::Black);

    let mut score = centralization(white_king) * 10 - centralization(black_king) * 10;

    if has_opposition(white_king, black_king) {
        score += match position.side_to_move() {
            Color::White => 20,
            Color::Black => -20,
        };
    }
    score
}

/// Distance-from-center score in half-steps (0 at the corner, 6 in the
/// middle).
fn centralization(sq: Square) -> i32 {
    let d2 = (2 * sq.rank().index() as i32 - 7).abs() + (2 * sq.file().index() as i32 - 7).abs();
    (14 - d2) / 2
}

/// Direct opposition: kings two squares apart on a rank or file.
fn has_opposition(a: Square, b: Square) -> bool {
    let dr = a.rank().index().abs_diff(b.rank().index());
    let df = a.file().index().abs_diff(b.file().index());
    (dr == 2 && df == 0) || (dr == 0 && df == 2)
}

fn rook_endgame(position: &Position) -> i32 {
    let mut score = 0;
    for (sq, piece) in position.pieces() {
        if piece.kind != PieceKind::Rook {
            continue;
        }
        let activity = legal_moves_from(position, sq).len() as i32 * 5;
        score += match piece.color {
            Color::White => activity,
            Color::Black => -activity,
        };
    }
    score
}

fn bishop_knight_endgame(position: &Position, _total_pieces: usize) -> i32 {
    let mut score = 0;

    let white_bishops = bishop_count(position, Color::White) as i32;
    let black_bishops = bishop_count(position, Color::Black) as i32;
    if white_bishops >= 2 {
        score += 40;
    }
    if black_bishops >= 2 {
        score -= 40;
    }

    let white_knights = knight_count(position, Color::White);
    let black_knights = knight_count(position, Color::Black);
    let pawns = pawn_count(position);
    let openness = 16 - pawns;

    score += (white_bishops - white_knights) * openness * 15 / 16;
    score -= (black_bishops - black_knights) * openness * 15 / 16;
    score
}

fn knight_count(position: &Position, color: Color) -> i32 {
    position
        .pieces()
        .filter(|(_, p)| p.kind == PieceKind::Knight && p.color == color)
        .count() as i32
}

fn pawn_count(position: &Position) -> i32 {
    position
        .pieces()
        .filter(|(_, p)| p.kind == PieceKind::Pawn)
        .count() as i32
}

/// Color-complex, file, diagonal, and key-square control, white-positive.
pub(super) fn positional_concepts(position: &Position) -> i32 {
    color_complexes(position)
        + file_control(position)
        + diagonal_control(position)
        + square_control(position)
}

/// Rewards controlling both light and dark squares rather than one
/// complex only.
fn color_complexes(position: &Position) -> i32 {
    let mut counts = [[0i32; 2]; 2]; // [color][parity]
    for idx in 0..64u8 {
        let Some(sq) = Square::from_index(idx) else {
            continue;
        };
        let parity = ((sq.rank().index() + sq.file().index()) % 2) as usize;
        if is_square_attacked(position, sq, Color::White) {
            counts[Color::White.index()][parity] += 1;
        }
        if is_square_attacked(position, sq, Color::Black) {
            counts[Color::Black.index()][parity] += 1;
        }
    }
    let white_balance = counts[0][0].min(counts[0][1]);
    let black_balance = counts[1][0].min(counts[1][1]);
    (white_balance - black_balance) * 2
}

fn file_control(position: &Position) -> i32 {
    let mut score = 0;
    for file in 0..8 {
        let mut white = 0;
        let mut black = 0;
        for rank in 0..8 {
            let Some(sq) = Square::from_coords(rank, file) else {
                continue;
            };
            if is_square_attacked(position, sq, Color::White) {
                white += 1;
            }
            if is_square_attacked(position, sq, Color::Black) {
                black += 1;
            }
        }
        if white > black {
            score += 3;
        } else if black > white {
            score -= 3;
        }
    }
    score
}

fn diagonal_control(position: &Position) -> i32 {
    let mut score = 0;
    for mirror in [false, true] {
        let mut white = 0;
        let mut black = 0;
        for k in 0..8 {
            let file = if mirror { 7 - k } else { k };
            let Some(sq) = Square::from_coords(k, file) else {
                continue;
            };
            if is_square_attacked(position, sq, Color::White) {
                white += 1;
            }
            if is_square_attacked(position, sq, Color::Black) {
                black += 1;
            }
        }
        if white > black {
            score += 5;
        } else if black > white {
            score -= 5;
        }
    }
    score
}

/// Counts, for each key central square, the pieces of each side that can
/// move to it.
fn square_control(position: &Position) -> i32 {
    let key_squares: Vec<Square> = key_square_coords()
        .iter()
        .filter_map(|&(rank, file)| Square::from_coords(rank, file))
        .collect();

    let mut diff = [0i32; 12];
    for (sq, piece) in position.pieces() {
        for mv in legal_moves_from(position, sq) {
            if let Some(pos_idx) = key_squares.iter().position(|&k| k == mv.to) {
                diff[pos_idx] += match piece.color {
                    Color::White => 1,
                    Color::Black => -1,
                };
            }
        }
    }
    diff.iter().map(|d| d * 2).sum()
}

const fn key_square_coords() -> [(u8, u8); 12] {
    [
        (3, 3),
        (3, 4),
        (4, 3),
        (4, 4), // center
        (5, 2),
        (5, 3),
        (5, 4),
        (5, 5), // extended center
        (2, 2),
        (2, 3),
        (2, 4),
        (2, 5),
    ]
}

fn nearby_allies(
    position: &Position,
    sq: Square,
    color: Color,
) -> impl Iterator<Item = (Square, Piece)> + '_ {
    position.pieces().filter(move |(other_sq, other)| {
        *other_sq != sq
            && other.color == color
            && other_sq.rank().index().abs_diff(sq.rank().index()) <= 2
            && other_sq.file().index().abs_diff(sq.file().index()) <= 2
    })
}

fn on_same_diagonal(a: Square, b: Square) -> bool {
    a.rank().index().abs_diff(b.rank().index()) == a.file().index().abs_diff(b.file().index())
}

fn is_center(sq: Square) -> bool {
    (3..=4).contains(&sq.rank().index()) && (3..=4).contains(&sq.file().index())
}

fn is_extended_center(sq: Square) -> bool {
    (2..=5).contains(&sq.rank().index()) && (2..=5).contains(&sq.file().index())
}

fn is_enemy_territory(sq: Square, color: Color) -> bool {
    match color {
        Color::White => sq.rank().index() >= 4,
        Color::Black => sq.rank().index() <= 3,
    }
}
