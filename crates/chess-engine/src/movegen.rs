//! Legal move generation and attack queries.
//!
//! Generation is two-phase: pseudo-legal moves per piece kind, then a
//! legality filter that simulates each move on a scratch board and rejects
//! any move leaving the mover's own king attacked. Castling additionally
//! verifies the squares the king passes through.

use chess_core::{CastlingSide, Color, File, Move, Piece, PieceKind, Square};

use crate::Position;

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

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Generates all legal moves for the given color, in board order.
///
/// The list is empty exactly when that side is checkmated or stalemated.
pub fn legal_moves(position: &Position, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(40);
    for (sq, piece) in position.pieces() {
        if piece.color == color {
            collect_legal_from(position, sq, piece, &mut moves);
        }
    }
    moves
}

/// Generates the legal moves of the piece standing on `from`.
///
/// Returns an empty list for an empty square.
pub fn legal_moves_from(position: &Position, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = position.piece_at(from) {
        collect_legal_from(position, from, piece, &mut moves);
    }
    moves
}

/// Returns true if the given color has at least one legal move.
pub fn has_any_legal_move(position: &Position, color: Color) -> bool {
    let mut moves = Vec::new();
    for (sq, piece) in position.pieces() {
        if piece.color != color {
            continue;
        }
        moves.clear();
        pseudo_legal_from(position, sq, piece, &mut moves);
        if moves.iter().any(|mv| !leaves_king_exposed(position, *mv)) {
            return true;
        }
    }
    false
}

/// Returns true if the given color's king is attacked.
pub fn is_in_check(position: &Position, color: Color) -> bool {
    is_square_attacked(position, position.king_square(color), color.opposite())
}

/// Returns true if any piece of `by` attacks the given square.
///
/// Pawns use their diagonal attack set (distinct from their move set);
/// king attacks exclude castling.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    square_attacked_on(position.board(), sq, by)
}

fn collect_legal_from(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let mut pseudo = Vec::with_capacity(16);
    pseudo_legal_from(position, from, piece, &mut pseudo);
    moves.extend(
        pseudo
            .into_iter()
            .filter(|mv| !leaves_king_exposed(position, *mv)),
    );
}

fn pseudo_legal_from(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(position, from, piece, moves),
        PieceKind::Knight => offset_moves(position, from, piece, &KNIGHT_OFFSETS, moves),
        PieceKind::Bishop => ray_moves(position, from, piece, &BISHOP_DIRECTIONS, moves),
        PieceKind::Rook => ray_moves(position, from, piece, &ROOK_DIRECTIONS, moves),
        PieceKind::Queen => {
            ray_moves(position, from, piece, &ROOK_DIRECTIONS, moves);
            ray_moves(position, from, piece, &BISHOP_DIRECTIONS, moves);
        }
        PieceKind::King => {
            offset_moves(position, from, piece, &KING_OFFSETS, moves);
            castling_moves(position, from, piece, moves);
        }
    }
}

fn pawn_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let dir = piece.color.pawn_direction();
    let promotion_rank = piece.color.promotion_rank();

    if let Some(one) = from.offset(dir, 0) {
        if position.piece_at(one).is_none() {
            if one.rank().index() == promotion_rank {
                moves.push(Move::promoting(piece, from, one, None, PieceKind::Queen));
            } else {
                moves.push(Move::normal(piece, from, one, None));
            }

            if from.rank().index() == piece.color.pawn_rank() {
                if let Some(two) = from.offset(2 * dir, 0) {
                    if position.piece_at(two).is_none() {
                        moves.push(Move::normal(piece, from, two, None));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(dir, df) else {
            continue;
        };
        if let Some(target) = position.piece_at(to) {
            if target.color != piece.color {
                if to.rank().index() == promotion_rank {
                    moves.push(Move::promoting(
                        piece,
                        from,
                        to,
                        Some(target),
                        PieceKind::Queen,
                    ));
                } else {
                    moves.push(Move::normal(piece, from, to, Some(target)));
                }
            }
        } else if position.en_passant() == Some(to) {
            let victim_sq = Square::new(to.file(), from.rank());
            if let Some(victim) = position.piece_at(victim_sq) {
                moves.push(Move::en_passant(piece, from, to, victim));
            }
        }
    }
}

fn offset_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, df) in offsets {
        let Some(to) = from.offset(dr, df) else {
            continue;
        };
        match position.piece_at(to) {
            None => moves.push(Move::normal(piece, from, to, None)),
            Some(target) if target.color != piece.color => {
                moves.push(Move::normal(piece, from, to, Some(target)));
            }
            Some(_) => {}
        }
    }
}

fn ray_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, df) in directions {
        let mut current = from;
        while let Some(to) = current.offset(dr, df) {
            match position.piece_at(to) {
                None => {
                    moves.push(Move::normal(piece, from, to, None));
                    current = to;
                }
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(Move::normal(piece, from, to, Some(target)));
                    }
                    break;
                }
            }
        }
    }
}

/// Castling requires the right still held, the rook at home, every square
/// between king and rook empty, the king not currently in check, and no
/// attacked square on the king's path. The landing square is re-verified
/// by the regular legality filter.
fn castling_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let us = piece.color;
    let home = match Square::from_coords(us.back_rank(), File::E.index()) {
        Some(sq) => sq,
        None => return,
    };
    if from != home || is_in_check(position, us) {
        return;
    }
    let rank = from.rank();
    let rook = Piece::new(PieceKind::Rook, us);

    if position.castling().can_castle(us, CastlingSide::Kingside) {
        let f = Square::new(File::F, rank);
        let g = Square::new(File::G, rank);
        let rook_home = Square::new(File::H, rank);
        if position.piece_at(f).is_none()
            && position.piece_at(g).is_none()
            && position.piece_at(rook_home) == Some(rook)
            && !leaves_king_exposed(position, Move::normal(piece, from, f, None))
        {
            moves.push(Move::castle(piece, from, g, CastlingSide::Kingside));
        }
    }

    if position.castling().can_castle(us, CastlingSide::Queenside) {
        let b = Square::new(File::B, rank);
        let c = Square::new(File::C, rank);
        let d = Square::new(File::D, rank);
        let rook_home = Square::new(File::A, rank);
        if position.piece_at(b).is_none()
            && position.piece_at(c).is_none()
            && position.piece_at(d).is_none()
            && position.piece_at(rook_home) == Some(rook)
            && !leaves_king_exposed(position, Move::normal(piece, from, d, None))
        {
            moves.push(Move::castle(piece, from, c, CastlingSide::Queenside));
        }
    }
}

/// Simulates the move on a scratch copy of the board and reports whether
/// the mover's king ends up attacked. The king-square cache is relocated
/// for king moves; en passant removes the captured pawn for the duration
/// of the check.
fn leaves_king_exposed(position: &Position, mv: Move) -> bool {
    let mut board = *position.board();
    let us = mv.piece.color;

    board[mv.from.index() as usize] = None;
    if mv.en_passant_capture.is_some() {
        let victim_sq = Square::new(mv.to.file(), mv.from.rank());
        board[victim_sq.index() as usize] = None;
    }
    board[mv.to.index() as usize] = Some(mv.piece);

    let king_sq = if mv.piece.kind == PieceKind::King {
        mv.to
    } else {
        position.king_square(us)
    };
    square_attacked_on(&board, king_sq, us.opposite())
}

fn square_attacked_on(board: &[Option<Piece>; 64], sq: Square, by: Color) -> bool {
    for &(dr, df) in &KNIGHT_OFFSETS {
        if let Some(s) = sq.offset(dr, df) {
            if board[s.index() as usize] == Some(Piece::new(PieceKind::Knight, by)) {
                return true;
            }
        }
    }

    for &(dr, df) in &KING_OFFSETS {
        if let Some(s) = sq.offset(dr, df) {
            if board[s.index() as usize] == Some(Piece::new(PieceKind::King, by)) {
                return true;
            }
        }
    }

    // A pawn of `by` attacks sq from one rank behind it, on adjacent files.
    let dir = by.pawn_direction();
    for df in [-1, 1] {
        if let Some(s) = sq.offset(-dir, df) {
            if board[s.index() as usize] == Some(Piece::new(PieceKind::Pawn, by)) {
                return true;
            }
        }
    }

    for &(dr, df) in &ROOK_DIRECTIONS {
        if let Some(attacker) = first_piece_on_ray(board, sq, dr, df) {
            if attacker.color == by
                && matches!(attacker.kind, PieceKind::Rook | PieceKind::Queen)
            {
                return true;
            }
        }
    }

    for &(dr, df) in &BISHOP_DIRECTIONS {
        if let Some(attacker) = first_piece_on_ray(board, sq, dr, df) {
            if attacker.color == by
                && matches!(attacker.kind, PieceKind::Bishop | PieceKind::Queen)
            {
                return true;
            }
        }
    }

    false
}

fn first_piece_on_ray(board: &[Option<Piece>; 64], from: Square, dr: i8, df: i8) -> Option<Piece> {
    let mut current = from;
    while let Some(next) = current.offset(dr, df) {
        if let Some(piece) = board[next.index() as usize] {
            return Some(piece);
        }
        current = next;
    }
    None
}
