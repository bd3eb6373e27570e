//! Chess position representation.

use chess_core::{CastlingSide, Color, FenError, FenParser, File, Move, Piece, PieceKind, Square};
use thiserror::Error;

use crate::movegen;

/// Error for rejected move requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The move is not in the legal move list for the side to move.
    #[error("illegal move: {0}")]
    Illegal(String),
    /// The game has already ended.
    #[error("game is over")]
    GameOver,
}

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side can castle on the given side.
    #[inline]
    pub const fn can_castle(self, color: Color, side: CastlingSide) -> bool {
        match side {
            CastlingSide::Kingside => self.can_castle_kingside(color),
            CastlingSide::Queenside => self.can_castle_queenside(color),
        }
    }

    /// Removes kingside castling for a color. Rights are never restored.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_KINGSIDE,
            Color::Black => !Self::BLACK_KINGSIDE,
        };
        self.0 &= mask;
    }

    /// Removes queenside castling for a color. Rights are never restored.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_QUEENSIDE,
            Color::Black => !Self::BLACK_QUEENSIDE,
        };
        self.0 &= mask;
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// White delivered checkmate.
    WhiteWins,
    /// Black delivered checkmate.
    BlackWins,
    /// Stalemate - the side to move has no legal moves but is not in check.
    Draw,
}

/// Complete chess position state.
///
/// Holds the canonical game state: board, side to move, castling rights,
/// en passant target, move counter, cached king squares, applied move
/// history, captured pieces per color, and the terminal outcome once the
/// game has ended. Cloning a position yields a fully independent copy;
/// the search engine relies on this to explore branches without aliasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    fullmove_number: u32,
    king_squares: [Square; 2],
    history: Vec<Move>,
    captured: [Vec<Piece>; 2],
    outcome: Option<Outcome>,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        match Self::from_fen(FenParser::STARTPOS) {
            Ok(position) => position,
            Err(_) => unreachable!(),
        }
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;

        let mut board = [None; 64];
        for (rank_idx, rank_str) in parsed.piece_placement.split('/').enumerate() {
            let rank = 7 - rank_idx as u8; // FEN starts from rank 8
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if let Some(sq) = Square::from_coords(rank, file) {
                        board[sq.index() as usize] = Some(piece);
                    }
                    file += 1;
                }
            }
        }

        let mut king_squares = [None, None];
        for idx in 0..64u8 {
            if let Some(piece) = board[idx as usize] {
                if piece.kind == PieceKind::King {
                    let slot = &mut king_squares[piece.color.index()];
                    if slot.is_some() {
                        return Err(FenError::MissingKing);
                    }
                    *slot = Square::from_index(idx);
                }
            }
        }
        let (white_king, black_king) = match king_squares {
            [Some(w), Some(b)] => (w, b),
            _ => return Err(FenError::MissingKing),
        };

        let mut castling = 0u8;
        for c in parsed.castling.chars() {
            match c {
                'K' => castling |= CastlingRights::WHITE_KINGSIDE,
                'Q' => castling |= CastlingRights::WHITE_QUEENSIDE,
                'k' => castling |= CastlingRights::BLACK_KINGSIDE,
                'q' => castling |= CastlingRights::BLACK_QUEENSIDE,
                _ => {}
            }
        }

        let mut position = Position {
            board,
            side_to_move: if parsed.active_color == 'w' {
                Color::White
            } else {
                Color::Black
            },
            castling: CastlingRights::new(castling),
            en_passant: if parsed.en_passant == "-" {
                None
            } else {
                Square::from_algebraic(&parsed.en_passant)
            },
            fullmove_number: parsed.fullmove_number,
            king_squares: [white_king, black_king],
            history: Vec::new(),
            captured: [Vec::new(), Vec::new()],
            outcome: None,
        };
        position.update_outcome();
        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty_count = 0;
            for file in 0..8u8 {
                let sq = Square::from_coords(rank, file).map(|s| s.index() as usize);
                let piece = sq.and_then(|i| self.board[i]);
                if let Some(piece) = piece {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling.raw() == 0 {
            fen.push('-');
        } else {
            if self.castling.can_castle_kingside(Color::White) {
                fen.push('K');
            }
            if self.castling.can_castle_queenside(Color::White) {
                fen.push('Q');
            }
            if self.castling.can_castle_kingside(Color::Black) {
                fen.push('k');
            }
            if self.castling.can_castle_queenside(Color::Black) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push_str(" 0 ");
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index() as usize]
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the en passant target square, if a two-square pawn advance
    /// was just played.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the fullmove number (starts at 1, increments after Black's move).
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the cached square of the given color's king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// Returns the moves applied to this position, oldest first.
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the pieces of the given color captured so far.
    #[inline]
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Returns the game outcome, or `None` while the game is in progress.
    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns true if the game has ended.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Iterates over all pieces on the board with their squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board.iter().enumerate().filter_map(|(idx, piece)| {
            piece.map(|p| {
                let sq = match Square::from_index(idx as u8) {
                    Some(sq) => sq,
                    None => unreachable!(),
                };
                (sq, p)
            })
        })
    }

    /// Returns the total number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.board.iter().filter(|p| p.is_some()).count()
    }

    pub(crate) fn board(&self) -> &[Option<Piece>; 64] {
        &self.board
    }

    /// Applies a move, updating every piece of position state.
    ///
    /// Handles rook relocation on castling, en passant pawn removal,
    /// setting/clearing the en passant target, automatic promotion to
    /// queen, castling-right revocation, history and capture tracking,
    /// side switching, and terminal-state recomputation. The move is
    /// assumed to come from [`legal_moves`](crate::legal_moves); callers
    /// reject illegal input before it reaches the core.
    pub fn apply_move(&mut self, mv: Move) {
        let mut piece = mv.piece;
        let us = piece.color;

        if let Some(captured) = self.board[mv.to.index() as usize] {
            self.captured[captured.color.index()].push(captured);
        }

        match piece.kind {
            PieceKind::King => {
                self.king_squares[us.index()] = mv.to;
                if let Some(side) = mv.castling {
                    let rank = mv.from.rank();
                    let (rook_from, rook_to) = match side {
                        CastlingSide::Kingside => {
                            (Square::new(File::H, rank), Square::new(File::F, rank))
                        }
                        CastlingSide::Queenside => {
                            (Square::new(File::A, rank), Square::new(File::D, rank))
                        }
                    };
                    let rook = self.board[rook_from.index() as usize].take();
                    self.board[rook_to.index() as usize] = rook;
                }
                self.castling.remove_kingside(us);
                self.castling.remove_queenside(us);
            }
            PieceKind::Rook => {
                if mv.from.rank().index() == us.back_rank() {
                    if mv.from.file() == File::A {
                        self.castling.remove_queenside(us);
                    } else if mv.from.file() == File::H {
                        self.castling.remove_kingside(us);
                    }
                }
            }
            _ => {}
        }

        if piece.kind == PieceKind::Pawn {
            if let Some(victim) = mv.en_passant_capture {
                let victim_sq = Square::new(mv.to.file(), mv.from.rank());
                self.board[victim_sq.index() as usize] = None;
                self.captured[victim.color.index()].push(victim);
            }

            let from_rank = mv.from.rank().index();
            let to_rank = mv.to.rank().index();
            if from_rank.abs_diff(to_rank) == 2 {
                let mid_rank = (from_rank + to_rank) / 2;
                self.en_passant = Square::from_coords(mid_rank, mv.to.file().index());
            } else {
                self.en_passant = None;
            }

            if to_rank == us.promotion_rank() {
                piece.kind = mv.promotion.unwrap_or(PieceKind::Queen);
            }
        } else {
            self.en_passant = None;
        }

        self.board[mv.to.index() as usize] = Some(piece);
        self.board[mv.from.index() as usize] = None;

        self.history.push(mv);
        self.side_to_move = us.opposite();
        if self.side_to_move == Color::White {
            self.fullmove_number += 1;
        }

        self.update_outcome();
    }

    /// Returns a new position with the move applied, leaving `self` intact.
    pub fn make_move(&self, mv: Move) -> Position {
        let mut next = self.clone();
        next.apply_move(mv);
        next
    }

    /// Validates a move request against the legal move list before
    /// applying it. This is the caller-facing guard: picking an empty
    /// square, moving the opponent's piece, or any destination absent
    /// from the legal list is rejected here and never reaches
    /// [`apply_move`](Position::apply_move).
    pub fn try_apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if !movegen::legal_moves(self, self.side_to_move).contains(&mv) {
            return Err(MoveError::Illegal(mv.to_uci()));
        }
        self.apply_move(mv);
        Ok(())
    }

    /// Recomputes the terminal state: if the side to move has no legal
    /// moves, the game ends - checkmate if that side is in check,
    /// stalemate otherwise. This is the only draw condition the model
    /// tracks.
    fn update_outcome(&mut self) {
        let stm = self.side_to_move;
        if !movegen::has_any_legal_move(self, stm) {
            self.outcome = Some(if movegen::is_in_check(self, stm) {
                match stm {
                    Color::White => Outcome::BlackWins,
                    Color::Black => Outcome::WhiteWins,
                }
            } else {
                Outcome::Draw
            });
        }
    }

    /// Encodes the position for transposition-table lookup.
    ///
    /// One entry per square in index order: a color character plus a piece
    /// character for occupied squares, '-' for empty ones; then the side
    /// to move and a character for each castling right still held. The en
    /// passant target and move counters are deliberately excluded so that
    /// positions differing only in those transpose to the same entry.
    pub fn transposition_key(&self) -> String {
        let mut key = String::with_capacity(64 * 2 + 5);
        for piece in &self.board {
            match piece {
                Some(p) => {
                    key.push(match p.color {
                        Color::White => 'w',
                        Color::Black => 'b',
                    });
                    key.push(p.kind.to_char());
                }
                None => key.push('-'),
            }
        }
        key.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });
        if self.castling.can_castle_kingside(Color::White) {
            key.push('K');
        }
        if self.castling.can_castle_queenside(Color::White) {
            key.push('Q');
        }
        if self.castling.can_castle_kingside(Color::Black) {
            key.push('k');
        }
        if self.castling.can_castle_queenside(Color::Black) {
            key.push('q');
        }
        key
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
