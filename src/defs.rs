use crate::bitboard::BitBoard;
use std::ops::{Index, IndexMut};

pub const WHITE_IDX: usize = 0;
pub const BLACK_IDX: usize = 1;

pub const MAX_MOVES: usize = 256;
pub const MAX_HISTORY: usize = 512;
pub const NUM_PIECES: usize = 6;
pub const NUM_SIDES: usize = 2;
pub const NUM_SQUARES: usize = 64;

/// Squares are numbered from the top-left corner of the board:
/// a8 = 0, h8 = 7, a1 = 56, h1 = 63
pub type Square = i8;

pub type Score = i32;

pub const FEN_START_STRING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub struct Castling;

impl Castling {
    pub const WQ: u8 = 1;
    pub const WK: u8 = 2;
    pub const BQ: u8 = 4;
    pub const BK: u8 = 8;
    pub const WHITE_ALL: u8 = 3;
    pub const BLACK_ALL: u8 = 12;
    pub const NONE: u8 = 0;
    pub const ALL: u8 = 15;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub const fn opp(&self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Offset a pawn push adds to its square index
    pub const fn pawn_dir(&self) -> Square {
        match self {
            Player::White => -8,
            Player::Black => 8,
        }
    }

    /// The rank a pawn crosses on a double push
    pub const fn rank_3(&self) -> u64 {
        match self {
            Player::White => BitBoard::RANK_3,
            Player::Black => BitBoard::RANK_6,
        }
    }

    /// The rank a pawn promotes from
    pub const fn rank_7(&self) -> u64 {
        match self {
            Player::White => BitBoard::RANK_7,
            Player::Black => BitBoard::RANK_2,
        }
    }

    pub const fn castle_king_sq(&self) -> Square {
        match self {
            Player::White => 62,
            Player::Black => 6,
        }
    }

    pub const fn castle_queen_sq(&self) -> Square {
        match self {
            Player::White => 58,
            Player::Black => 2,
        }
    }

    /// Constant function to use Player as an index in constant contexts
    pub const fn as_usize(self) -> usize {
        self as usize
    }
}

impl Index<Player> for [u64; NUM_SIDES] {
    type Output = u64;

    fn index(&self, index: Player) -> &Self::Output {
        &self[index.as_usize()]
    }
}

impl IndexMut<Player> for [u64; NUM_SIDES] {
    fn index_mut(&mut self, index: Player) -> &mut Self::Output {
        &mut self[index.as_usize()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    None,
}

impl PieceType {
    /// Constant function to use PieceType as an index in constant contexts
    pub const fn as_usize(self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
            PieceType::None => 6,
        }
    }

    pub const fn from_usize(index: usize) -> Self {
        match index {
            0 => PieceType::Pawn,
            1 => PieceType::Knight,
            2 => PieceType::Bishop,
            3 => PieceType::Rook,
            4 => PieceType::Queen,
            5 => PieceType::King,
            _ => PieceType::None,
        }
    }
}

impl Index<PieceType> for [u64; NUM_PIECES] {
    type Output = u64;

    fn index(&self, index: PieceType) -> &Self::Output {
        &self[index.as_usize()]
    }
}

impl IndexMut<PieceType> for [u64; NUM_PIECES] {
    fn index_mut(&mut self, index: PieceType) -> &mut Self::Output {
        &mut self[index.as_usize()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Piece {
    WhitePawn,
    BlackPawn,
    WhiteKnight,
    BlackKnight,
    WhiteBishop,
    BlackBishop,
    WhiteRook,
    BlackRook,
    WhiteQueen,
    BlackQueen,
    WhiteKing,
    BlackKing,
    None,
}

impl Piece {
    pub const fn from_piece_type(piece_type: PieceType, side: Player) -> Self {
        match piece_type {
            PieceType::None => Piece::None,
            PieceType::Pawn => match side {
                Player::White => Piece::WhitePawn,
                _ => Piece::BlackPawn,
            },
            PieceType::Knight => match side {
                Player::White => Piece::WhiteKnight,
                _ => Piece::BlackKnight,
            },
            PieceType::Bishop => match side {
                Player::White => Piece::WhiteBishop,
                _ => Piece::BlackBishop,
            },
            PieceType::Rook => match side {
                Player::White => Piece::WhiteRook,
                _ => Piece::BlackRook,
            },
            PieceType::Queen => match side {
                Player::White => Piece::WhiteQueen,
                _ => Piece::BlackQueen,
            },
            PieceType::King => match side {
                Player::White => Piece::WhiteKing,
                _ => Piece::BlackKing,
            },
        }
    }

    pub const fn piece_type(&self) -> PieceType {
        match self {
            Piece::WhitePawn | Piece::BlackPawn => PieceType::Pawn,
            Piece::WhiteKnight | Piece::BlackKnight => PieceType::Knight,
            Piece::WhiteBishop | Piece::BlackBishop => PieceType::Bishop,
            Piece::WhiteRook | Piece::BlackRook => PieceType::Rook,
            Piece::WhiteQueen | Piece::BlackQueen => PieceType::Queen,
            Piece::WhiteKing | Piece::BlackKing => PieceType::King,
            Piece::None => PieceType::None,
        }
    }

    pub const fn side(&self) -> Player {
        match self {
            Piece::WhitePawn
            | Piece::WhiteKnight
            | Piece::WhiteBishop
            | Piece::WhiteRook
            | Piece::WhiteQueen
            | Piece::WhiteKing => Player::White,
            _ => Player::Black,
        }
    }

    /// Index into the zobrist piece table: piece kind interleaved by colour
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    pub const fn to_str(&self) -> &str {
        match self {
            Piece::WhitePawn => "P",
            Piece::BlackPawn => "p",
            Piece::WhiteKnight => "N",
            Piece::BlackKnight => "n",
            Piece::WhiteBishop => "B",
            Piece::BlackBishop => "b",
            Piece::WhiteRook => "R",
            Piece::BlackRook => "r",
            Piece::WhiteQueen => "Q",
            Piece::BlackQueen => "q",
            Piece::WhiteKing => "K",
            Piece::BlackKing => "k",
            Piece::None => " ",
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'P' => Some(Piece::WhitePawn),
            'p' => Some(Piece::BlackPawn),
            'N' => Some(Piece::WhiteKnight),
            'n' => Some(Piece::BlackKnight),
            'B' => Some(Piece::WhiteBishop),
            'b' => Some(Piece::BlackBishop),
            'R' => Some(Piece::WhiteRook),
            'r' => Some(Piece::BlackRook),
            'Q' => Some(Piece::WhiteQueen),
            'q' => Some(Piece::BlackQueen),
            'K' => Some(Piece::WhiteKing),
            'k' => Some(Piece::BlackKing),
            _ => None,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy)]
pub enum GenStage {
    /// Captures, en passant and queen promotions
    Captures,
    /// Non-captures, castling and minor promotions
    Quiets,
}
