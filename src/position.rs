use crate::defs::{Castling, PieceType, Square};

/// Irreversible state saved before every move, restored on undo
#[derive(Clone, Copy, Debug)]
pub struct Position {
    /// Castling state.
    ///
    /// Bit 0 is white castle queen side,
    /// bit 1 is white castle king side,
    /// bit 2 is black castle queen side,
    /// bit 3 is black castle king side
    pub castling: u8,
    /// 50 move rule counter, in plies
    pub rule_fifty: u8,
    /// Square behind the double-pushed pawn, 64 if none
    pub ep_square: Square,
    /// Zobrist key
    pub key: u64,
    /// Bitboard of all the pieces giving check
    pub checkers_bb: u64,
    /// Pieces of the side to move that are pinned to their king
    pub pinned_bb: u64,
    /// `PieceType::None` if the last move did not capture
    pub captured_piece: PieceType,
    /// The move that led to this position, 0 at the root
    pub last_move: u16,
}

impl Position {
    pub const fn new() -> Self {
        Position {
            castling: Castling::NONE,
            rule_fifty: 0,
            ep_square: 64,
            key: 0,
            checkers_bb: 0,
            pinned_bb: 0,
            captured_piece: PieceType::None,
            last_move: 0,
        }
    }
}
