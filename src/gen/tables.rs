use crate::{
    bitboard::BitBoard,
    defs::{Castling, PieceType, Player, Square, NUM_SQUARES},
    gen::{
        attack::{KING_ATK, KNIGHT_ATK, PAWN_ATK},
        between,
        magic::{self, Magic},
    },
};

/// Precomputed lookup data shared by every board and search in a
/// process. Built once, then only read: pass it around by reference.
pub struct Tables {
    bishop_magics: Box<[Magic; 64]>,
    rook_magics: Box<[Magic; 64]>,
    attacks: Vec<u64>,
    castle_mask: [u8; NUM_SQUARES],
}

impl Tables {
    pub fn new() -> Self {
        let (bishop_magics, rook_magics, attacks) = magic::build();

        let mut castle_mask = [Castling::ALL; NUM_SQUARES];
        castle_mask[0] &= !Castling::BQ;
        castle_mask[4] &= !(Castling::BK | Castling::BQ);
        castle_mask[7] &= !Castling::BK;
        castle_mask[56] &= !Castling::WQ;
        castle_mask[60] &= !(Castling::WK | Castling::WQ);
        castle_mask[63] &= !Castling::WK;

        Self {
            bishop_magics,
            rook_magics,
            attacks,
            castle_mask,
        }
    }

    #[inline]
    pub fn pawn_attacks(&self, side: Player, sq: Square) -> u64 {
        PAWN_ATK[side.as_usize()][sq as usize]
    }

    #[inline]
    pub fn knight_attacks(&self, sq: Square) -> u64 {
        KNIGHT_ATK[sq as usize]
    }

    #[inline]
    pub fn king_attacks(&self, sq: Square) -> u64 {
        KING_ATK[sq as usize]
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occ: u64) -> u64 {
        self.attacks[self.bishop_magics[sq as usize].index(occ)]
    }

    #[inline]
    pub fn rook_attacks(&self, sq: Square, occ: u64) -> u64 {
        self.attacks[self.rook_magics[sq as usize].index(occ)]
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occ: u64) -> u64 {
        self.bishop_attacks(sq, occ) | self.rook_attacks(sq, occ)
    }

    /// Attacks for a given piece type on a given square
    ///
    /// Pawn attacks are the capture squares of `side`
    pub fn attacks(&self, piece: PieceType, sq: Square, occ: u64, side: Player) -> u64 {
        match piece {
            PieceType::Pawn => self.pawn_attacks(side, sq),
            PieceType::Knight => self.knight_attacks(sq),
            PieceType::Bishop => self.bishop_attacks(sq, occ),
            PieceType::Rook => self.rook_attacks(sq, occ),
            PieceType::Queen => self.queen_attacks(sq, occ),
            PieceType::King => self.king_attacks(sq),
            PieceType::None => 0,
        }
    }

    #[inline]
    pub fn between(&self, a: Square, b: Square) -> u64 {
        between::between(a, b)
    }

    #[inline]
    pub fn line(&self, a: Square, b: Square) -> u64 {
        between::line(a, b)
    }

    /// Whether `c` lies on the line through `a` and `b`
    #[inline]
    pub fn aligned(&self, a: Square, b: Square, c: Square) -> bool {
        between::line(a, b) & BitBoard::from_sq(c) != 0
    }

    /// Castling rights that survive a piece moving from or to `sq`
    #[inline]
    pub fn castle_mask(&self, sq: Square) -> u8 {
        self.castle_mask[sq as usize]
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::square_from_string;

    fn sq(s: &str) -> Square {
        square_from_string(s).unwrap()
    }

    #[test]
    fn slider_attacks() {
        let t = Tables::new();

        // empty board, rook on d4 sees 14 squares
        assert_eq!(t.rook_attacks(sq("d4"), 0).count_ones(), 14);
        // bishop on c1 with a pawn on d2 sees b2, a3 and d2
        let occ = BitBoard::from_sq(sq("d2"));
        assert_eq!(t.bishop_attacks(sq("c1"), occ).count_ones(), 3);
        assert_eq!(
            t.queen_attacks(sq("e4"), 0),
            t.rook_attacks(sq("e4"), 0) | t.bishop_attacks(sq("e4"), 0)
        );
    }

    #[test]
    fn castle_masks() {
        let t = Tables::new();

        assert_eq!(t.castle_mask(sq("e1")), Castling::BLACK_ALL);
        assert_eq!(t.castle_mask(sq("h1")), Castling::ALL & !Castling::WK);
        assert_eq!(t.castle_mask(sq("a8")), Castling::ALL & !Castling::BQ);
        assert_eq!(t.castle_mask(sq("e4")), Castling::ALL);
    }

    #[test]
    fn alignment() {
        let t = Tables::new();

        assert!(t.aligned(sq("a1"), sq("h8"), sq("d4")));
        assert!(!t.aligned(sq("a1"), sq("h8"), sq("d5")));
        assert!(t.aligned(sq("e1"), sq("e8"), sq("e4")));
    }
}
