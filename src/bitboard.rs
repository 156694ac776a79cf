use crate::defs::Square;

pub struct BitBoard;

/// Constant values
///
/// Bit 0 is a8, bit 63 is h1, so rank 8 occupies the low byte
impl BitBoard {
    pub const EMPTY: u64 = 0;
    pub const RANK_8: u64 = 0x00000000000000FF;
    pub const RANK_7: u64 = BitBoard::RANK_8 << 8;
    pub const RANK_6: u64 = BitBoard::RANK_8 << 16;
    pub const RANK_3: u64 = BitBoard::RANK_8 << 40;
    pub const RANK_2: u64 = BitBoard::RANK_8 << 48;
    pub const RANK_1: u64 = BitBoard::RANK_8 << 56;
    pub const FILE_A: u64 = 0x0101010101010101;
    pub const FILE_H: u64 = BitBoard::FILE_A << 7;
}

impl BitBoard {
    pub const fn from_sq(sq: Square) -> u64 {
        1 << sq
    }

    pub const fn file_bb(sq: Square) -> u64 {
        BitBoard::FILE_A << (sq % 8)
    }

    pub const fn rank_bb(sq: Square) -> u64 {
        BitBoard::RANK_8 << (sq / 8 * 8)
    }

    pub fn set_bit(bb: &mut u64, sq: Square) {
        *bb |= 1 << sq;
    }

    pub fn pop_bit(bb: &mut u64, sq: Square) {
        *bb ^= 1 << sq;
    }

    pub const fn contains(bb: u64, sq: Square) -> bool {
        BitBoard::from_sq(sq) & bb != 0
    }

    /// Pop the lsb on the provided bitboard and return its index
    ///
    /// Empty bitboards remain empty
    pub fn pop_lsb(bb: &mut u64) -> Square {
        let lsb = BitBoard::bit_scan_forward(*bb);
        if lsb < 64 {
            BitBoard::pop_bit(bb, lsb)
        }
        lsb
    }

    pub const fn more_than_one(bb: u64) -> bool {
        if bb == 0 {
            false
        } else {
            bb & (bb - 1) != 0
        }
    }

    /// Get the index of the least significant bit.
    ///
    /// Returns 64 if the provided bitboard is empty.
    pub const fn bit_scan_forward(bb: u64) -> Square {
        bb.trailing_zeros() as Square
    }

    #[allow(dead_code)]
    pub fn pretty_string(bb: u64) -> String {
        let mut output = String::new();
        for y in 0..8 {
            for x in 0..8 {
                let square = 8 * y + x;
                let value = (bb >> square) & 1;
                output.push_str(&format!(" {} ", value));

                if x == 7 {
                    output.push('\n');
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scan_and_pop() {
        let mut bb = BitBoard::from_sq(12) | BitBoard::from_sq(40);
        assert_eq!(BitBoard::bit_scan_forward(bb), 12);
        assert_eq!(BitBoard::pop_lsb(&mut bb), 12);
        assert_eq!(BitBoard::pop_lsb(&mut bb), 40);
        assert_eq!(bb, BitBoard::EMPTY);
        assert_eq!(BitBoard::pop_lsb(&mut bb), 64);
    }

    #[test]
    fn rank_and_file() {
        // e1 = 60
        assert_eq!(BitBoard::rank_bb(60), BitBoard::RANK_1);
        assert_eq!(BitBoard::file_bb(56), BitBoard::FILE_A);
        assert!(BitBoard::contains(BitBoard::RANK_8, 0));
        assert!(!BitBoard::more_than_one(BitBoard::from_sq(33)));
        assert!(BitBoard::more_than_one(BitBoard::RANK_2));
    }
}
