use crate::{bitboard::BitBoard, defs::Square, utils::coord_from_square};

/// Combined size of the bishop (5,248) and rook (102,400) attack tables
pub const TABLE_SIZE: usize = 107_648;

pub const BISHOP_DELTAS: [i8; 4] = [-9, -7, 7, 9];
pub const ROOK_DELTAS: [i8; 4] = [-8, -1, 1, 8];

/// Per-square slider lookup data: the relevant-occupancy mask and the
/// occupancy compression that maps a subset of it into the shared
/// attack table.
///
/// With BMI2 the compression is a hardware `pext` and the magic
/// constant is unused; otherwise it is the classic multiply-and-shift.
#[derive(Clone, Copy, Default)]
pub struct Magic {
    pub mask: u64,
    pub magic: u64,
    pub shift: u32,
    pub offset: usize,
}

impl Magic {
    #[inline(always)]
    pub fn index(&self, occ: u64) -> usize {
        #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
        {
            self.offset + unsafe { std::arch::x86_64::_pext_u64(occ, self.mask) } as usize
        }
        #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
        {
            self.offset + (((occ & self.mask).wrapping_mul(self.magic)) >> self.shift) as usize
        }
    }
}

/// Xorshift with a fixed seed, so table construction is deterministic
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(2685821657736338717)
    }

    /// Sparse candidates find valid magics far sooner than uniform ones
    fn sparse(&mut self) -> u64 {
        self.next() & self.next() & self.next()
    }
}

/// Build the per-square lookup data and fill the shared attack table
pub fn build() -> (Box<[Magic; 64]>, Box<[Magic; 64]>, Vec<u64>) {
    let mut attacks = vec![0; TABLE_SIZE];
    let mut bishop = Box::new([Magic::default(); 64]);
    let mut rook = Box::new([Magic::default(); 64]);
    let mut rng = XorShift(0x6cf6_7383_8cb3_1a4d);

    let mut offset = 0;
    for sq in 0..64 {
        offset = init_square(&BISHOP_DELTAS, sq, offset, &mut bishop[sq as usize], &mut attacks, &mut rng);
    }
    for sq in 0..64 {
        offset = init_square(&ROOK_DELTAS, sq, offset, &mut rook[sq as usize], &mut attacks, &mut rng);
    }
    debug_assert_eq!(offset, TABLE_SIZE);

    (bishop, rook, attacks)
}

fn init_square(
    deltas: &[i8; 4],
    sq: Square,
    offset: usize,
    entry: &mut Magic,
    table: &mut [u64],
    rng: &mut XorShift,
) -> usize {
    // Edge squares never affect the attack set from an inner square,
    // so they are dropped from the mask unless they share the rank or
    // file being masked
    let edges = ((BitBoard::RANK_1 | BitBoard::RANK_8) & !BitBoard::rank_bb(sq))
        | ((BitBoard::FILE_A | BitBoard::FILE_H) & !BitBoard::file_bb(sq));

    let mask = sliding_attack(deltas, sq, 0) & !edges;
    let bits = mask.count_ones();
    let size = 1usize << bits;

    entry.mask = mask;
    entry.shift = 64 - bits;
    entry.offset = offset;

    // Carry-Rippler enumeration of every subset of the mask
    let mut occupancies = Vec::with_capacity(size);
    let mut references = Vec::with_capacity(size);
    let mut subset = 0u64;
    loop {
        occupancies.push(subset);
        references.push(sliding_attack(deltas, sq, subset));
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    if cfg!(all(target_arch = "x86_64", target_feature = "bmi2")) {
        // pext is injective on the mask bits, no search needed
        for i in 0..size {
            table[entry.index(occupancies[i])] = references[i];
        }
        return offset + size;
    }

    loop {
        let magic = rng.sparse();
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }

        entry.magic = magic;
        let slice = &mut table[offset..offset + size];
        slice.fill(0);

        // The fill doubles as the injectivity check: a destructive
        // collision rejects this candidate
        let mut ok = true;
        for i in 0..size {
            let idx = (occupancies[i].wrapping_mul(magic) >> entry.shift) as usize;
            if slice[idx] == 0 {
                slice[idx] = references[i];
            } else if slice[idx] != references[i] {
                ok = false;
                break;
            }
        }

        if ok {
            return offset + size;
        }
    }
}

/// Ray-trace the true attack set, blockers included
pub fn sliding_attack(deltas: &[i8; 4], sq: Square, occ: u64) -> u64 {
    let mut attacks = 0;

    for &delta in deltas {
        let mut cur = sq;
        while can_step(cur, delta) {
            cur += delta;
            attacks |= BitBoard::from_sq(cur);
            if BitBoard::contains(occ, cur) {
                break;
            }
        }
    }

    attacks
}

/// Whether stepping from `sq` by `delta` stays on the board without
/// wrapping around a file edge
fn can_step(sq: Square, delta: i8) -> bool {
    let next = sq + delta;
    if !(0..64).contains(&next) {
        return false;
    }

    let (file, _) = coord_from_square(sq);
    let (next_file, _) = coord_from_square(next);
    (file - next_file).abs() <= 1
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::square_from_string;

    fn sq(s: &str) -> Square {
        square_from_string(s).unwrap()
    }

    #[test]
    fn masks_exclude_edges() {
        let (bishop, rook, _) = build();

        // rook on a1: 6 squares up the a-file + 6 along the first rank
        assert_eq!(rook[sq("a1") as usize].mask.count_ones(), 12);
        // rook on e4: full relevant cross
        assert_eq!(rook[sq("e4") as usize].mask.count_ones(), 10);
        // bishop on the long diagonal corner
        assert_eq!(bishop[sq("a1") as usize].mask.count_ones(), 6);
        assert_eq!(bishop[sq("e4") as usize].mask.count_ones(), 9);
    }

    #[test]
    fn table_lookup_matches_ray_trace() {
        let (bishop, rook, attacks) = build();

        let positions = [
            (sq("e4"), 0u64),
            (sq("a1"), BitBoard::from_sq(sq("a4")) | BitBoard::from_sq(sq("c3"))),
            (sq("h8"), BitBoard::from_sq(sq("h4")) | BitBoard::from_sq(sq("e5"))),
            (sq("d5"), BitBoard::RANK_2 | BitBoard::FILE_A),
        ];

        for (s, occ) in positions {
            let entry = &rook[s as usize];
            assert_eq!(attacks[entry.index(occ)], sliding_attack(&ROOK_DELTAS, s, occ));

            let entry = &bishop[s as usize];
            assert_eq!(attacks[entry.index(occ)], sliding_attack(&BISHOP_DELTAS, s, occ));
        }
    }

    #[test]
    fn blockers_cut_rays() {
        let (_, rook, attacks) = build();

        // rook on a1, blocker on a3: a2 and a3 visible up the file
        let occ = BitBoard::from_sq(sq("a3"));
        let atk = attacks[rook[sq("a1") as usize].index(occ)];
        assert!(BitBoard::contains(atk, sq("a2")));
        assert!(BitBoard::contains(atk, sq("a3")));
        assert!(!BitBoard::contains(atk, sq("a4")));
    }
}
