use crate::{bitboard::BitBoard, defs::Square, utils::coord_from_square};

/// Open segment between two aligned squares, exclusive on both ends
pub const BETWEEN: [[u64; 64]; 64] = gen_between();

/// Full line through two aligned squares, extended to the board edges,
/// both endpoints included
pub const LINE: [[u64; 64]; 64] = gen_line();

pub const fn between(source: Square, dest: Square) -> u64 {
    BETWEEN[source as usize][dest as usize]
}

pub const fn line(source: Square, dest: Square) -> u64 {
    LINE[source as usize][dest as usize]
}

/// Step offset from `source` towards `dest`, or 0 if the squares
/// do not share a rank, file or diagonal
const fn step_towards(source: Square, dest: Square) -> Square {
    let (source_file, source_row) = coord_from_square(source);
    let (dest_file, dest_row) = coord_from_square(dest);

    let df = dest_file - source_file;
    let dr = dest_row - source_row;

    if source == dest || (df != 0 && dr != 0 && df.abs() != dr.abs()) {
        return 0;
    }

    let file_step = if df > 0 {
        1
    } else if df < 0 {
        -1
    } else {
        0
    };
    let row_step = if dr > 0 {
        1
    } else if dr < 0 {
        -1
    } else {
        0
    };

    row_step * 8 + file_step
}

const fn gen_between() -> [[u64; 64]; 64] {
    let mut between = [[0; 64]; 64];
    let mut src: Square = 0;

    while src < 64 {
        let mut dest: Square = 0;

        while dest < 64 {
            let offset = step_towards(src, dest);
            if offset != 0 {
                let mut cur = src + offset;
                while cur != dest {
                    between[src as usize][dest as usize] |= BitBoard::from_sq(cur);
                    cur += offset;
                }
            }

            dest += 1;
        }

        src += 1;
    }

    between
}

const fn gen_line() -> [[u64; 64]; 64] {
    let mut line = [[0; 64]; 64];
    let mut src: Square = 0;

    while src < 64 {
        let mut dest: Square = 0;

        while dest < 64 {
            let offset = step_towards(src, dest);
            if offset != 0 {
                let mut bb = BitBoard::from_sq(src);

                // Walk towards both edges
                let mut cur = src;
                while on_ray(cur, offset) {
                    cur += offset;
                    bb |= BitBoard::from_sq(cur);
                }
                let mut cur = src;
                while on_ray(cur, -offset) {
                    cur -= offset;
                    bb |= BitBoard::from_sq(cur);
                }

                line[src as usize][dest as usize] = bb;
            }

            dest += 1;
        }

        src += 1;
    }

    line
}

/// Whether stepping from `sq` by `offset` stays on the board without
/// wrapping around a file edge
const fn on_ray(sq: Square, offset: Square) -> bool {
    let next = sq + offset;
    if next < 0 || next > 63 {
        return false;
    }

    let (file, _) = coord_from_square(sq);
    let (next_file, _) = coord_from_square(next);
    (file - next_file).abs() <= 1
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bitboard::BitBoard;

    #[test]
    fn between_segments() {
        // a8 (0) to h8 (7): the six squares b8-g8
        assert_eq!(between(0, 7), 0b01111110);
        // adjacent squares have nothing in between
        assert_eq!(between(0, 1), 0);
        // unaligned pair
        assert_eq!(between(0, 12), 0);
        // a8 to h1 hits the long diagonal
        assert_eq!(between(0, 63).count_ones(), 6);
        assert!(BitBoard::contains(between(0, 63), 27));
    }

    #[test]
    fn full_lines() {
        // e-file through e2 (52) and e6 (20)
        assert_eq!(line(52, 20), BitBoard::file_bb(52));
        // the long diagonal holds eight squares
        assert_eq!(line(0, 63).count_ones(), 8);
        assert_eq!(line(0, 12), 0);
        // symmetric
        assert_eq!(line(52, 20), line(20, 52));
    }
}
