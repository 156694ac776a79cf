use crate::{
    bitboard::BitBoard,
    defs::Player,
    utils::{b_max, coord_from_square, is_in_board},
};

pub const KING_ATK: [u64; 64] = gen_king();
pub const KNIGHT_ATK: [u64; 64] = gen_knight();
pub const PAWN_ATK: [[u64; 64]; 2] = gen_pawn();

const KING_DIRS: [i8; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];
const KNIGHT_DIRS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];

const fn gen_king() -> [u64; 64] {
    let mut king_atk: [u64; 64] = [0; 64];
    let mut src = 0;

    while src < 64 {
        let (x, y) = coord_from_square(src);
        let mut dir_idx = 0;

        while dir_idx < KING_DIRS.len() {
            let t_sq = src + KING_DIRS[dir_idx];
            let (t_x, t_y) = coord_from_square(t_sq);

            let x_dis = (x - t_x).abs();
            let y_dis = (y - t_y).abs();
            let move_dist = b_max(x_dis, y_dis);

            if move_dist == 1 && is_in_board(t_sq) {
                king_atk[src as usize] |= BitBoard::from_sq(t_sq);
            }

            dir_idx += 1;
        }

        src += 1;
    }

    king_atk
}

const fn gen_knight() -> [u64; 64] {
    let mut knight_atk: [u64; 64] = [0; 64];
    let mut src = 0;

    while src < 64 {
        let (x, y) = coord_from_square(src);
        let mut dir_idx = 0;

        while dir_idx < KNIGHT_DIRS.len() {
            let t_sq = src + KNIGHT_DIRS[dir_idx];
            let (t_x, t_y) = coord_from_square(t_sq);

            let x_dis = (x - t_x).abs();
            let y_dis = (y - t_y).abs();
            let move_dist = b_max(x_dis, y_dis);

            if move_dist == 2 && is_in_board(t_sq) {
                knight_atk[src as usize] |= BitBoard::from_sq(t_sq);
            }

            dir_idx += 1;
        }

        src += 1;
    }

    knight_atk
}

/// White pawns attack towards rank 8, which holds the low bits
const fn gen_pawn() -> [[u64; 64]; 2] {
    let mut pawn_atk: [[u64; 64]; 2] = [[0; 64]; 2];
    let mut src = 0;

    while src < 64 {
        let (x, y) = coord_from_square(src);
        let mut white_bb = BitBoard::EMPTY;
        let mut black_bb = BitBoard::EMPTY;

        if x > 0 {
            if y > 0 {
                white_bb |= BitBoard::from_sq(src - 9);
            }
            if y < 7 {
                black_bb |= BitBoard::from_sq(src + 7);
            }
        }
        if x < 7 {
            if y > 0 {
                white_bb |= BitBoard::from_sq(src - 7);
            }
            if y < 7 {
                black_bb |= BitBoard::from_sq(src + 9);
            }
        }

        pawn_atk[Player::White.as_usize()][src as usize] = white_bb;
        pawn_atk[Player::Black.as_usize()][src as usize] = black_bb;

        src += 1;
    }

    pawn_atk
}
