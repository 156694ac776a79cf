use crate::bitmove::BitMove;
use crate::defs::{Score, Square};
use crate::search::{CHECKMATE, IS_MATE};

/// Parse coordinate notation, e.g. "e4"
///
/// Rank 8 holds the squares 0-7, so the rank digit is flipped
pub fn square_from_string(str: &str) -> Option<Square> {
    let bytes = str.as_bytes();
    if bytes.len() != 2 {
        return None;
    }

    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file > 7 || rank > 7 {
        return None;
    }

    Some((7 - rank as Square) * 8 + file as Square)
}

pub fn square_to_string(sq: Square) -> String {
    if !is_in_board(sq) {
        return "".to_owned();
    }

    let (file, row) = coord_from_square(sq);
    let file_char = (b'a' + file as u8) as char;
    let rank_char = (b'1' + (7 - row) as u8) as char;

    format!("{file_char}{rank_char}")
}

/// Returns `(file, row)` where row 0 is rank 8
pub const fn coord_from_square(sq: Square) -> (Square, Square) {
    (sq % 8, sq / 8)
}

pub const fn is_in_board(square: Square) -> bool {
    square < 64 && square >= 0
}

/// `const` alternative to [`std::cmp::min`]
pub const fn b_min(a: Square, b: Square) -> Square {
    if a > b {
        b
    } else {
        a
    }
}

/// `const` alternative to [`std::cmp::max`]
pub const fn b_max(a: Square, b: Square) -> Square {
    if a > b {
        a
    } else {
        b
    }
}

pub fn print_search_info(
    depth: u8,
    score: Score,
    total_time: u64,
    search_time: f64,
    num_nodes: u64,
    pv: &[u16],
) {
    let score_str = if score.abs() > IS_MATE {
        let mate_in = (CHECKMATE - score.abs() + 1) / 2;
        format!("mate {}", mate_in * score.signum())
    } else {
        format!("cp {score}")
    };

    print!(
        "info depth {} score {} nodes {} time {} nps {}",
        depth,
        score_str,
        num_nodes,
        total_time,
        (num_nodes as f64 / search_time) as u64
    );
    print_pv(pv);
}

pub fn print_pv(pv: &[u16]) {
    print!(" pv");
    for &m in pv {
        if m == 0 {
            break;
        }
        print!(" {}", BitMove::pretty_move(m));
    }

    println!();
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn square_strings() {
        assert_eq!(square_from_string("a8"), Some(0));
        assert_eq!(square_from_string("h8"), Some(7));
        assert_eq!(square_from_string("a1"), Some(56));
        assert_eq!(square_from_string("e1"), Some(60));
        assert_eq!(square_from_string("e8"), Some(4));
        assert_eq!(square_from_string("x9"), None);
        assert_eq!(square_from_string("e"), None);

        for sq in 0..64 {
            assert_eq!(square_from_string(&square_to_string(sq)), Some(sq));
        }
    }
}
