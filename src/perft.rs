use std::time::Instant;

use crate::{bitmove::BitMove, board::Board, gen::Tables, movelist::MoveList};

/// Leaf count with a per-root-move breakdown printed, for debugging
/// against another engine's `divide` output
pub fn divide(board: &mut Board, t: &Tables, depth: u8) -> u64 {
    let start = Instant::now();
    let nodes = inner_perft(true, board, t, depth);
    let elapsed = start.elapsed();

    println!();
    println!("Total time (s):   {}", elapsed.as_secs_f64());
    println!("Num moves     :   {}", MoveList::legal(board, t).size());
    println!("Num nodes     :   {nodes}");
    println!(
        "Nodes/s       :   {}",
        (nodes as f64 / elapsed.as_secs_f64()) as u64
    );

    nodes
}

pub fn perft(board: &mut Board, t: &Tables, depth: u8) -> u64 {
    inner_perft(false, board, t, depth)
}

fn inner_perft(root: bool, board: &mut Board, t: &Tables, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = MoveList::legal(board, t);
    let mut count = 0;

    for &m in &moves {
        let add = if depth == 1 {
            1
        } else {
            board.make_move(t, m);
            let nodes = if depth == 2 {
                MoveList::legal(board, t).size() as u64
            } else {
                inner_perft(false, board, t, depth - 1)
            };
            board.unmake_move(m);
            nodes
        };

        count += add;

        if root {
            println!("{}: {}", BitMove::pretty_move(m), add);
        }
    }

    count
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{board::KIWIPETE, test_tables};

    fn run(fen: &str, depth: u8) -> u64 {
        let t = test_tables();
        let mut board = Board::from_fen(t, fen).unwrap();
        perft(&mut board, t, depth)
    }

    #[test]
    fn start_position() {
        let t = test_tables();
        let mut board = Board::start_pos(t);

        assert_eq!(perft(&mut board, t, 1), 20);
        assert_eq!(perft(&mut board, t, 2), 400);
        assert_eq!(perft(&mut board, t, 3), 8_902);
        assert_eq!(perft(&mut board, t, 4), 197_281);
        assert_eq!(perft(&mut board, t, 5), 4_865_609);
    }

    #[test]
    fn kiwipete() {
        assert_eq!(run(KIWIPETE, 1), 48);
        assert_eq!(run(KIWIPETE, 2), 2_039);
        assert_eq!(run(KIWIPETE, 3), 97_862);
        assert_eq!(run(KIWIPETE, 4), 4_085_603);
    }

    #[test]
    fn endgame_with_promotions() {
        // position 3 from the chessprogramming wiki
        let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
        assert_eq!(run(fen, 1), 14);
        assert_eq!(run(fen, 2), 191);
        assert_eq!(run(fen, 3), 2_812);
        assert_eq!(run(fen, 4), 43_238);
        assert_eq!(run(fen, 5), 674_624);
    }

    #[test]
    fn mirrored_castling_traps() {
        // position 4, both orientations count the same
        let white = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
        let black = "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";

        assert_eq!(run(white, 3), 9_467);
        assert_eq!(run(black, 3), 9_467);
        assert_eq!(run(white, 4), 422_333);
        assert_eq!(run(black, 4), 422_333);
    }

    #[test]
    fn talkchess_position() {
        // position 5, catches most make/unmake bugs
        let fen = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
        assert_eq!(run(fen, 1), 44);
        assert_eq!(run(fen, 2), 1_486);
        assert_eq!(run(fen, 3), 62_379);
        assert_eq!(run(fen, 4), 2_103_487);
    }

    #[test]
    #[ignore]
    fn start_position_deep() {
        let t = test_tables();
        let mut board = Board::start_pos(t);
        assert_eq!(perft(&mut board, t, 6), 119_060_324);
    }
}
