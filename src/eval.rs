use crate::{
    board::Board,
    defs::{PieceType, Player, Score, NUM_PIECES},
};

pub const PIECE_VALUE: [Score; NUM_PIECES] = [100, 300, 306, 500, 900, 0];

pub const fn piece_value(piece: PieceType) -> Score {
    PIECE_VALUE[piece.as_usize()]
}

/// Plain material count, from the perspective of the side to move.
///
/// Deliberately simple: the search only needs a deterministic oracle.
pub fn evaluate(board: &Board) -> Score {
    let mut score = 0;

    for piece in 0..NUM_PIECES {
        let piece_type = PieceType::from_usize(piece);
        let value = piece_value(piece_type);

        score += value * board.player_piece_bb(Player::White, piece_type).count_ones() as Score;
        score -= value * board.player_piece_bb(Player::Black, piece_type).count_ones() as Score;
    }

    match board.turn {
        Player::White => score,
        Player::Black => -score,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_tables;

    #[test]
    fn start_position_is_balanced() {
        let t = test_tables();
        let board = Board::start_pos(t);
        assert_eq!(evaluate(&board), 0);
    }

    #[test]
    fn side_to_move_relative() {
        let t = test_tables();
        // white is a rook up
        let white = Board::from_fen(t, "4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let black = Board::from_fen(t, "4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();

        assert_eq!(evaluate(&white), 500);
        assert_eq!(evaluate(&black), -500);
    }
}
