use crate::{
    bitboard::BitBoard,
    bitmove::{BitMove, MoveFlag},
    board::Board,
    defs::{GenStage, PieceType, Player},
    gen::Tables,
    movelist::MoveList,
};

/// Generate the pseudo-legal moves of one stage.
///
/// The check status of the position shapes what comes out: with a
/// single checker every non-king destination is masked to capturing or
/// blocking it, in double check only king moves are produced.
pub fn generate(board: &Board, t: &Tables, stage: GenStage, move_list: &mut MoveList) {
    let us = board.turn;
    let occ = board.occ_bb();
    let opp_bb = board.player_bb(us.opp());
    let king_sq = board.cur_king_square();
    let checkers = board.pos.checkers_bb;

    let stage_mask = match stage {
        GenStage::Captures => opp_bb,
        GenStage::Quiets => !occ,
    };
    let flag = match stage {
        GenStage::Captures => MoveFlag::CAPTURE,
        GenStage::Quiets => MoveFlag::QUIET,
    };

    // King moves ignore the check mask, the king walks out instead
    let mut king_bb = t.king_attacks(king_sq) & stage_mask;
    while king_bb != 0 {
        let dest = BitBoard::pop_lsb(&mut king_bb);
        move_list.push(BitMove::from_flag(king_sq, dest, flag));
    }

    if BitBoard::more_than_one(checkers) {
        return;
    }

    let check_mask = if checkers != 0 {
        let checker_sq = BitBoard::bit_scan_forward(checkers);
        t.between(king_sq, checker_sq) | checkers
    } else {
        !BitBoard::EMPTY
    };
    let target = stage_mask & check_mask;

    gen_pawn_moves(board, t, stage, target, check_mask, move_list);

    for piece_type in [
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
    ] {
        let mut piece_bb = board.player_piece_bb(us, piece_type);
        while piece_bb != 0 {
            let src = BitBoard::pop_lsb(&mut piece_bb);
            let mut bb = t.attacks(piece_type, src, occ, us) & target;
            while bb != 0 {
                let dest = BitBoard::pop_lsb(&mut bb);
                move_list.push(BitMove::from_flag(src, dest, flag));
            }
        }
    }

    // Castling is quiet and never a check evasion. Only the path
    // occupancy is settled here, attack freedom is a legality question.
    if stage == GenStage::Quiets && checkers == 0 {
        if board.can_castle_king(us)
            && !BitBoard::contains(occ, king_sq + 1)
            && !BitBoard::contains(occ, king_sq + 2)
        {
            move_list.push(BitMove::from_flag(
                king_sq,
                king_sq + 2,
                MoveFlag::CASTLE_KING,
            ));
        }
        if board.can_castle_queen(us)
            && !BitBoard::contains(occ, king_sq - 1)
            && !BitBoard::contains(occ, king_sq - 2)
            && !BitBoard::contains(occ, king_sq - 3)
        {
            move_list.push(BitMove::from_flag(
                king_sq,
                king_sq - 2,
                MoveFlag::CASTLE_QUEEN,
            ));
        }
    }
}

/// Every legal move in the position
pub fn generate_legal(board: &Board, t: &Tables, move_list: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate(board, t, GenStage::Captures, &mut pseudo);
    generate(board, t, GenStage::Quiets, &mut pseudo);

    for &m in &pseudo {
        if board.is_legal_move(t, m) {
            move_list.push(m);
        }
    }
}

/// White pawns move towards rank 8, which holds the low bits
#[inline]
const fn pawn_push(pawns: u64, player: Player) -> u64 {
    match player {
        Player::White => pawns >> 8,
        Player::Black => pawns << 8,
    }
}

#[inline]
const fn pawn_cap_east(pawns: u64, player: Player) -> u64 {
    match player {
        Player::White => (pawns & !BitBoard::FILE_H) >> 7,
        Player::Black => (pawns & !BitBoard::FILE_H) << 9,
    }
}

#[inline]
const fn pawn_cap_west(pawns: u64, player: Player) -> u64 {
    match player {
        Player::White => (pawns & !BitBoard::FILE_A) >> 9,
        Player::Black => (pawns & !BitBoard::FILE_A) << 7,
    }
}

fn gen_pawn_moves(
    board: &Board,
    t: &Tables,
    stage: GenStage,
    target: u64,
    check_mask: u64,
    move_list: &mut MoveList,
) {
    let us = board.turn;
    let opp_bb = board.player_bb(us.opp());
    let occ = board.occ_bb();
    let pawn_dir = us.pawn_dir();
    let rank_3 = us.rank_3();
    let rank_7 = us.rank_7();

    let pawns = board.player_piece_bb(us, PieceType::Pawn);
    let pwn_rank_7 = pawns & rank_7;
    let pwn_not_rank_7 = pawns & !rank_7;

    match stage {
        GenStage::Quiets => {
            // One square forward, then the double push through rank 3
            let m1 = pawn_push(pwn_not_rank_7, us) & !occ;
            let mut m2 = pawn_push(m1 & rank_3, us) & !occ & target;
            let mut m1 = m1 & target;

            while m1 != 0 {
                let dest = BitBoard::pop_lsb(&mut m1);
                move_list.push(BitMove::from_squares(dest - pawn_dir, dest));
            }
            while m2 != 0 {
                let dest = BitBoard::pop_lsb(&mut m2);
                move_list.push(BitMove::from_flag(
                    dest - pawn_dir - pawn_dir,
                    dest,
                    MoveFlag::DOUBLE_PAWN_PUSH,
                ));
            }

            // Minor promotions
            if pwn_rank_7 != 0 {
                let mut m1 = pawn_push(pwn_rank_7, us) & !occ & check_mask;
                let mut m2 = pawn_cap_east(pwn_rank_7, us) & opp_bb & check_mask;
                let mut m3 = pawn_cap_west(pwn_rank_7, us) & opp_bb & check_mask;

                while m1 != 0 {
                    let dest = BitBoard::pop_lsb(&mut m1);
                    make_minor_promotions(dest - pawn_dir, dest, false, move_list);
                }
                while m2 != 0 {
                    let dest = BitBoard::pop_lsb(&mut m2);
                    make_minor_promotions(dest - pawn_dir - 1, dest, true, move_list);
                }
                while m3 != 0 {
                    let dest = BitBoard::pop_lsb(&mut m3);
                    make_minor_promotions(dest - pawn_dir + 1, dest, true, move_list);
                }
            }
        }
        GenStage::Captures => {
            let mut m1 = pawn_cap_east(pwn_not_rank_7, us) & target;
            let mut m2 = pawn_cap_west(pwn_not_rank_7, us) & target;

            while m1 != 0 {
                let dest = BitBoard::pop_lsb(&mut m1);
                move_list.push(BitMove::from_flag(
                    dest - pawn_dir - 1,
                    dest,
                    MoveFlag::CAPTURE,
                ));
            }
            while m2 != 0 {
                let dest = BitBoard::pop_lsb(&mut m2);
                move_list.push(BitMove::from_flag(
                    dest - pawn_dir + 1,
                    dest,
                    MoveFlag::CAPTURE,
                ));
            }

            // En passant sits outside the check mask: whether it
            // resolves a check is settled by the legality test
            if board.can_ep() {
                let ep_square = board.pos.ep_square;
                let mut m3 = t.pawn_attacks(us.opp(), ep_square) & pwn_not_rank_7;

                while m3 != 0 {
                    let src = BitBoard::pop_lsb(&mut m3);
                    move_list.push(BitMove::from_flag(src, ep_square, MoveFlag::EN_PASSANT));
                }
            }

            // Queen promotions count as tactical, pushed or capturing
            if pwn_rank_7 != 0 {
                let mut m1 = pawn_push(pwn_rank_7, us) & !occ & check_mask;
                let mut m2 = pawn_cap_east(pwn_rank_7, us) & opp_bb & check_mask;
                let mut m3 = pawn_cap_west(pwn_rank_7, us) & opp_bb & check_mask;

                while m1 != 0 {
                    let dest = BitBoard::pop_lsb(&mut m1);
                    move_list.push(BitMove::from_flag(
                        dest - pawn_dir,
                        dest,
                        MoveFlag::PROMOTE_QUEEN,
                    ));
                }
                while m2 != 0 {
                    let dest = BitBoard::pop_lsb(&mut m2);
                    move_list.push(BitMove::from_flag(
                        dest - pawn_dir - 1,
                        dest,
                        MoveFlag::PROMOTE_QUEEN_CAPTURE,
                    ));
                }
                while m3 != 0 {
                    let dest = BitBoard::pop_lsb(&mut m3);
                    move_list.push(BitMove::from_flag(
                        dest - pawn_dir + 1,
                        dest,
                        MoveFlag::PROMOTE_QUEEN_CAPTURE,
                    ));
                }
            }
        }
    }
}

fn make_minor_promotions(src: i8, dest: i8, capture: bool, move_list: &mut MoveList) {
    let cap_bit = if capture { MoveFlag::CAPTURE } else { 0 };

    move_list.push(BitMove::from_flag(src, dest, MoveFlag::PROMOTE_KNIGHT | cap_bit));
    move_list.push(BitMove::from_flag(src, dest, MoveFlag::PROMOTE_BISHOP | cap_bit));
    move_list.push(BitMove::from_flag(src, dest, MoveFlag::PROMOTE_ROOK | cap_bit));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_tables;

    #[test]
    fn start_position_moves() {
        let t = test_tables();
        let board = Board::start_pos(t);
        let moves = MoveList::legal(&board, t);
        assert_eq!(moves.size(), 20);
    }

    #[test]
    fn stages_are_disjoint() {
        let t = test_tables();
        let board = Board::from_fen(
            t,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();

        let mut captures = MoveList::new();
        generate(&board, t, GenStage::Captures, &mut captures);
        let mut quiets = MoveList::new();
        generate(&board, t, GenStage::Quiets, &mut quiets);

        for &m in &captures {
            assert!(BitMove::is_tactical(m), "{}", BitMove::pretty_move(m));
            assert!(!quiets.contains(m));
        }
        for &m in &quiets {
            assert!(!BitMove::is_cap(m), "{}", BitMove::pretty_move(m));
        }
    }

    #[test]
    fn check_evasions_only() {
        let t = test_tables();
        // white king on e1 checked by the rook on e8
        let board = Board::from_fen(t, "4r2k/8/8/8/8/8/3N4/R3K3 w Q - 0 1").unwrap();
        assert!(board.in_check());

        let moves = MoveList::legal(&board, t);
        for &m in &moves {
            let mut b = board.clone();
            b.make_move(t, m);
            // the mover's king may not be left in check
            let king_sq = b.king_square(board.turn);
            assert!(
                !b.square_attacked(t, king_sq, b.occ_bb(), b.turn),
                "{}",
                BitMove::pretty_move(m)
            );
        }

        // Nd2 can block on e4, the king has its escapes, no castling
        assert!(moves.contains(BitMove::from_flag(51, 36, MoveFlag::QUIET)));
        for &m in &moves {
            assert!(!BitMove::is_castle(m));
        }
    }

    #[test]
    fn double_check_forces_the_king() {
        let t = test_tables();
        let board = Board::from_fen(t, "4r2k/8/8/8/7b/8/8/4K3 w - - 0 1").unwrap();
        assert!(BitBoard::more_than_one(board.pos.checkers_bb));

        let moves = MoveList::legal(&board, t);
        for &m in &moves {
            assert_eq!(BitMove::src(m), board.cur_king_square());
        }
        assert!(!moves.is_empty());
    }

    #[test]
    fn legality_filter_agrees_with_pseudo_legal() {
        let t = test_tables();
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        ];

        for fen in fens {
            let board = Board::from_fen(t, fen).unwrap();
            let legal = MoveList::legal(&board, t);
            for &m in &legal {
                assert!(board.is_pseudo_legal(t, m), "{fen}: {}", BitMove::pretty_move(m));
            }
        }
    }
}
