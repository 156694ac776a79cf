use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::debug;

use crate::{
    bitmove::BitMove,
    board::Board,
    defs::Score,
    eval::evaluate,
    gen::Tables,
    movelist::MoveList,
    search_info::SearchInfo,
    selector::MoveSelector,
    table::{score_from_tt, score_to_tt, Bound, TWrapper},
    utils::print_search_info,
};

pub const CHECKMATE: Score = 30_000;
pub const INFINITE: Score = 31_000;
pub const DRAW: Score = 0;
pub const MAX_PLY: usize = 128;
pub const MAX_SEARCH_DEPTH: usize = MAX_PLY - 1;

/// Scores beyond this bound encode a mate distance
pub const IS_MATE: Score = CHECKMATE - MAX_PLY as Score;

const ASPIRATION_WINDOW: Score = 50;
const FUTILITY_MARGIN: Score = 120;

pub struct Searcher {
    pub board: Board,
    tables: Arc<Tables>,
    tt: Arc<TWrapper>,
    abort: Arc<AtomicBool>,
    pub info: SearchInfo,
    pub num_nodes: u64,
    pub best_move: u16,
    pub ponder_move: u16,
    killers: [[u16; 2]; MAX_PLY],
    pv: [[u16; MAX_PLY]; MAX_PLY],
    pv_len: [usize; MAX_PLY],
}

impl Searcher {
    pub fn new(
        board: Board,
        tables: Arc<Tables>,
        tt: Arc<TWrapper>,
        abort: Arc<AtomicBool>,
        info: SearchInfo,
    ) -> Self {
        Searcher {
            board,
            tables,
            tt,
            abort,
            info,
            num_nodes: 0,
            best_move: 0,
            ponder_move: 0,
            killers: [[0; 2]; MAX_PLY],
            pv: [[0; MAX_PLY]; MAX_PLY],
            pv_len: [0; MAX_PLY],
        }
    }

    fn should_stop(&self) -> bool {
        self.abort.load(Ordering::Relaxed) || !self.info.has_time()
    }

    /// Run the search and print the `bestmove` line when it ends
    pub fn run(&mut self) {
        self.iterate();

        if self.best_move == 0 {
            // aborted before depth 1 completed, fall back to anything legal
            let moves = MoveList::legal(&self.board, &self.tables);
            if !moves.is_empty() {
                self.best_move = moves.get(0);
            }
        }

        if self.best_move == 0 {
            // mated or stalemated, there is nothing to play
            println!("bestmove 0000");
        } else if self.ponder_move != 0 {
            println!(
                "bestmove {} ponder {}",
                BitMove::pretty_move(self.best_move),
                BitMove::pretty_move(self.ponder_move)
            );
        } else {
            println!("bestmove {}", BitMove::pretty_move(self.best_move));
        }
    }

    /// Iterative deepening with an aspiration window around the last
    /// score. A fail outside the window repeats the depth with a full
    /// window.
    pub fn iterate(&mut self) -> Score {
        self.info.start(self.board.turn);
        self.tt.new_generation();

        let mut alpha = -INFINITE;
        let mut beta = INFINITE;
        let mut best_score = -INFINITE;
        let mut depth = 1;

        while depth <= self.info.depth as u8 {
            self.num_nodes = 0;
            let score = self.alpha_beta(alpha, beta, depth, 0, true);

            if self.should_stop() {
                break;
            }

            if score <= alpha || score >= beta {
                debug!("depth {depth} failed {score} outside [{alpha}, {beta}]");
                alpha = -INFINITE;
                beta = INFINITE;
                continue;
            }

            best_score = score;
            self.best_move = self.pv[0][0];
            self.ponder_move = if self.pv_len[0] > 1 { self.pv[0][1] } else { 0 };

            let elapsed = self.info.elapsed();
            print_search_info(
                depth,
                score,
                elapsed.as_millis() as u64,
                elapsed.as_secs_f64().max(1e-6),
                self.num_nodes,
                &self.pv[0][..self.pv_len[0]],
            );

            alpha = score - ASPIRATION_WINDOW;
            beta = score + ASPIRATION_WINDOW;
            depth += 1;
        }

        best_score
    }

    fn alpha_beta(
        &mut self,
        mut alpha: Score,
        mut beta: Score,
        depth: u8,
        ply: usize,
        is_pv: bool,
    ) -> Score {
        if depth == 0 {
            return self.quiescence(alpha, beta, ply);
        }

        self.num_nodes += 1;
        self.pv_len[ply] = 0;

        let is_root = ply == 0;

        if !is_root {
            if self.board.is_draw() {
                return DRAW;
            }
            if ply >= MAX_PLY - 1 {
                return evaluate(&self.board);
            }

            // an earlier mate bounds what this node can still achieve
            alpha = alpha.max(-CHECKMATE + ply as Score);
            beta = beta.min(CHECKMATE - ply as Score - 1);
            if alpha >= beta {
                return alpha;
            }
        }

        let key = self.board.key();
        let mut tt_move = 0;

        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.m;

            if !is_root && !is_pv && entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                if entry.is_exact()
                    || (entry.is_lower() && score >= beta)
                    || (entry.is_upper() && score <= alpha)
                {
                    return score;
                }
            }
        }

        let in_check = self.board.in_check();
        let static_eval = if in_check {
            -INFINITE
        } else {
            evaluate(&self.board)
        };

        let mut selector = MoveSelector::new(tt_move, self.killers[ply]);
        let old_alpha = alpha;
        let mut best_score = -INFINITE;
        let mut best_move = 0;
        let mut legal_moves = 0;

        while let Some(m) = selector.next(&self.board, &self.tables) {
            if !self.board.is_legal_move(&self.tables, m) {
                continue;
            }

            // quiet moves that cannot lift alpha are skipped at
            // shallow depth, but still count towards mate detection
            if !is_pv
                && !in_check
                && depth <= 3
                && legal_moves > 0
                && !BitMove::is_tactical(m)
                && static_eval + FUTILITY_MARGIN * depth as Score <= alpha
            {
                legal_moves += 1;
                continue;
            }

            self.board.make_move(&self.tables, m);
            legal_moves += 1;

            let score = if legal_moves == 1 {
                -self.alpha_beta(-beta, -alpha, depth - 1, ply + 1, is_pv)
            } else {
                // null-window probe first, re-search on a fail high
                let score = -self.alpha_beta(-alpha - 1, -alpha, depth - 1, ply + 1, false);
                if score > alpha && score < beta {
                    -self.alpha_beta(-beta, -alpha, depth - 1, ply + 1, is_pv)
                } else {
                    score
                }
            };

            self.board.unmake_move(m);

            if self.should_stop() {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = m;

                if score > alpha {
                    alpha = score;
                    self.update_pv(ply, m);

                    if score >= beta {
                        if !BitMove::is_tactical(m) {
                            self.store_killer(ply, m);
                        }
                        self.tt
                            .store(key, m, score_to_tt(score, ply), depth, Bound::Lower);
                        return score;
                    }
                }
            }
        }

        if legal_moves == 0 {
            return if in_check {
                -CHECKMATE + ply as Score
            } else {
                DRAW
            };
        }

        // every legal move was pruned
        if best_score == -INFINITE {
            return alpha;
        }

        let bound = if alpha > old_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt
            .store(key, best_move, score_to_tt(best_score, ply), depth, bound);

        best_score
    }

    /// Resolve captures until the position is quiet. In check the full
    /// evasion set is searched so mates are never missed.
    fn quiescence(&mut self, mut alpha: Score, beta: Score, ply: usize) -> Score {
        self.num_nodes += 1;
        self.pv_len[ply] = 0;

        if self.board.is_draw() {
            return DRAW;
        }
        if ply >= MAX_PLY - 1 {
            return evaluate(&self.board);
        }

        let in_check = self.board.in_check();
        let mut best_score = if in_check {
            // no evasion found below means mate
            -CHECKMATE + ply as Score
        } else {
            let stand_pat = evaluate(&self.board);
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            stand_pat
        };

        let tt_move = self.tt.best_move(self.board.key()).unwrap_or(0);
        let mut selector = MoveSelector::captures(tt_move);

        while let Some(m) = selector.next(&self.board, &self.tables) {
            if !self.board.is_legal_move(&self.tables, m) {
                continue;
            }

            self.board.make_move(&self.tables, m);
            let score = -self.quiescence(-beta, -alpha, ply + 1);
            self.board.unmake_move(m);

            if self.should_stop() {
                return 0;
            }

            if score > best_score {
                best_score = score;

                if score > alpha {
                    alpha = score;
                    if score >= beta {
                        break;
                    }
                }
            }
        }

        best_score
    }

    fn update_pv(&mut self, ply: usize, m: u16) {
        let child_len = if ply + 1 < MAX_PLY {
            self.pv_len[ply + 1]
        } else {
            0
        };

        let (head, tail) = self.pv.split_at_mut(ply + 1);
        let line = &mut head[ply];
        line[0] = m;
        line[1..=child_len].copy_from_slice(&tail[0][..child_len]);

        self.pv_len[ply] = child_len + 1;
    }

    fn store_killer(&mut self, ply: usize, m: u16) {
        if self.killers[ply][0] != m {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = m;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{table::DEFAULT_SIZE_MB, test_tables, utils::square_from_string};

    fn search(fen: &str, depth: u8) -> (Score, u16) {
        let t = test_tables();
        let board = Board::from_fen(t, fen).unwrap();
        let tables = Arc::new(Tables::new());
        let tt = Arc::new(TWrapper::new(DEFAULT_SIZE_MB));
        let abort = Arc::new(AtomicBool::new(false));
        let info = SearchInfo::with_depth(depth as usize);

        let mut searcher = Searcher::new(board, tables, tt, abort, info);
        let score = searcher.iterate();
        (score, searcher.best_move)
    }

    #[test]
    fn finds_mate_in_one() {
        let (score, best) = search("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1", 3);

        assert_eq!(score, CHECKMATE - 1);
        assert_eq!(BitMove::src(best), square_from_string("e1").unwrap());
        assert_eq!(BitMove::dest(best), square_from_string("e8").unwrap());
    }

    #[test]
    fn finds_mate_in_two() {
        // rook and king vs bare king: 1. Kb6 Kb8 2. Rh8#
        let (score, best) = search("k7/8/2K5/8/8/8/8/7R w - - 0 1", 5);

        // the shortest mate wins on score, not some longer one
        assert_eq!(score, CHECKMATE - 3);
        assert_eq!(BitMove::src(best), square_from_string("c6").unwrap());
        assert_eq!(BitMove::dest(best), square_from_string("b6").unwrap());
    }

    #[test]
    fn checkmated_at_the_root() {
        // back rank mate already on the board
        let (score, best) = search("R5k1/5ppp/8/8/8/8/8/7K b - - 0 1", 3);

        assert_eq!(score, -CHECKMATE);
        assert_eq!(best, 0);
    }

    #[test]
    fn stalemate_is_a_draw() {
        let (score, _) = search("k7/8/1Q6/8/8/8/8/K7 b - - 0 1", 2);
        assert_eq!(score, DRAW);
    }

    #[test]
    fn wins_a_hanging_queen() {
        let (score, best) = search("7k/8/2q1p3/3P4/8/8/8/7K w - - 0 1", 4);

        assert_eq!(BitMove::src(best), square_from_string("d5").unwrap());
        assert_eq!(BitMove::dest(best), square_from_string("c6").unwrap());
        // a queen down before the capture, level after it
        assert!(score > -200);
    }

    #[test]
    fn deterministic_at_fixed_depth() {
        const FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

        let (score_a, best_a) = search(FEN, 4);
        let (score_b, best_b) = search(FEN, 4);

        assert_eq!(score_a, score_b);
        assert_eq!(best_a, best_b);
    }

    #[test]
    fn preset_abort_still_yields_a_legal_move() {
        let t = test_tables();
        let board = Board::start_pos(t);
        let tables = Arc::new(Tables::new());
        let tt = Arc::new(TWrapper::new(1));
        let abort = Arc::new(AtomicBool::new(true));

        let mut searcher =
            Searcher::new(board, tables, tt, abort, SearchInfo::with_depth(5));
        searcher.run();

        let legal = MoveList::legal(&searcher.board, test_tables());
        assert!(legal.contains(searcher.best_move));
    }
}
