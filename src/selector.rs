use crate::{
    bitmove::BitMove,
    board::Board,
    defs::{GenStage, PieceType, Score, MAX_MOVES},
    eval,
    gen::Tables,
    movegen::generate,
    movelist::MoveList,
};

const KILLER_1_BONUS: Score = 900_000;
const KILLER_2_BONUS: Score = 800_000;

enum Stage {
    TTMove,
    GenCaptures,
    EmitCaptures,
    GenQuiets,
    EmitQuiets,
    Done,
}

/// Staged move emission: the hash move first, then captures ordered
/// most-valuable-victim first, then quiets with killer bonuses.
///
/// Moves come out pseudo-legal, the caller runs the legality check.
/// Generating quiets is skipped entirely when a capture cuts off.
pub struct MoveSelector {
    stage: Stage,
    tt_move: u16,
    killers: [u16; 2],
    captures_only: bool,
    moves: MoveList,
    scores: [Score; MAX_MOVES],
    index: usize,
}

impl MoveSelector {
    pub fn new(tt_move: u16, killers: [u16; 2]) -> Self {
        MoveSelector {
            stage: Stage::TTMove,
            tt_move,
            killers,
            captures_only: false,
            moves: MoveList::new(),
            scores: [0; MAX_MOVES],
            index: 0,
        }
    }

    /// Quiescence mode: captures and promotions only, except that a
    /// position in check emits the full evasion set
    pub fn captures(tt_move: u16) -> Self {
        let mut selector = MoveSelector::new(tt_move, [0, 0]);
        selector.captures_only = true;
        selector
    }

    pub fn next(&mut self, board: &Board, t: &Tables) -> Option<u16> {
        loop {
            match self.stage {
                Stage::TTMove => {
                    self.stage = Stage::GenCaptures;

                    let m = self.tt_move;
                    if m != 0
                        && board.is_pseudo_legal(t, m)
                        && (!self.captures_only || board.in_check() || BitMove::is_tactical(m))
                    {
                        return Some(m);
                    }
                }
                Stage::GenCaptures => {
                    self.moves = MoveList::new();
                    self.index = 0;
                    generate(board, t, GenStage::Captures, &mut self.moves);
                    for i in 0..self.moves.size() {
                        self.scores[i] = score_capture(board, self.moves.get(i));
                    }
                    self.stage = Stage::EmitCaptures;
                }
                Stage::EmitCaptures => match self.pick_next() {
                    Some(m) => return Some(m),
                    None => self.stage = Stage::GenQuiets,
                },
                Stage::GenQuiets => {
                    if self.captures_only && !board.in_check() {
                        self.stage = Stage::Done;
                        continue;
                    }

                    self.moves = MoveList::new();
                    self.index = 0;
                    generate(board, t, GenStage::Quiets, &mut self.moves);
                    for i in 0..self.moves.size() {
                        self.scores[i] = self.score_quiet(self.moves.get(i));
                    }
                    self.stage = Stage::EmitQuiets;
                }
                Stage::EmitQuiets => match self.pick_next() {
                    Some(m) => return Some(m),
                    None => self.stage = Stage::Done,
                },
                Stage::Done => return None,
            }
        }
    }

    /// Selection pass: swap the best remaining move to the front
    /// instead of sorting the whole list
    fn pick_next(&mut self) -> Option<u16> {
        loop {
            if self.index >= self.moves.size() {
                return None;
            }

            let mut best = self.index;
            for i in self.index + 1..self.moves.size() {
                if self.scores[i] > self.scores[best] {
                    best = i;
                }
            }
            self.moves.swap(self.index, best);
            self.scores.swap(self.index, best);

            let m = self.moves.get(self.index);
            self.index += 1;

            // already emitted in the hash-move stage
            if m != self.tt_move {
                return Some(m);
            }
        }
    }

    fn score_quiet(&self, m: u16) -> Score {
        if m == self.killers[0] {
            KILLER_1_BONUS
        } else if m == self.killers[1] {
            KILLER_2_BONUS
        } else if BitMove::is_prom(m) {
            eval::piece_value(BitMove::prom_type(BitMove::flag(m)))
        } else {
            0
        }
    }
}

fn score_capture(board: &Board, m: u16) -> Score {
    let mut score = if BitMove::is_ep(m) {
        eval::piece_value(PieceType::Pawn)
    } else if BitMove::is_cap(m) {
        eval::piece_value(board.piece_type(BitMove::dest(m)))
    } else {
        0
    };

    if BitMove::is_prom(m) {
        score += eval::piece_value(BitMove::prom_type(BitMove::flag(m)));
    }

    // among equal victims, try the cheapest attacker first
    score - board.piece_type(BitMove::src(m)).as_usize() as Score
}
