use thiserror::Error;

use crate::{
    bitboard::BitBoard,
    bitmove::{BitMove, MoveFlag, MoveKind},
    defs::{
        Castling, Piece, PieceType, Player, Square, FEN_START_STRING, NUM_PIECES, NUM_SIDES,
        NUM_SQUARES,
    },
    gen::Tables,
    history::History,
    position::Position,
    utils::{square_from_string, square_to_string},
    zobrist::Zobrist,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 fields, found {0}")]
    SectionCount(usize),
    #[error("invalid piece character: {0}")]
    Piece(char),
    #[error("invalid side to move: {0}")]
    Turn(String),
    #[error("invalid castling field: {0}")]
    Castling(char),
    #[error("invalid en passant square: {0}")]
    EpSquare(String),
    #[error("invalid clock value: {0}")]
    Clock(String),
    #[error("malformed piece placement")]
    Placement,
}

#[derive(Clone)]
pub struct Board {
    pub turn: Player,
    pub piece_bb: [u64; NUM_PIECES],
    pub side_bb: [u64; NUM_SIDES],
    pub pieces: [Piece; NUM_SQUARES],
    pub pos: Position,
    pub history: History,
    /// Full move number, only used by the FEN writer
    pub fullmove: u16,
}

/// Getter methods
impl Board {
    pub const fn key(&self) -> u64 {
        self.pos.key
    }

    pub const fn piece(&self, square: Square) -> Piece {
        self.pieces[square as usize]
    }

    /// Get the [`PieceType`] of the piece on the provided square
    pub const fn piece_type(&self, square: Square) -> PieceType {
        self.pieces[square as usize].piece_type()
    }

    pub const fn occ_bb(&self) -> u64 {
        self.side_bb[0] | self.side_bb[1]
    }

    pub const fn cur_player_bb(&self) -> u64 {
        self.player_bb(self.turn)
    }

    pub const fn player_bb(&self, side: Player) -> u64 {
        self.side_bb[side.as_usize()]
    }

    pub const fn piece_bb(&self, piece: PieceType) -> u64 {
        self.piece_bb[piece.as_usize()]
    }

    /// Get a piece-like bitboard.
    ///
    /// Eg `piece_like_bb(PieceType::Bishop)` returns queen and bishop bitboards combined
    pub const fn piece_like_bb(&self, piece_like: PieceType) -> u64 {
        self.piece_bb(piece_like) | self.piece_bb(PieceType::Queen)
    }

    pub const fn player_piece_like_bb(&self, side: Player, piece_like: PieceType) -> u64 {
        self.piece_like_bb(piece_like) & self.player_bb(side)
    }

    pub const fn player_piece_bb(&self, side: Player, piece: PieceType) -> u64 {
        self.piece_bb(piece) & self.player_bb(side)
    }

    pub const fn cur_king_square(&self) -> Square {
        let bb = self.player_piece_bb(self.turn, PieceType::King);
        BitBoard::bit_scan_forward(bb)
    }

    pub const fn king_square(&self, side: Player) -> Square {
        let bb = self.player_piece_bb(side, PieceType::King);
        BitBoard::bit_scan_forward(bb)
    }

    pub const fn in_check(&self) -> bool {
        self.pos.checkers_bb != 0
    }

    pub const fn can_ep(&self) -> bool {
        self.pos.ep_square < 64
    }

    pub const fn ep_file(&self) -> Square {
        self.pos.ep_square % 8
    }

    pub const fn can_castle_queen(&self, side: Player) -> bool {
        match side {
            Player::White => self.pos.castling & Castling::WQ != 0,
            Player::Black => self.pos.castling & Castling::BQ != 0,
        }
    }

    pub const fn can_castle_king(&self, side: Player) -> bool {
        match side {
            Player::White => self.pos.castling & Castling::WK != 0,
            Player::Black => self.pos.castling & Castling::BK != 0,
        }
    }

    /// All pieces of either side that attack `sq` under the given occupancy
    pub fn attackers_to(&self, t: &Tables, sq: Square, occ: u64) -> u64 {
        t.pawn_attacks(Player::White, sq) & self.player_piece_bb(Player::Black, PieceType::Pawn)
            | t.pawn_attacks(Player::Black, sq)
                & self.player_piece_bb(Player::White, PieceType::Pawn)
            | t.knight_attacks(sq) & self.piece_bb(PieceType::Knight)
            | t.king_attacks(sq) & self.piece_bb(PieceType::King)
            | t.bishop_attacks(sq, occ) & self.piece_like_bb(PieceType::Bishop)
            | t.rook_attacks(sq, occ) & self.piece_like_bb(PieceType::Rook)
    }

    pub fn square_attacked(&self, t: &Tables, sq: Square, occ: u64, by: Player) -> bool {
        self.attackers_to(t, sq, occ) & self.player_bb(by) != 0
    }

    /// Pieces of `us` pinned to the king on `king_sq`
    fn pinned(&self, t: &Tables, us: Player, king_sq: Square) -> u64 {
        let us_bb = self.player_bb(us);
        let opp_bb = self.player_bb(us.opp());
        let mut pinned = 0;

        let mut snipers = ((t.bishop_attacks(king_sq, 0) & self.piece_like_bb(PieceType::Bishop))
            | (t.rook_attacks(king_sq, 0) & self.piece_like_bb(PieceType::Rook)))
            & opp_bb;
        let occ = self.occ_bb() ^ snipers;

        while snipers != 0 {
            let sniper_sq = BitBoard::pop_lsb(&mut snipers);
            let b = t.between(king_sq, sniper_sq) & occ;

            if b & us_bb != 0 && !BitBoard::more_than_one(b) {
                pinned |= b;
            }
        }

        pinned
    }

    /// Whether the side to move may play this move without leaving its
    /// king in check. Assumes `m` is pseudo-legal.
    pub fn is_legal_move(&self, t: &Tables, m: u16) -> bool {
        let src = BitMove::src(m);
        let dest = BitMove::dest(m);
        let us = self.turn;
        let opp = us.opp();
        let king_sq = self.cur_king_square();
        let occ = self.occ_bb();

        if BitMove::is_castle(m) {
            if self.in_check() {
                return false;
            }

            // every square the king passes over must be safe
            let step = if BitMove::flag(m) == MoveFlag::CASTLE_KING {
                1
            } else {
                -1
            };
            let mut sq = src;
            while sq != dest {
                sq += step;
                if self.square_attacked(t, sq, occ, opp) {
                    return false;
                }
            }
            return true;
        }

        if BitMove::is_ep(m) {
            // the capture clears two squares on the same rank, so a
            // slider can be revealed that neither pin tracking nor the
            // normal capture path sees
            let cap_sq = dest - us.pawn_dir();
            let occ = (occ ^ BitBoard::from_sq(src) ^ BitBoard::from_sq(cap_sq))
                | BitBoard::from_sq(dest);

            return t.bishop_attacks(king_sq, occ)
                & self.player_piece_like_bb(opp, PieceType::Bishop)
                == 0
                && t.rook_attacks(king_sq, occ) & self.player_piece_like_bb(opp, PieceType::Rook)
                    == 0;
        }

        if src == king_sq {
            return !self.square_attacked(t, dest, occ ^ BitBoard::from_sq(src), opp);
        }

        !BitBoard::contains(self.pos.pinned_bb, src) || t.aligned(src, dest, king_sq)
    }

    /// Whether `m` fits this position at all: right piece on the source
    /// square, a reachable destination, flags that match the board.
    ///
    /// Moves from the transposition table must pass this before being
    /// tried, a key collision can hand us a move for a different
    /// position entirely.
    pub fn is_pseudo_legal(&self, t: &Tables, m: u16) -> bool {
        if m == 0 {
            return false;
        }

        let src = BitMove::src(m);
        let dest = BitMove::dest(m);
        let piece = self.piece(src);

        if piece == Piece::None || piece.side() != self.turn {
            return false;
        }

        let us = self.turn;
        let opp = us.opp();
        let occ = self.occ_bb();
        let dest_bb = BitBoard::from_sq(dest);
        let pt = piece.piece_type();
        let kind = BitMove::kind(m);

        // the capture flag must match the destination contents
        match kind {
            MoveKind::Capture | MoveKind::PromotionCapture(_) => {
                let target = self.piece(dest);
                if target == Piece::None || target.side() != opp {
                    return false;
                }
            }
            MoveKind::EnPassant => {
                if self.pos.ep_square != dest {
                    return false;
                }
            }
            _ => {
                if self.piece(dest) != Piece::None {
                    return false;
                }
            }
        }

        // in check, only evasions qualify; king moves and castling are
        // settled by is_legal_move
        let checkers = self.pos.checkers_bb;
        if checkers != 0 && pt != PieceType::King {
            if BitBoard::more_than_one(checkers) {
                return false;
            }

            let checker_sq = BitBoard::bit_scan_forward(checkers);
            let covers = if kind == MoveKind::EnPassant {
                dest - us.pawn_dir() == checker_sq
            } else {
                (t.between(self.cur_king_square(), checker_sq) | checkers) & dest_bb != 0
            };
            if !covers {
                return false;
            }
        }

        match kind {
            MoveKind::CastleKing => {
                pt == PieceType::King
                    && self.can_castle_king(us)
                    && dest == us.castle_king_sq()
                    && src == dest - 2
                    && occ & (BitBoard::from_sq(src + 1) | BitBoard::from_sq(src + 2)) == 0
            }
            MoveKind::CastleQueen => {
                pt == PieceType::King
                    && self.can_castle_queen(us)
                    && dest == us.castle_queen_sq()
                    && src == dest + 2
                    && occ
                        & (BitBoard::from_sq(src - 1)
                            | BitBoard::from_sq(src - 2)
                            | BitBoard::from_sq(src - 3))
                        == 0
            }
            MoveKind::DoublePawnPush => {
                pt == PieceType::Pawn
                    && dest == src + 2 * us.pawn_dir()
                    && BitBoard::contains(us.rank_3(), src + us.pawn_dir())
                    && !BitBoard::contains(occ, src + us.pawn_dir())
            }
            MoveKind::Quiet => match pt {
                PieceType::Pawn => {
                    dest == src + us.pawn_dir() && BitBoard::from_sq(src) & us.rank_7() == 0
                }
                _ => t.attacks(pt, src, occ, us) & dest_bb != 0,
            },
            MoveKind::Capture => match pt {
                PieceType::Pawn => {
                    t.pawn_attacks(us, src) & dest_bb != 0
                        && BitBoard::from_sq(src) & us.rank_7() == 0
                }
                _ => t.attacks(pt, src, occ, us) & dest_bb != 0,
            },
            MoveKind::EnPassant => {
                pt == PieceType::Pawn && t.pawn_attacks(us, src) & dest_bb != 0
            }
            MoveKind::Promotion(_) => {
                pt == PieceType::Pawn
                    && dest == src + us.pawn_dir()
                    && BitBoard::from_sq(src) & us.rank_7() != 0
            }
            MoveKind::PromotionCapture(_) => {
                pt == PieceType::Pawn
                    && t.pawn_attacks(us, src) & dest_bb != 0
                    && BitBoard::from_sq(src) & us.rank_7() != 0
            }
        }
    }

    /// Fifty-move rule or repetition.
    ///
    /// A single earlier occurrence already counts: inside the search,
    /// steering into a repeated position is steering towards the draw.
    pub fn is_draw(&self) -> bool {
        if self.pos.rule_fifty >= 100 {
            return true;
        }

        // only positions since the last irreversible move can repeat
        let count = self.history.count;
        let max_back = (self.pos.rule_fifty as usize).min(count);
        let mut i = 2;
        while i <= max_back {
            if self.history.get_key(count - i) == self.pos.key {
                return true;
            }
            i += 2;
        }

        false
    }
}

/// Setter methods
impl Board {
    /// Calculate checkers and pinned pieces for the side to move
    pub fn set_check_info(&mut self, t: &Tables) {
        let occ = self.occ_bb();
        let king_sq = self.cur_king_square();
        let opp_bb = self.player_bb(self.turn.opp());

        self.pos.checkers_bb = self.attackers_to(t, king_sq, occ) & opp_bb;
        self.pos.pinned_bb = self.pinned(t, self.turn, king_sq);
    }

    pub fn make_move(&mut self, t: &Tables, m: u16) {
        let src = BitMove::src(m);
        let dest = BitMove::dest(m);
        let us = self.turn;
        let opp = us.opp();
        let piece = self.piece_type(src);

        debug_assert!(piece != PieceType::None);
        debug_assert!(src != dest);

        self.history.push(self.pos);
        self.pos.last_move = m;
        self.pos.captured_piece = PieceType::None;

        if self.can_ep() {
            self.pos.key ^= Zobrist::ep(self.ep_file());
            self.pos.ep_square = 64;
        }

        match BitMove::kind(m) {
            MoveKind::Quiet => self.move_piece(src, dest),
            MoveKind::DoublePawnPush => {
                self.move_piece(src, dest);
                self.pos.ep_square = dest - us.pawn_dir();
                self.pos.key ^= Zobrist::ep(self.ep_file());
            }
            MoveKind::CastleKing => {
                self.move_piece(src, dest);
                self.move_piece(dest + 1, dest - 1);
            }
            MoveKind::CastleQueen => {
                self.move_piece(src, dest);
                self.move_piece(dest - 2, dest + 1);
            }
            MoveKind::Capture => {
                self.pos.captured_piece = self.piece_type(dest);
                self.remove_piece(dest);
                self.move_piece(src, dest);
            }
            MoveKind::EnPassant => {
                // the captured pawn is not on the destination square
                self.pos.captured_piece = PieceType::Pawn;
                self.remove_piece(dest - us.pawn_dir());
                self.move_piece(src, dest);
            }
            MoveKind::Promotion(prom) => {
                self.remove_piece(src);
                self.add_piece(Piece::from_piece_type(prom, us), dest);
            }
            MoveKind::PromotionCapture(prom) => {
                self.pos.captured_piece = self.piece_type(dest);
                self.remove_piece(dest);
                self.remove_piece(src);
                self.add_piece(Piece::from_piece_type(prom, us), dest);
            }
        }

        let old_castling = self.pos.castling;
        self.pos.castling &= t.castle_mask(src) & t.castle_mask(dest);
        if self.pos.castling != old_castling {
            self.pos.key ^= Zobrist::castle(old_castling) ^ Zobrist::castle(self.pos.castling);
        }

        if piece == PieceType::Pawn || BitMove::is_cap(m) {
            self.pos.rule_fifty = 0;
        } else {
            self.pos.rule_fifty += 1;
        }

        self.pos.key ^= Zobrist::side();
        self.turn = opp;
        if us == Player::Black {
            self.fullmove += 1;
        }

        self.set_check_info(t);
    }

    pub fn unmake_move(&mut self, m: u16) {
        let src = BitMove::src(m);
        let dest = BitMove::dest(m);
        // the side that played `m`
        let us = self.turn.opp();
        let opp = self.turn;
        let captured = self.pos.captured_piece;

        match BitMove::kind(m) {
            MoveKind::Quiet | MoveKind::DoublePawnPush => self.move_piece(dest, src),
            MoveKind::CastleKing => {
                self.move_piece(dest, src);
                self.move_piece(dest - 1, dest + 1);
            }
            MoveKind::CastleQueen => {
                self.move_piece(dest, src);
                self.move_piece(dest + 1, dest - 2);
            }
            MoveKind::Capture => {
                self.move_piece(dest, src);
                self.add_piece(Piece::from_piece_type(captured, opp), dest);
            }
            MoveKind::EnPassant => {
                self.move_piece(dest, src);
                self.add_piece(
                    Piece::from_piece_type(PieceType::Pawn, opp),
                    dest - us.pawn_dir(),
                );
            }
            MoveKind::Promotion(_) => {
                self.remove_piece(dest);
                self.add_piece(Piece::from_piece_type(PieceType::Pawn, us), src);
            }
            MoveKind::PromotionCapture(_) => {
                self.remove_piece(dest);
                self.add_piece(Piece::from_piece_type(PieceType::Pawn, us), src);
                self.add_piece(Piece::from_piece_type(captured, opp), dest);
            }
        }

        self.pos = self.history.pop();
        self.turn = us;
        if us == Player::Black {
            self.fullmove -= 1;
        }
    }

    pub fn add_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(piece != Piece::None);

        self.pos.key ^= Zobrist::piece(piece, sq);
        self.pieces[sq as usize] = piece;
        BitBoard::set_bit(&mut self.piece_bb[piece.piece_type().as_usize()], sq);
        BitBoard::set_bit(&mut self.side_bb[piece.side().as_usize()], sq);
    }

    pub fn remove_piece(&mut self, sq: Square) {
        let piece = self.pieces[sq as usize];
        debug_assert!(piece != Piece::None);

        self.pos.key ^= Zobrist::piece(piece, sq);
        self.pieces[sq as usize] = Piece::None;
        BitBoard::pop_bit(&mut self.piece_bb[piece.piece_type().as_usize()], sq);
        BitBoard::pop_bit(&mut self.side_bb[piece.side().as_usize()], sq);
    }

    pub fn move_piece(&mut self, src: Square, dest: Square) {
        let piece = self.pieces[src as usize];
        debug_assert!(piece != Piece::None);
        debug_assert!(self.pieces[dest as usize] == Piece::None);

        self.pos.key ^= Zobrist::piece(piece, src) ^ Zobrist::piece(piece, dest);
        self.pieces[src as usize] = Piece::None;
        self.pieces[dest as usize] = piece;

        let move_bb = BitBoard::from_sq(src) | BitBoard::from_sq(dest);
        self.piece_bb[piece.piece_type().as_usize()] ^= move_bb;
        self.side_bb[piece.side().as_usize()] ^= move_bb;
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            turn: Player::White,
            piece_bb: [BitBoard::EMPTY; NUM_PIECES],
            side_bb: [BitBoard::EMPTY; NUM_SIDES],
            pieces: [Piece::None; 64],
            pos: Position::new(),
            history: History::new(),
            fullmove: 1,
        }
    }

    pub fn start_pos(t: &Tables) -> Board {
        Board::from_fen(t, FEN_START_STRING).expect("the starting position parses")
    }

    pub fn from_fen(t: &Tables, fen: &str) -> Result<Board, FenError> {
        let mut board = Board::new();

        let sections: Vec<&str> = fen.split_whitespace().collect();
        if sections.len() != 6 {
            return Err(FenError::SectionCount(sections.len()));
        }

        // Piece locations, rank 8 first
        let mut file: Square = 0;
        let mut row: Square = 0;
        for c in sections[0].chars() {
            if c == '/' {
                if file != 8 || row == 7 {
                    return Err(FenError::Placement);
                }
                file = 0;
                row += 1;
            } else if let Some(d) = c.to_digit(10) {
                if !(1..=8).contains(&d) {
                    return Err(FenError::Placement);
                }
                file += d as Square;
                if file > 8 {
                    return Err(FenError::Placement);
                }
            } else if let Some(piece) = Piece::from_char(c) {
                if file > 7 {
                    return Err(FenError::Placement);
                }
                board.add_piece(piece, row * 8 + file);
                file += 1;
            } else {
                return Err(FenError::Piece(c));
            }
        }
        if row != 7 || file != 8 {
            return Err(FenError::Placement);
        }

        // Turn to move
        board.turn = match sections[1] {
            "w" => Player::White,
            "b" => Player::Black,
            other => return Err(FenError::Turn(other.to_owned())),
        };

        // Castling permissions
        if sections[2] != "-" {
            for symbol in sections[2].chars() {
                board.pos.castling |= match symbol {
                    'K' => Castling::WK,
                    'Q' => Castling::WQ,
                    'k' => Castling::BK,
                    'q' => Castling::BQ,
                    other => return Err(FenError::Castling(other)),
                }
            }
        }

        // EP-square
        if sections[3] != "-" {
            let ep_square = square_from_string(sections[3])
                .ok_or_else(|| FenError::EpSquare(sections[3].to_owned()))?;
            board.pos.ep_square = ep_square;
            board.pos.key ^= Zobrist::ep(board.ep_file());
        }

        board.pos.rule_fifty = sections[4]
            .parse::<u8>()
            .map_err(|_| FenError::Clock(sections[4].to_owned()))?;
        board.fullmove = sections[5]
            .parse::<u16>()
            .map_err(|_| FenError::Clock(sections[5].to_owned()))?;

        board.pos.key ^= Zobrist::castle(board.pos.castling);
        if board.turn == Player::Black {
            board.pos.key ^= Zobrist::side();
        }

        board.set_check_info(t);

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for row in 0..8 {
            let mut empty = 0;
            for file in 0..8 {
                let piece = self.piece(row * 8 + file);
                if piece == Piece::None {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    fen.push_str(&empty.to_string());
                    empty = 0;
                }
                fen.push_str(piece.to_str());
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row != 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.turn {
            Player::White => 'w',
            Player::Black => 'b',
        });

        fen.push(' ');
        if self.pos.castling == Castling::NONE {
            fen.push('-');
        } else {
            for (right, c) in [
                (Castling::WK, 'K'),
                (Castling::WQ, 'Q'),
                (Castling::BK, 'k'),
                (Castling::BQ, 'q'),
            ] {
                if self.pos.castling & right != 0 {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        if self.can_ep() {
            fen.push_str(&square_to_string(self.pos.ep_square));
        } else {
            fen.push('-');
        }

        fen.push_str(&format!(" {} {}", self.pos.rule_fifty, self.fullmove));

        fen
    }

    pub fn pretty_string(&self) -> String {
        let mut output = String::from("\n");

        for y in 0..8 {
            output.push_str("+---+---+---+---+---+---+---+---+\n");
            for x in 0..8 {
                let square = 8 * y + x;

                output.push('|');
                output.push(' ');
                output.push_str(self.piece(square).to_str());
                output.push(' ');

                if x == 7 {
                    output.push('|');
                    output.push_str(&format!(" {}", 8 - y));
                    output.push('\n');
                }
            }
        }
        output.push_str("+---+---+---+---+---+---+---+---+\n");
        output.push_str("  a   b   c   d   e   f   g   h  \n\n");

        output
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_string())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_string())?;
        writeln!(
            f,
            "Turn       : {}",
            match self.turn {
                Player::White => "White",
                Player::Black => "Black",
            }
        )?;
        writeln!(f, "Key        : {:#x}", self.pos.key)?;
        writeln!(f, "FEN        : {}", self.to_fen())?;
        writeln!(f, "Castling   : {:04b}", self.pos.castling)?;
        writeln!(f, "EP Square  : {}", square_to_string(self.pos.ep_square))?;
        write!(f, "Checkers   : ")?;
        let mut checkers = self.pos.checkers_bb;
        while checkers != 0 {
            let checker_sq = BitBoard::pop_lsb(&mut checkers);
            write!(f, "{} ", square_to_string(checker_sq))?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
pub(crate) const KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_tables;

    fn snapshot(board: &Board) -> (Vec<u64>, Vec<u64>, u64, String) {
        (
            board.piece_bb.to_vec(),
            board.side_bb.to_vec(),
            board.key(),
            board.to_fen(),
        )
    }

    #[test]
    fn make_unmake_round_trip() {
        let t = test_tables();
        let mut board = Board::start_pos(t);
        let before = snapshot(&board);

        // 1. e4 d5 2. exd5 Qxd5
        let moves = [
            BitMove::from_flag(52, 36, MoveFlag::DOUBLE_PAWN_PUSH),
            BitMove::from_flag(11, 27, MoveFlag::DOUBLE_PAWN_PUSH),
            BitMove::from_flag(36, 27, MoveFlag::CAPTURE),
            BitMove::from_flag(3, 27, MoveFlag::CAPTURE),
        ];

        for &m in &moves {
            assert!(board.is_pseudo_legal(t, m), "{}", BitMove::pretty_move(m));
            board.make_move(t, m);
        }
        for &m in moves.iter().rev() {
            board.unmake_move(m);
        }

        assert_eq!(snapshot(&board), before);
    }

    #[test]
    fn en_passant_round_trip() {
        let t = test_tables();
        let mut board = Board::start_pos(t);

        // 1. e4 a6 2. e5 d5 3. exd6
        let moves = [
            BitMove::from_flag(52, 36, MoveFlag::DOUBLE_PAWN_PUSH),
            BitMove::from_flag(8, 16, MoveFlag::QUIET),
            BitMove::from_flag(36, 28, MoveFlag::QUIET),
            BitMove::from_flag(11, 27, MoveFlag::DOUBLE_PAWN_PUSH),
        ];
        for &m in &moves {
            board.make_move(t, m);
        }

        assert_eq!(board.pos.ep_square, 19);
        let before = snapshot(&board);

        let ep = BitMove::from_flag(28, 19, MoveFlag::EN_PASSANT);
        assert!(board.is_pseudo_legal(t, ep));
        board.make_move(t, ep);

        // the black d-pawn is gone, the white pawn sits on d6
        assert_eq!(board.piece(27), Piece::None);
        assert_eq!(board.piece(19), Piece::WhitePawn);
        assert!(!board.can_ep());

        board.unmake_move(ep);
        assert_eq!(snapshot(&board), before);
    }

    #[test]
    fn castling_moves_the_rook() {
        let t = test_tables();
        let mut board = Board::from_fen(t, "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = snapshot(&board);

        let castle = BitMove::from_flag(60, 62, MoveFlag::CASTLE_KING);
        assert!(board.is_pseudo_legal(t, castle));
        assert!(board.is_legal_move(t, castle));
        board.make_move(t, castle);

        assert_eq!(board.piece(62), Piece::WhiteKing);
        assert_eq!(board.piece(61), Piece::WhiteRook);
        assert_eq!(board.piece(63), Piece::None);
        assert!(!board.can_castle_king(Player::White));
        assert!(!board.can_castle_queen(Player::White));
        assert!(board.can_castle_king(Player::Black));

        board.unmake_move(castle);
        assert_eq!(snapshot(&board), before);

        let castle_queen = BitMove::from_flag(60, 58, MoveFlag::CASTLE_QUEEN);
        board.make_move(t, castle_queen);
        assert_eq!(board.piece(58), Piece::WhiteKing);
        assert_eq!(board.piece(59), Piece::WhiteRook);
        board.unmake_move(castle_queen);
        assert_eq!(snapshot(&board), before);
    }

    #[test]
    fn promotion_round_trip() {
        let t = test_tables();
        let mut board = Board::from_fen(t, "1n5k/P7/8/8/8/8/8/7K w - - 0 1").unwrap();
        let before = snapshot(&board);

        let prom = BitMove::from_flag(8, 0, MoveFlag::PROMOTE_QUEEN);
        board.make_move(t, prom);
        assert_eq!(board.piece(0), Piece::WhiteQueen);
        assert_eq!(board.piece(8), Piece::None);
        board.unmake_move(prom);
        assert_eq!(snapshot(&board), before);

        let prom_cap = BitMove::from_flag(8, 1, MoveFlag::PROMOTE_KNIGHT_CAPTURE);
        board.make_move(t, prom_cap);
        assert_eq!(board.piece(1), Piece::WhiteKnight);
        board.unmake_move(prom_cap);
        assert_eq!(snapshot(&board), before);
    }

    #[test]
    fn incremental_key_matches_fen_rebuild() {
        let t = test_tables();
        let mut board = Board::start_pos(t);

        let moves = [
            BitMove::from_flag(52, 36, MoveFlag::DOUBLE_PAWN_PUSH),
            BitMove::from_flag(6, 21, MoveFlag::QUIET),
            BitMove::from_flag(57, 42, MoveFlag::QUIET),
            BitMove::from_flag(12, 28, MoveFlag::DOUBLE_PAWN_PUSH),
        ];

        for &m in &moves {
            board.make_move(t, m);
            let rebuilt = Board::from_fen(t, &board.to_fen()).unwrap();
            assert_eq!(board.key(), rebuilt.key());
        }
    }

    #[test]
    fn fen_round_trip() {
        let t = test_tables();
        for fen in [
            FEN_START_STRING,
            KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 42 99",
        ] {
            let board = Board::from_fen(t, fen).unwrap();
            assert_eq!(board.to_fen(), fen);
        }
    }

    #[test]
    fn fen_errors() {
        let t = test_tables();
        assert!(matches!(
            Board::from_fen(t, "8/8/8/8 w - -"),
            Err(FenError::SectionCount(4))
        ));
        assert!(matches!(
            Board::from_fen(t, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1"),
            Err(FenError::Piece('X'))
        ));
        assert!(matches!(
            Board::from_fen(t, "9/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement)
        ));
        assert!(matches!(
            Board::from_fen(t, "8/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(FenError::Turn(_))
        ));
    }

    #[test]
    fn pinned_piece_moves() {
        let t = test_tables();
        // white knight on d2 is pinned by the rook on d8
        let board = Board::from_fen(t, "3r3k/8/8/8/8/8/3N4/3K4 w - - 0 1").unwrap();
        assert_eq!(board.pos.pinned_bb, BitBoard::from_sq(51));

        let knight_move = BitMove::from_flag(51, 34, MoveFlag::QUIET);
        assert!(board.is_pseudo_legal(t, knight_move));
        assert!(!board.is_legal_move(t, knight_move));
    }

    #[test]
    fn repetition_draw() {
        let t = test_tables();
        let mut board = Board::start_pos(t);

        // knights out and back
        let moves = [
            BitMove::from_flag(62, 45, MoveFlag::QUIET),
            BitMove::from_flag(6, 21, MoveFlag::QUIET),
            BitMove::from_flag(45, 62, MoveFlag::QUIET),
            BitMove::from_flag(21, 6, MoveFlag::QUIET),
        ];

        for &m in &moves {
            assert!(!board.is_draw());
            board.make_move(t, m);
        }
        assert!(board.is_draw());
    }

    #[test]
    fn fifty_move_rule() {
        let t = test_tables();
        let mut board = Board::from_fen(t, "4k3/8/8/8/8/8/8/4K3 w - - 99 1").unwrap();
        assert!(!board.is_draw());

        board.make_move(t, BitMove::from_flag(60, 59, MoveFlag::QUIET));
        assert!(board.is_draw());
    }
}
