use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::warn;

use crate::{
    bitmove::BitMove,
    board::Board,
    defs::PieceType,
    eval::evaluate,
    gen::Tables,
    movelist::MoveList,
    perft::divide,
    search::Searcher,
    search_info::SearchInfo,
    table::{TWrapper, DEFAULT_SIZE_MB},
    utils::square_from_string,
};

pub struct Game {
    pub board: Board,
    pub tables: Arc<Tables>,
    pub table: Arc<TWrapper>,
    pub abort_search: Arc<AtomicBool>,
    pub search_thread: Option<JoinHandle<()>>,
}

impl Game {
    fn new() -> Self {
        let tables = Arc::new(Tables::new());
        Game {
            board: Board::start_pos(&tables),
            tables,
            table: Arc::new(TWrapper::new(DEFAULT_SIZE_MB)),
            abort_search: Arc::new(AtomicBool::new(false)),
            search_thread: None,
        }
    }

    pub fn clear(&mut self) {
        self.stop();
        self.table.clear();
    }

    pub fn main_loop() {
        let mut game = Game::new();
        let stdin = io::stdin();

        loop {
            let mut buffer = String::new();
            let input = stdin.read_line(&mut buffer);

            if input.is_err() || buffer.trim().is_empty() {
                continue;
            }

            let commands: Vec<&str> = buffer.split_whitespace().collect();
            game.parse_commands(&commands);
        }
    }

    fn parse_commands(&mut self, commands: &[&str]) {
        match commands[0] {
            // UCI commands
            "uci" => self.uci(),
            "isready" => self.is_ready(),
            "ucinewgame" => self.uci_new_game(),
            "setoption" => self.set_option(commands),
            "position" => self.position(commands),
            "go" => self.go(commands),
            "stop" => self.stop(),
            "quit" => self.quit(),
            // debugging commands
            "d" => print!("{}", self.board.pretty_string()),
            "perft" => self.parse_perft(commands),
            "eval" => println!("{} cp", evaluate(&self.board)),
            "take" => self.take_back(),
            "moves" => self.print_moves(),
            other => warn!("unknown command: {other}"),
        }
    }

    pub fn start_search(&mut self, info: SearchInfo) {
        self.stop();

        let board = self.board.clone();
        let tables = self.tables.clone();
        let table = self.table.clone();

        self.abort_search = Arc::new(AtomicBool::new(false));
        let abort = self.abort_search.clone();

        // the timer holds this search's flag, a later search gets a
        // fresh one
        if let Some(millis) = info.budget_millis(self.board.turn) {
            let timer_abort = self.abort_search.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(millis));
                timer_abort.store(true, Ordering::Relaxed);
            });
        }

        let handle = thread::spawn(move || {
            let mut searcher = Searcher::new(board, tables, table, abort, info);
            searcher.run();
        });

        self.search_thread = Some(handle);
    }

    fn parse_perft(&mut self, commands: &[&str]) {
        let depth = commands.get(1).and_then(|s| s.parse::<u8>().ok());
        match depth {
            Some(depth) => {
                divide(&mut self.board, &self.tables, depth);
            }
            None => warn!("usage: perft <depth>"),
        }
    }

    fn take_back(&mut self) {
        let last = self.board.pos.last_move;
        if last != 0 {
            self.board.unmake_move(last);
            print!("{}", self.board.pretty_string());
        } else {
            warn!("no move to take back");
        }
    }

    fn print_moves(&mut self) {
        let moves = MoveList::legal(&self.board, &self.tables);
        print!("{}: ", moves.size());

        for &m in &moves {
            print!("{}, ", BitMove::pretty_move(m));
        }

        println!();
    }

    /// Match coordinate notation against the legal moves, so the move
    /// arrives with the right flag
    fn str_to_move(&self, move_str: &str) -> Option<u16> {
        if move_str.len() != 4 && move_str.len() != 5 {
            return None;
        }

        let src = square_from_string(&move_str[0..2])?;
        let dest = square_from_string(&move_str[2..4])?;
        let prom_type = match move_str.get(4..5) {
            Some("n") => PieceType::Knight,
            Some("b") => PieceType::Bishop,
            Some("r") => PieceType::Rook,
            Some("q") => PieceType::Queen,
            _ => PieceType::None,
        };

        let moves = MoveList::legal(&self.board, &self.tables);
        moves.iter().copied().find(|&m| {
            BitMove::src(m) == src
                && BitMove::dest(m) == dest
                && if BitMove::is_prom(m) {
                    BitMove::prom_type(BitMove::flag(m)) == prom_type
                } else {
                    prom_type == PieceType::None
                }
        })
    }

    pub fn make_moves(&mut self, moves: &[&str]) {
        for move_str in moves {
            match self.str_to_move(move_str) {
                Some(m) => self.board.make_move(&self.tables, m),
                None => {
                    warn!("failed to parse move {move_str}");
                    return;
                }
            }
        }
    }
}
