use std::process::exit;
use std::sync::atomic::Ordering;

use log::warn;

use crate::input::Game;
use crate::search::MAX_SEARCH_DEPTH;
use crate::search_info::SearchInfo;
use crate::table::{DEFAULT_SIZE_MB, MIN_SIZE_MB};

/// Gui to engine
impl Game {
    pub fn uci(&mut self) {
        println!("id name {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        println!("id author the goudvink developers");
        println!(
            "option name Hash type spin default {DEFAULT_SIZE_MB} min {MIN_SIZE_MB} max 4096"
        );
        println!("option name Threads type spin default 1 min 1 max 1");
        println!("uciok");
    }

    pub fn is_ready(&self) {
        println!("readyok");
    }

    pub fn set_option(&mut self, commands: &[&str]) {
        // setoption name <id> [value <x>]
        let name = commands.iter().position(|&x| x == "name");
        let value = commands.iter().position(|&x| x == "value");

        let (name, value) = match (name, value) {
            (Some(n), Some(v)) if n + 1 < v && v + 1 < commands.len() => {
                (commands[n + 1..v].join(" "), commands[v + 1])
            }
            _ => {
                warn!("malformed setoption command");
                return;
            }
        };

        match name.to_lowercase().as_str() {
            "hash" => match value.parse::<usize>() {
                Ok(megabytes) => self.table.resize(megabytes),
                Err(_) => warn!("invalid hash size: {value}"),
            },
            // single threaded, but some guis insist on setting this
            "threads" => (),
            _ => warn!("unknown option: {name}"),
        }
    }

    pub fn uci_new_game(&mut self) {
        self.clear();
        self.board = crate::board::Board::start_pos(&self.tables);
    }

    pub fn position(&mut self, commands: &[&str]) {
        let moves_idx = commands.iter().position(|&x| x == "moves");

        if commands.contains(&"fen") {
            let fen_str = match moves_idx {
                Some(idx) => commands[2..idx].join(" "),
                None => commands[2..].join(" "),
            };

            match crate::board::Board::from_fen(&self.tables, &fen_str) {
                Ok(board) => self.board = board,
                Err(e) => {
                    warn!("rejected fen '{fen_str}': {e}");
                    return;
                }
            }
        } else if commands.contains(&"startpos") {
            self.board = crate::board::Board::start_pos(&self.tables);
        }

        if let Some(idx) = moves_idx {
            self.make_moves(&commands[(idx + 1)..]);
        }
    }

    pub fn go(&mut self, commands: &[&str]) {
        let mut info = SearchInfo::default();
        let mut infinite = false;

        let mut i = 1;
        while i < commands.len() {
            let value = commands.get(i + 1).and_then(|s| s.parse::<usize>().ok());

            match commands[i] {
                "infinite" => infinite = true,
                "depth" => {
                    if let Some(depth) = value {
                        info.depth = depth.min(MAX_SEARCH_DEPTH);
                        i += 1;
                    }
                }
                "movetime" => {
                    if let Some(time) = value {
                        info.move_time = time;
                        i += 1;
                    }
                }
                "wtime" => {
                    if let Some(time) = value {
                        info.w_time = time;
                        i += 1;
                    }
                }
                "btime" => {
                    if let Some(time) = value {
                        info.b_time = time;
                        i += 1;
                    }
                }
                "winc" => {
                    if let Some(inc) = value {
                        info.w_inc = inc;
                        i += 1;
                    }
                }
                "binc" => {
                    if let Some(inc) = value {
                        info.b_inc = inc;
                        i += 1;
                    }
                }
                _ => (),
            }

            i += 1;
        }

        // search until stopped, whatever the clock says
        if infinite {
            info.w_time = 0;
            info.b_time = 0;
            info.move_time = 0;
        }

        self.start_search(info);
    }

    pub fn stop(&mut self) {
        self.abort_search.store(true, Ordering::Relaxed);
        if let Some(handle) = self.search_thread.take() {
            let _ = handle.join();
        }
    }

    pub fn quit(&mut self) {
        self.stop();
        exit(0);
    }
}
