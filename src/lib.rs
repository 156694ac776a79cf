pub mod bitboard;
pub mod bitmove;
pub mod board;
pub mod defs;
pub mod eval;
pub mod gen;
pub mod history;
pub mod input;
pub mod movegen;
pub mod movelist;
pub mod perft;
pub mod position;
pub mod search;
pub mod search_info;
pub mod selector;
pub mod table;
pub mod uci;
pub mod utils;
pub mod zobrist;

/// Shared attack tables for tests, building the magics once per run
#[cfg(test)]
pub(crate) fn test_tables() -> &'static gen::Tables {
    use once_cell::sync::Lazy;

    static TABLES: Lazy<gen::Tables> = Lazy::new(gen::Tables::new);
    &TABLES
}
