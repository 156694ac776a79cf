use crate::{board::Board, defs::MAX_MOVES, gen::Tables, movegen::generate_legal};

pub struct MoveList {
    moves: [u16; MAX_MOVES],
    count: usize,
}

impl MoveList {
    pub const fn new() -> Self {
        MoveList {
            moves: [0; MAX_MOVES],
            count: 0,
        }
    }

    pub fn legal(board: &Board, t: &Tables) -> Self {
        let mut move_list = MoveList::new();
        generate_legal(board, t, &mut move_list);
        move_list
    }

    pub fn push(&mut self, m: u16) {
        self.moves[self.count] = m;
        self.count += 1;
    }

    pub const fn get(&self, index: usize) -> u16 {
        self.moves[index]
    }

    pub const fn size(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u16> {
        self.moves[..self.count].iter()
    }

    pub fn contains(&self, m: u16) -> bool {
        self.moves[..self.count].contains(&m)
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.moves.swap(a, b);
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a u16;
    type IntoIter = std::slice::Iter<'a, u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
