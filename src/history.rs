use crate::{defs::MAX_HISTORY, position::Position};

/// Arena of past positions, indexed by ply. Preallocated for a long
/// game plus a full search stack, growing if a game runs longer.
#[derive(Clone)]
pub struct History {
    positions: Vec<Position>,
    pub count: usize,
}

impl History {
    pub fn new() -> Self {
        History {
            positions: vec![Position::new(); MAX_HISTORY],
            count: 0,
        }
    }

    pub fn push(&mut self, pos: Position) {
        if self.count == self.positions.len() {
            self.positions.push(pos);
        } else {
            self.positions[self.count] = pos;
        }
        self.count += 1;
    }

    pub fn pop(&mut self) -> Position {
        assert!(self.count >= 1);

        self.count -= 1;
        self.positions[self.count]
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    pub const fn empty(&self) -> bool {
        self.count == 0
    }

    pub fn get_key(&self, index: usize) -> u64 {
        self.positions[index].key
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn push_pop() {
        let mut history = History::new();
        assert!(history.empty());

        let mut pos = Position::new();
        pos.key = 0xABCD;
        history.push(pos);
        pos.key = 0x1234;
        history.push(pos);

        assert_eq!(history.count, 2);
        assert_eq!(history.get_key(0), 0xABCD);
        assert_eq!(history.pop().key, 0x1234);
        assert_eq!(history.pop().key, 0xABCD);
        assert!(history.empty());
    }

    #[test]
    fn grows_past_the_preallocation() {
        let mut history = History::new();

        for i in 0..MAX_HISTORY + 64 {
            let mut pos = Position::new();
            pos.key = i as u64;
            history.push(pos);
        }

        assert_eq!(history.count, MAX_HISTORY + 64);
        assert_eq!(history.pop().key, (MAX_HISTORY + 63) as u64);
        assert_eq!(history.get_key(0), 0);
    }
}
