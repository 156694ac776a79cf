use std::time::{Duration, Instant};

use crate::{defs::Player, search::MAX_SEARCH_DEPTH};

#[derive(Clone, Copy, Debug)]
pub struct SearchInfo {
    pub depth: usize,
    pub w_time: usize,
    pub b_time: usize,
    pub w_inc: usize,
    pub b_inc: usize,
    pub move_time: usize,
    pub time_set: bool,
    pub started: Instant,
    pub stop_time: Instant,
}

impl Default for SearchInfo {
    fn default() -> Self {
        Self {
            depth: MAX_SEARCH_DEPTH,
            w_time: 0,
            b_time: 0,
            w_inc: 0,
            b_inc: 0,
            move_time: 0,
            time_set: false,
            started: Instant::now(),
            stop_time: Instant::now(),
        }
    }
}

impl SearchInfo {
    pub fn with_depth(depth: usize) -> Self {
        let mut info = SearchInfo::default();
        info.depth = depth;
        info
    }

    pub fn my_time(&self, side: Player) -> usize {
        match side {
            Player::White => self.w_time,
            Player::Black => self.b_time,
        }
    }

    pub fn my_inc(&self, side: Player) -> usize {
        match side {
            Player::White => self.w_inc,
            Player::Black => self.b_inc,
        }
    }

    pub fn has_time(&self) -> bool {
        if !self.time_set {
            true
        } else {
            Instant::now() < self.stop_time
        }
    }

    /// Milliseconds this search may run, None for no time limit.
    /// A fixed `movetime` is used as-is, a running clock gets a slice
    /// of the remaining time plus half the increment.
    pub fn budget_millis(&self, side: Player) -> Option<u64> {
        if self.move_time > 0 {
            Some(self.move_time as u64)
        } else if self.my_time(side) > 0 {
            Some((self.my_time(side) / 30 + self.my_inc(side) / 2).max(1) as u64)
        } else {
            None
        }
    }

    /// Mark the start of a search and fix its deadline
    pub fn start(&mut self, side: Player) {
        self.started = Instant::now();

        if let Some(millis) = self.budget_millis(side) {
            self.time_set = true;
            self.stop_time = self.started + Duration::from_millis(millis);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deadline_from_clock() {
        let mut info = SearchInfo::default();
        info.start(Player::White);
        assert!(!info.time_set);
        assert!(info.has_time());

        let mut info = SearchInfo {
            w_time: 60_000,
            w_inc: 2_000,
            ..Default::default()
        };
        info.start(Player::White);
        assert!(info.time_set);
        // 60000 / 30 + 2000 / 2 = 3000 ms
        let budget = info.stop_time - info.started;
        assert_eq!(budget, Duration::from_millis(3000));

        let mut info = SearchInfo {
            move_time: 500,
            w_time: 60_000,
            ..Default::default()
        };
        info.start(Player::White);
        assert_eq!(info.stop_time - info.started, Duration::from_millis(500));
    }
}
