use std::cell::UnsafeCell;

use log::info;

use crate::{defs::Score, search::IS_MATE};

pub const BUCKET_SIZE: usize = 3;
pub const MIN_SIZE_MB: usize = 1;
pub const DEFAULT_SIZE_MB: usize = 16;

type Bucket = [HashEntry; BUCKET_SIZE];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Lower = 1,
    Upper = 2,
    Exact = 3,
}

/// 8 byte table entry. The key field holds only the high 16 bits of
/// the zobrist key, the bucket index covers the low bits.
#[derive(Clone, Copy, Default)]
pub struct HashEntry {
    pub key: u16,
    pub m: u16,
    pub score: i16,
    pub depth: u8,
    /// 2 bits bound kind, 6 bits generation. A zero bound marks an
    /// empty slot.
    age_bound: u8,
}

impl HashEntry {
    pub const fn is_empty(&self) -> bool {
        self.age_bound & 0b11 == 0
    }

    pub const fn bound(&self) -> u8 {
        self.age_bound & 0b11
    }

    const fn age(&self) -> u8 {
        self.age_bound >> 2
    }

    pub fn is_lower(&self) -> bool {
        self.bound() == Bound::Lower as u8
    }

    pub fn is_upper(&self) -> bool {
        self.bound() == Bound::Upper as u8
    }

    pub fn is_exact(&self) -> bool {
        self.bound() == Bound::Exact as u8
    }
}

pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: u64,
    generation: u8,
}

impl TranspositionTable {
    pub fn new(megabytes: usize) -> Self {
        let mut tt = TranspositionTable {
            buckets: vec![],
            mask: 0,
            generation: 0,
        };
        tt.resize(megabytes);
        tt
    }

    /// Reallocate to roughly `megabytes`, rounding the bucket count
    /// down to a power of two. Requests below the floor get the floor
    /// instead of failing.
    pub fn resize(&mut self, megabytes: usize) {
        let megabytes = megabytes.max(MIN_SIZE_MB);
        let count = megabytes * 1024 * 1024 / std::mem::size_of::<Bucket>();
        let count = if count.is_power_of_two() {
            count
        } else {
            count.next_power_of_two() / 2
        };

        info!("transposition table: {count} buckets ({megabytes} MB requested)");

        self.buckets = vec![Bucket::default(); count];
        self.mask = count as u64 - 1;
        self.generation = 0;
    }

    pub fn clear(&mut self) {
        self.buckets.fill(Bucket::default());
        self.generation = 0;
    }

    /// Start of a new search: entries from older searches become
    /// preferred replacement victims
    pub fn new_generation(&mut self) {
        self.generation = (self.generation + 1) & 0x3F;
    }

    pub fn probe(&self, key: u64) -> Option<HashEntry> {
        let bucket = &self.buckets[(key & self.mask) as usize];
        let fingerprint = (key >> 48) as u16;

        bucket
            .iter()
            .find(|e| !e.is_empty() && e.key == fingerprint)
            .copied()
    }

    pub fn best_move(&self, key: u64) -> Option<u16> {
        match self.probe(key) {
            Some(entry) if entry.m != 0 => Some(entry.m),
            _ => None,
        }
    }

    pub fn store(&mut self, key: u64, m: u16, score: i16, depth: u8, bound: Bound) {
        let bucket = &mut self.buckets[(key & self.mask) as usize];
        let fingerprint = (key >> 48) as u16;
        let generation = self.generation;

        // reuse the slot already holding this position, or an empty one
        let mut slot = None;
        for (i, e) in bucket.iter().enumerate() {
            if e.is_empty() || e.key == fingerprint {
                slot = Some(i);
                break;
            }
        }

        let slot = match slot {
            Some(i) => i,
            None => {
                // depth-preferred within the current generation, stale
                // entries always lose
                let mut victim = 0;
                for i in 1..BUCKET_SIZE {
                    let fresh = |e: &HashEntry| e.age() == generation;
                    let (e, v) = (&bucket[i], &bucket[victim]);
                    if (fresh(e), e.depth) < (fresh(v), v.depth) {
                        victim = i;
                    }
                }

                let v = &bucket[victim];
                if v.age() == generation && v.depth > depth {
                    return;
                }
                victim
            }
        };

        // keep the old best move when the new search found none
        let m = if m == 0 && bucket[slot].key == fingerprint {
            bucket[slot].m
        } else {
            m
        };

        bucket[slot] = HashEntry {
            key: fingerprint,
            m,
            score,
            depth,
            age_bound: (generation << 2) | bound as u8,
        };
    }
}

/// Mate scores are stored relative to the probing node, not the root,
/// so they stay valid at any ply
pub fn score_to_tt(score: Score, ply: usize) -> i16 {
    if score > IS_MATE {
        (score + ply as Score) as i16
    } else if score < -IS_MATE {
        (score - ply as Score) as i16
    } else {
        score as i16
    }
}

pub fn score_from_tt(score: i16, ply: usize) -> Score {
    let score = score as Score;
    if score > IS_MATE {
        score - ply as Score
    } else if score < -IS_MATE {
        score + ply as Score
    } else {
        score
    }
}

/// Shared access to the table from the search thread and the command
/// loop. Probe and store race on entry words, but a torn entry only
/// fails the fingerprint comparison and reads as a miss.
pub struct TWrapper {
    inner: UnsafeCell<TranspositionTable>,
}

unsafe impl Sync for TWrapper {}

impl TWrapper {
    pub fn new(megabytes: usize) -> Self {
        TWrapper {
            inner: UnsafeCell::new(TranspositionTable::new(megabytes)),
        }
    }

    #[allow(clippy::mut_from_ref)]
    fn inner(&self) -> &mut TranspositionTable {
        unsafe { &mut *self.inner.get() }
    }

    pub fn probe(&self, key: u64) -> Option<HashEntry> {
        self.inner().probe(key)
    }

    pub fn best_move(&self, key: u64) -> Option<u16> {
        self.inner().best_move(key)
    }

    pub fn store(&self, key: u64, m: u16, score: i16, depth: u8, bound: Bound) {
        self.inner().store(key, m, score, depth, bound);
    }

    pub fn resize(&self, megabytes: usize) {
        self.inner().resize(megabytes);
    }

    pub fn clear(&self) {
        self.inner().clear();
    }

    pub fn new_generation(&self) {
        self.inner().new_generation();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::search::CHECKMATE;

    #[test]
    fn store_then_probe() {
        let mut tt = TranspositionTable::new(1);

        tt.store(0xDEAD_BEEF_CAFE_F00D, 1234, 42, 5, Bound::Exact);
        let entry = tt.probe(0xDEAD_BEEF_CAFE_F00D).unwrap();

        assert_eq!(entry.m, 1234);
        assert_eq!(entry.score, 42);
        assert_eq!(entry.depth, 5);
        assert!(entry.is_exact());
        assert!(!entry.is_lower());

        assert!(tt.probe(0x1234_5678_9ABC_DEF0).is_none());
    }

    #[test]
    fn same_position_is_updated_in_place() {
        let mut tt = TranspositionTable::new(1);
        let key = 0xAB_CDEF_0123_4567;

        tt.store(key, 100, 10, 3, Bound::Upper);
        tt.store(key, 200, 20, 6, Bound::Lower);

        let entry = tt.probe(key).unwrap();
        assert_eq!(entry.m, 200);
        assert_eq!(entry.depth, 6);
        assert!(entry.is_lower());
    }

    #[test]
    fn move_survives_a_moveless_store() {
        let mut tt = TranspositionTable::new(1);
        let key = 0xAB_CDEF_0123_4567;

        tt.store(key, 777, 10, 5, Bound::Lower);
        tt.store(key, 0, -5, 6, Bound::Upper);

        assert_eq!(tt.best_move(key), Some(777));
    }

    #[test]
    fn shallow_entries_do_not_evict_deep_ones() {
        let mut tt = TranspositionTable::new(1);

        // four keys mapping to bucket 0, high fingerprints distinct
        let keys: Vec<u64> = (1..=4).map(|i| i << 48).collect();
        tt.mask = 0;
        tt.buckets.truncate(1);

        tt.store(keys[0], 1, 0, 9, Bound::Exact);
        tt.store(keys[1], 2, 0, 8, Bound::Exact);
        tt.store(keys[2], 3, 0, 7, Bound::Exact);
        // bucket is full of deeper entries now
        tt.store(keys[3], 4, 0, 2, Bound::Exact);
        assert!(tt.probe(keys[3]).is_none());

        // a new generation turns them all stale
        tt.new_generation();
        tt.store(keys[3], 4, 0, 2, Bound::Exact);
        assert!(tt.probe(keys[3]).is_some());
    }

    #[test]
    fn minimum_size_floor() {
        let tt = TranspositionTable::new(0);
        assert!(tt.buckets.len().is_power_of_two());
        assert!(!tt.buckets.is_empty());
    }

    #[test]
    fn mate_score_normalization() {
        let mate_at_12 = CHECKMATE - 12;

        // stored from a node at ply 4: distance becomes node-relative
        let stored = score_to_tt(mate_at_12, 4);
        assert_eq!(score_from_tt(stored, 4), mate_at_12);

        // probed at a different ply, the distance adjusts
        assert_eq!(score_from_tt(stored, 6), mate_at_12 - 2);

        let mated = -CHECKMATE + 9;
        let stored = score_to_tt(mated, 3);
        assert_eq!(score_from_tt(stored, 3), mated);

        assert_eq!(score_to_tt(123, 10), 123);
        assert_eq!(score_from_tt(123, 10), 123);
    }
}
