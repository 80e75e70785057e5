//! Least Recently Used (LRU) Set Store.
//!
//! Holds the resident blocks of every touched set and evicts the block that has
//! not been accessed for the longest time. Recency is a logical timestamp
//! supplied by the caller, so outcomes do not depend on execution speed.
//!
//! Sets are created lazily: an index that was never accessed has no entry at
//! all, which keeps memory proportional to the trace footprint instead of the
//! index space.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `lookup()`: O(W) where W is the number of ways (associativity)
//!   - `insert()`: O(W)
//! - **Space Complexity:** O(T × W) where T is the number of touched sets

use std::collections::HashMap;

/// Upper bound on the entries reserved up front when a set is first touched.
const MAX_PREALLOCATED_WAYS: usize = 16;

/// A resident block: its tag and the logical time of its last access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEntry {
    /// Block tag.
    pub tag: u64,
    /// Logical clock value of the most recent access.
    pub last_access: u64,
}

/// Per-index LRU storage for a set-associative cache.
#[derive(Clone, Debug)]
pub struct SetStore {
    ways: usize,
    /// Entries of each touched set, in insertion order.
    sets: HashMap<u64, Vec<BlockEntry>>,
}

impl SetStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    ///
    /// * `ways` - Maximum number of resident blocks per set.
    pub fn new(ways: usize) -> Self {
        Self {
            ways,
            sets: HashMap::new(),
        }
    }

    /// Associativity this store was created with.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Looks up `tag` in set `index`.
    ///
    /// A hit refreshes the entry's recency to `now`. A miss changes nothing.
    ///
    /// # Returns
    ///
    /// `true` on a hit.
    pub fn lookup(&mut self, index: u64, tag: u64, now: u64) -> bool {
        let Some(set) = self.sets.get_mut(&index) else {
            return false;
        };
        match set.iter_mut().find(|entry| entry.tag == tag) {
            Some(entry) => {
                entry.last_access = now;
                true
            }
            None => false,
        }
    }

    /// Installs `tag` in set `index` with recency `time`.
    ///
    /// If the set is full, the entry with the smallest `last_access` is evicted
    /// first. Among equal timestamps the entry resident longest goes.
    ///
    /// # Returns
    ///
    /// The evicted tag, if the set was full.
    pub fn insert(&mut self, index: u64, tag: u64, time: u64) -> Option<u64> {
        let ways = self.ways;
        let set = self
            .sets
            .entry(index)
            .or_insert_with(|| Vec::with_capacity(ways.min(MAX_PREALLOCATED_WAYS)));

        let evicted = if set.len() >= ways {
            let victim = victim_position(set);
            Some(set.remove(victim).tag)
        } else {
            None
        };

        set.push(BlockEntry {
            tag,
            last_access: time,
        });
        evicted
    }

    /// Whether `tag` is resident in set `index`. Does not touch recency.
    pub fn contains(&self, index: u64, tag: u64) -> bool {
        self.sets
            .get(&index)
            .is_some_and(|set| set.iter().any(|entry| entry.tag == tag))
    }

    /// Resident entries of set `index` in insertion order (empty if untouched).
    pub fn resident(&self, index: u64) -> &[BlockEntry] {
        self.sets.get(&index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of sets that have been touched.
    pub fn occupied_sets(&self) -> usize {
        self.sets.len()
    }

    /// Largest number of resident entries in any set.
    pub fn max_occupancy(&self) -> usize {
        self.sets.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Drops every set.
    pub fn clear(&mut self) {
        self.sets.clear();
    }
}

/// Position of the least recently used entry. The first of several equal
/// minima wins, which is the oldest insertion.
fn victim_position(set: &[BlockEntry]) -> usize {
    let mut victim = 0;
    for (pos, entry) in set.iter().enumerate().skip(1) {
        if entry.last_access < set[victim].last_access {
            victim = pos;
        }
    }
    victim
}
