use crate::address::AddressLayout;
use crate::cache::{CacheModel, Outcome};
use crate::tracker::Counters;
use linked_hash_map::LinkedHashMap;
use log::debug;

/// The `RecencyQueue` struct holds the tags resident in one set, ordered from least recently used
/// at the front to most recently used at the back.
#[derive(Debug)]
struct RecencyQueue {
    capacity: usize,
    map: LinkedHashMap<u64, ()>,
}

impl RecencyQueue {
    fn build(capacity: usize) -> Self {
        Self {
            capacity,
            map: LinkedHashMap::with_capacity(capacity),
        }
    }

    /// Move a resident tag to the most recently used position. Returns `false` if the tag is not
    /// resident.
    fn reference(&mut self, tag: u64) -> bool {
        self.map.get_refresh(&tag).is_some()
    }

    /// Insert a tag that is not yet resident, victimizing the least recently used tag when the
    /// queue is already full. The victim, if any, is returned.
    fn insert(&mut self, tag: u64) -> Option<u64> {
        let victim = match self.map.len() == self.capacity {
            true => self.map.pop_front().map(|(victim, _)| victim),
            false => None,
        };
        self.map.insert(tag, ());
        victim
    }
}

/// The `OrderedCache` struct is a set-associative LRU cache that keeps an explicit recency order
/// per set instead of integer stamps. It produces the same outcomes as `cache::Cache` without the
/// global aging pass.
#[derive(Debug)]
pub struct OrderedCache {
    layout: AddressLayout,
    sets: Vec<RecencyQueue>,
    pub tracker: Counters,
}

impl OrderedCache {
    /// Create a new `OrderedCache` with every set empty.
    ///
    /// # Arguments
    ///
    /// * `layout` - address layout determining the number of sets and the tag/index split.
    /// * `lines_per_set` - associativity, the number of tags each set may hold.
    pub fn build(layout: AddressLayout, lines_per_set: usize) -> Self {
        let mut sets: Vec<RecencyQueue> = Vec::with_capacity(layout.set_count());
        (0..layout.set_count()).for_each(|_| sets.push(RecencyQueue::build(lines_per_set)));
        Self {
            layout,
            sets,
            tracker: Counters::new(),
        }
    }
}

impl CacheModel for OrderedCache {
    fn lookup(&mut self, address: u64) -> Outcome {
        let decoded = self.layout.decompose(address);
        let set = &mut self.sets[decoded.set_index];

        if set.reference(decoded.tag) {
            self.tracker.hits += 1;
            return Outcome::Hit;
        }

        self.tracker.misses += 1;
        match set.insert(decoded.tag) {
            None => Outcome::Miss,
            Some(victim) => {
                debug!(
                    "evict set {} tag {:x} for tag {:x}",
                    decoded.set_index, victim, decoded.tag
                );
                self.tracker.evictions += 1;
                Outcome::MissWithEviction
            }
        }
    }

    // recency lives in the queue order, nothing to age
    fn age_all(&mut self) {}

    fn counters(&self) -> Counters {
        self.tracker
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[cfg(test)]
    mod recency_queue_tests {

        use super::*;
        const SIZE_TEST: usize = 3;

        #[test]
        fn build() {
            let queue = RecencyQueue::build(SIZE_TEST);
            assert_eq!(queue.map.len(), 0);
            assert_eq!(queue.capacity, SIZE_TEST);
        }

        #[test]
        fn insert_and_victimize() {
            let mut queue = RecencyQueue::build(SIZE_TEST);
            (0..SIZE_TEST as u64).for_each(|x| assert_eq!(queue.insert(x), None));
            assert_eq!(queue.insert(10), Some(0));
            assert_eq!(queue.insert(11), Some(1));
            assert_eq!(queue.map.len(), SIZE_TEST);
        }

        #[test]
        fn reference() {
            let mut queue = RecencyQueue::build(SIZE_TEST);
            (0..SIZE_TEST as u64).for_each(|x| {
                queue.insert(x);
            });
            assert!(queue.reference(0));
            assert!(!queue.reference(7));
            assert_eq!(queue.map.back().unwrap().0, &0);
            assert_eq!(queue.insert(3), Some(1));
        }
    }

    #[cfg(test)]
    mod ordered_cache_tests {

        use super::*;

        #[test]
        fn build() {
            let cache = OrderedCache::build(AddressLayout::new(4, 4), 2);
            assert_eq!(cache.sets.len(), 16);
            assert!(cache.sets.iter().all(|set| set.capacity == 2));
            assert_eq!(cache.counters(), Counters::new());
        }

        #[test]
        fn small_direct_mapped_scenario() {
            let mut cache = OrderedCache::build(AddressLayout::new(1, 1), 1);
            let outcomes: Vec<Outcome> = [0, 2, 0, 4].iter().map(|x| cache.lookup(*x)).collect();
            assert_eq!(
                outcomes,
                vec![
                    Outcome::Miss,
                    Outcome::Miss,
                    Outcome::Hit,
                    Outcome::MissWithEviction
                ]
            );
            assert_eq!(
                cache.counters(),
                Counters {
                    hits: 1,
                    misses: 3,
                    evictions: 1
                }
            );
        }

        #[test]
        fn evicts_least_recently_used() {
            let mut cache = OrderedCache::build(AddressLayout::new(1, 2), 2);
            let (a, b, c) = (0x00, 0x08, 0x10);
            assert_eq!(cache.lookup(a), Outcome::Miss);
            assert_eq!(cache.lookup(b), Outcome::Miss);
            assert_eq!(cache.lookup(a), Outcome::Hit);
            assert_eq!(cache.lookup(c), Outcome::MissWithEviction);
            assert_eq!(cache.lookup(a), Outcome::Hit);
            assert_eq!(cache.lookup(b), Outcome::MissWithEviction);
        }
    }
}
