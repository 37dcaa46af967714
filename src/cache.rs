use crate::address::AddressLayout;
use crate::tracker::Counters;
use log::debug;
use std::fmt;
use std::ops::{Index, IndexMut};

/// The `Outcome` enum encodes the result of presenting a single address to a cache model.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    Hit,
    Miss,
    MissWithEviction,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = match self {
            Outcome::Hit => "hit",
            Outcome::Miss => "miss",
            Outcome::MissWithEviction => "miss eviction",
        };
        write!(f, "{}", descriptor)
    }
}

/// Operations the trace driver needs from a cache model. Implementations must agree on the
/// outcome of every access for the same configuration and trace.
pub trait CacheModel {
    /// Present an address to the cache, updating residency and counters.
    fn lookup(&mut self, address: u64) -> Outcome;

    /// Advance recency bookkeeping by one access. Called once per processed trace record.
    fn age_all(&mut self);

    /// Counters accumulated since construction.
    fn counters(&self) -> Counters;
}

/// The `CacheLine` struct is a single slot within a set. The tag is only meaningful while the
/// line is valid, and `recency` counts the accesses elapsed since the line was last referenced.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: Option<u64>,
    pub recency: u64,
}

impl CacheLine {
    fn new() -> Self {
        Self {
            valid: false,
            tag: None,
            recency: 0,
        }
    }

    fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == Some(tag)
    }

    fn fill(&mut self, tag: u64) {
        self.valid = true;
        self.tag = Some(tag);
        self.recency = 0;
    }
}

/// The `CacheSet` struct is a fixed number of lines selected by the set index bits of an address.
/// Line order carries no policy meaning beyond breaking ties in favor of the lowest index.
#[derive(Debug)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    fn build(lines_per_set: usize) -> Self {
        Self {
            lines: vec![CacheLine::new(); lines_per_set],
        }
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.matches(tag))
    }

    fn find_empty(&self) -> Option<usize> {
        self.lines.iter().position(|line| !line.valid)
    }

    /// Select the least recently used line: the one with the largest recency, keeping the first
    /// line found when several share the maximum.
    fn find_victim(&self) -> usize {
        let mut victim = 0;
        for (index, line) in self.lines.iter().enumerate() {
            if line.recency > self.lines[victim].recency {
                victim = index;
            }
        }
        victim
    }
}

impl Index<usize> for CacheSet {
    type Output = CacheLine;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lines[index]
    }
}

impl IndexMut<usize> for CacheSet {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.lines[index]
    }
}

/// The `Cache` struct models a set-associative cache with least recently used replacement. Recency
/// is tracked with an integer stamp per line: a referenced line is reset to zero and every valid
/// line is aged by one after each processed access, so the line with the largest stamp in a set is
/// always the least recently used one.
///
/// Only tag presence and occupancy are modeled; no data is stored.
#[derive(Debug)]
pub struct Cache {
    layout: AddressLayout,
    sets: Vec<CacheSet>,
    pub tracker: Counters,
}

impl Cache {
    /// Create a new `Cache` with every line invalid.
    ///
    /// # Arguments
    ///
    /// * `layout` - address layout determining the number of sets and the tag/index split.
    /// * `lines_per_set` - associativity, the number of lines in every set.
    ///
    pub fn build(layout: AddressLayout, lines_per_set: usize) -> Self {
        let mut sets: Vec<CacheSet> = Vec::with_capacity(layout.set_count());
        (0..layout.set_count()).for_each(|_| sets.push(CacheSet::build(lines_per_set)));
        Self {
            layout,
            sets,
            tracker: Counters::new(),
        }
    }

    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }
}

impl CacheModel for Cache {
    /// Search the addressed set for the tag. A hit refreshes the matching line. On a miss the
    /// first invalid line is filled, or, if the set is full, the least recently used line is
    /// overwritten.
    fn lookup(&mut self, address: u64) -> Outcome {
        let decoded = self.layout.decompose(address);
        let set = &mut self.sets[decoded.set_index];

        if let Some(index) = set.find(decoded.tag) {
            set[index].recency = 0;
            self.tracker.hits += 1;
            return Outcome::Hit;
        }

        self.tracker.misses += 1;
        if let Some(index) = set.find_empty() {
            set[index].fill(decoded.tag);
            return Outcome::Miss;
        }

        self.tracker.evictions += 1;
        let victim = set.find_victim();
        debug!(
            "evict set {} line {} tag {:x?} for tag {:x}",
            decoded.set_index, victim, set[victim].tag, decoded.tag
        );
        set[victim].fill(decoded.tag);
        Outcome::MissWithEviction
    }

    fn age_all(&mut self) {
        self.sets
            .iter_mut()
            .flat_map(|set| set.lines.iter_mut())
            .filter(|line| line.valid)
            .for_each(|line| line.recency += 1);
    }

    fn counters(&self) -> Counters {
        self.tracker
    }
}
