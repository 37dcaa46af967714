use crate::error::Result;
use std::fs;
use std::path::Path;

/// Default location of the machine-readable results triple.
pub const FILENAME_RESULTS: &str = ".csim_results";

/// The `Counters` struct is the collection of hit, miss, and eviction totals accumulated over a
/// trace replay. All counters start at zero and only ever increase.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct Counters {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
}

impl Counters {
    /// Create a new instance of the `Counters` struct with all counters initialized to zero.
    pub fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }
}

impl std::fmt::Display for Counters {
    /// One line summary of the replay, e.g. `hits:4 misses:5 evictions:3`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{}",
            self.hits, self.misses, self.evictions
        )
    }
}

/// Persist the final counters as a single line of three space separated integers so that other
/// tools can compare runs without parsing the human readable summary.
///
/// # Errors
///
/// Fails if the file cannot be created or written.
pub fn write_results<P: AsRef<Path>>(path: P, counters: &Counters) -> Result<()> {
    fs::write(
        path,
        format!(
            "{} {} {}\n",
            counters.hits, counters.misses, counters.evictions
        ),
    )?;
    Ok(())
}
