use crate::cache::{CacheModel, Outcome};
use crate::error::Result;
use crate::trace::{AccessKind, AccessRecord};
use crate::tracker::Counters;
use std::io::Write;

/// Replay a sequence of access records against a cache model and return the accumulated
/// counters. Loads and stores perform one lookup, modifies perform two (a read followed by a write
/// of the same address), and instruction fetches are skipped without aging. Every other record
/// ages the model exactly once, after its lookups.
///
/// # Arguments
///
/// * `model` - a freshly built cache model; its counters are returned at the end.
/// * `records` - the parsed trace.
/// * `verbose` - when set, one line describing each processed record is written to `out`.
/// * `out` - sink for the verbose lines.
///
/// # Errors
///
/// Only failures writing verbose output are reported. The model itself cannot fail.
pub fn replay<M, I, W>(model: &mut M, records: I, verbose: bool, out: &mut W) -> Result<Counters>
where
    M: CacheModel,
    I: IntoIterator<Item = AccessRecord>,
    W: Write,
{
    for record in records {
        let outcome = match record.kind {
            AccessKind::Instruction => continue,
            AccessKind::Load | AccessKind::Store => model.lookup(record.address),
            AccessKind::Modify => {
                let outcome = model.lookup(record.address);
                model.lookup(record.address);
                outcome
            }
        };

        if verbose {
            writeln!(out, "{}", render(&record, outcome))?;
        }
        model.age_all();
    }
    Ok(model.counters())
}

/// Describe a processed record, e.g. `L 10,1, miss` or `M 20,1, miss eviction hit`. The write half
/// of a modify always hits, so its descriptor is a constant trailing `hit`.
pub fn render(record: &AccessRecord, outcome: Outcome) -> String {
    let mut line = format!(
        "{} {:x},{}, {}",
        record.kind, record.address, record.size, outcome
    );
    if record.kind == AccessKind::Modify {
        line.push_str(" hit");
    }
    line
}
