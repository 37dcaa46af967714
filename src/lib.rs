pub mod address;
pub mod cache;
pub mod config;
pub mod driver;
pub mod error;
pub mod ordered;
pub mod trace;
pub mod tracker;

use cache::Cache;
use config::{Config, Model};
use error::Result;
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use log::info;
use ordered::OrderedCache;
use std::io;
use trace::{AccessRecord, TraceReader};
use tracker::Counters;

const PROGRESS_TEMPLATE: &str = "{spinner} [{elapsed_precise}] {wide_bar} {pos}/{len} records";

/// Read the whole trace up front so that a malformed line aborts the run before any counters are
/// produced.
fn load_trace(config: &Config) -> Result<Vec<AccessRecord>> {
    let records = TraceReader::open(&config.trace_file)?.collect::<Result<Vec<_>>>()?;
    info!("loaded {} records from {}", records.len(), config.trace_file);
    Ok(records)
}

fn progress_bar(config: &Config, length: usize) -> ProgressBar {
    if config.verbose {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(length as u64);
    if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        bar.set_style(style);
    }
    bar
}

/// Replay the configured trace against a freshly built cache and return the final counters.
/// Verbose trace lines go to standard output.
///
/// # Errors
///
/// Fails if the configuration is invalid, the trace cannot be read or parsed, or verbose output
/// cannot be written.
pub fn simulate(config: &Config) -> Result<Counters> {
    config.validate()?;
    let records = load_trace(config)?;
    let bar = progress_bar(config, records.len());
    let records = records.into_iter().progress_with(bar.clone());

    let layout = config.layout();
    let lines_per_set = config.lines_per_set as usize;
    let mut out = io::stdout().lock();
    let counters = match config.model {
        Model::Stamp => {
            let mut cache = Cache::build(layout, lines_per_set);
            driver::replay(&mut cache, records, config.verbose, &mut out)?
        }
        Model::Ordered => {
            let mut cache = OrderedCache::build(layout, lines_per_set);
            driver::replay(&mut cache, records, config.verbose, &mut out)?
        }
    };
    bar.finish_and_clear();
    Ok(counters)
}

/// Run a complete simulation: replay the trace, print the one line summary, and persist the
/// counters to the configured results file.
pub fn run_simulation(config: &Config) -> Result<Counters> {
    let counters = simulate(config)?;
    info!("replay finished: {}", counters);
    println!("{}", counters);
    tracker::write_results(&config.results_file, &counters)?;
    Ok(counters)
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const TRACE_SMALL: &str = " L 0,1\n L 2,1\n L 0,1\n L 4,1\n";

    fn trace_file(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn make_config(trace: &NamedTempFile, results: &TempDir, model: Model) -> Config {
        Config {
            set_bits: 1,
            lines_per_set: 1,
            block_bits: 1,
            trace_file: trace.path().to_string_lossy().into_owned(),
            verbose: false,
            model,
            results_file: results
                .path()
                .join(tracker::FILENAME_RESULTS)
                .to_string_lossy()
                .into_owned(),
        }
    }

    #[cfg(test)]
    mod simulation_tests {

        use super::*;

        #[test]
        fn writes_summary_and_results() {
            let trace = trace_file(TRACE_SMALL);
            let results = tempfile::tempdir().unwrap();
            let config = make_config(&trace, &results, Model::Stamp);
            let counters = run_simulation(&config).unwrap();
            assert_eq!(
                counters,
                Counters {
                    hits: 1,
                    misses: 3,
                    evictions: 1
                }
            );
            assert_eq!(fs::read_to_string(&config.results_file).unwrap(), "1 3 1\n");
        }

        #[test]
        fn models_agree() {
            let trace = trace_file(" I 0,4\n M 0,1\n L 6,1\n S 8,1\n L 0,1\n M 2,1\n L e,1\n");
            let results = tempfile::tempdir().unwrap();
            let stamped = simulate(&make_config(&trace, &results, Model::Stamp)).unwrap();
            let ordered = simulate(&make_config(&trace, &results, Model::Ordered)).unwrap();
            assert_eq!(stamped, ordered);
        }

        #[test]
        fn malformed_trace_produces_no_results() {
            let trace = trace_file(" L 0,1\n L zz,1\n");
            let results = tempfile::tempdir().unwrap();
            let config = make_config(&trace, &results, Model::Stamp);
            assert!(matches!(
                run_simulation(&config),
                Err(error::Error::MalformedRecord { line: 2, .. })
            ));
            assert!(fs::metadata(&config.results_file).is_err());
        }

        #[test]
        fn invalid_config() {
            let trace = trace_file(TRACE_SMALL);
            let results = tempfile::tempdir().unwrap();
            let mut config = make_config(&trace, &results, Model::Stamp);
            config.lines_per_set = 0;
            assert!(matches!(
                simulate(&config),
                Err(error::Error::InvalidConfig(_))
            ));
        }

        #[test]
        fn replay_is_repeatable() {
            let trace = trace_file(TRACE_SMALL);
            let results = tempfile::tempdir().unwrap();
            let config = make_config(&trace, &results, Model::Stamp);
            assert_eq!(simulate(&config).unwrap(), simulate(&config).unwrap());
        }
    }
}
