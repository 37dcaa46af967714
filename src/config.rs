use crate::address::AddressLayout;
use crate::error::{Error, Result};
use crate::tracker::FILENAME_RESULTS;
use clap::{Parser, ValueEnum};
use log::debug;
use std::env;

/// Widest set index accepted; `2^24` sets is already far beyond any real cache.
pub const MAX_SET_BITS: u32 = 24;

/// Upper bound on the total number of lines, `2^s * E`, across the whole cache.
pub const MAX_TOTAL_LINES: u64 = 1 << 24;

/// Which cache model to replay the trace against. Both produce identical results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// integer recency stamps aged after every access
    Stamp,
    /// explicit per-set recency order
    Ordered,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "LRU set-associative cache simulator", long_about = None)]
pub struct Config {
    /// Number of set index bits
    #[arg(short = 's', value_name = "num")]
    pub set_bits: u32,

    /// Number of lines per set
    #[arg(short = 'E', value_name = "num")]
    pub lines_per_set: u32,

    /// Number of block offset bits
    #[arg(short = 'b', value_name = "num")]
    pub block_bits: u32,

    /// Trace file
    #[arg(short = 't', value_name = "file")]
    pub trace_file: String,

    /// Display trace info
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = Model::Stamp)]
    pub model: Model,

    #[arg(long, default_value_t = env_or_default_str("CSIM_RESULTS_FILE", FILENAME_RESULTS))]
    pub results_file: String,
}

impl Config {
    /// Reject geometries the simulator cannot build. Every numeric parameter must be positive.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.set_bits == 0 || self.lines_per_set == 0 || self.block_bits == 0 {
            Err(Error::InvalidConfig(String::from(
                "'-s', '-E' and '-b' must all be positive integers",
            )))
        } else if self.set_bits > MAX_SET_BITS {
            Err(Error::InvalidConfig(format!(
                "'-s' must not exceed {}",
                MAX_SET_BITS
            )))
        } else if (1u64 << self.set_bits)
            .checked_mul(u64::from(self.lines_per_set))
            .map_or(true, |lines| lines > MAX_TOTAL_LINES)
        {
            Err(Error::InvalidConfig(format!(
                "'2^s * E' must not exceed {} lines",
                MAX_TOTAL_LINES
            )))
        } else {
            Ok(())
        }
    }

    pub fn layout(&self) -> AddressLayout {
        AddressLayout::new(self.set_bits, self.block_bits)
    }

    /// Log the full configuration at debug level. Standard output is left to the trace lines.
    pub fn display(&self) {
        debug!("simulation configuration values: {:#?}", self);
    }
}

fn env_or_default_str(varname: &str, default: &str) -> String {
    match env::var(varname) {
        Ok(val) => val,
        _ => String::from(default),
    }
}
