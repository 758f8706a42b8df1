use std::path::PathBuf;

use clap::Parser;

use crate::data::model::{FilterCriteria, SampleComparison};
use crate::render::TimeZoneMode;

/// Select cell rows by radio, MCC, network and sample count, keeping only
/// the listed columns.
#[derive(Parser, Debug, Clone)]
#[command(name = "cell-filter", version)]
pub struct FilterArgs {
    /// Input CSV file
    pub input: PathBuf,

    /// Output CSV file (created or truncated)
    pub output: PathBuf,

    /// Radio type to keep, e.g. GSM, UMTS, LTE
    pub radio: String,

    /// Mobile country code to keep
    pub mcc: String,

    /// Mobile network code to keep
    pub net: String,

    /// Minimum value of the `samples` column
    pub min_samples: String,

    /// Columns to write, in output order
    pub columns: Vec<String>,

    /// How `samples` is compared with the minimum
    #[arg(long, value_enum, default_value_t = SampleComparison::Lexical)]
    pub samples_compare: SampleComparison,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(&self.radio, &self.mcc, &self.net, &self.min_samples)
            .with_comparison(self.samples_compare)
    }
}

/// Plot `lon,lat,created,updated,cell` rows as clustered markers on an
/// HTML map.
#[derive(Parser, Debug, Clone)]
#[command(name = "cell-map", version)]
pub struct MapArgs {
    /// Input CSV file (columns by position: lon,lat,created,updated,cell)
    pub input: PathBuf,

    /// Output HTML file
    pub output: PathBuf,

    /// Zone for the created/updated timestamps
    #[arg(long, value_enum, default_value_t = TimeZoneMode::Utc)]
    pub timezone: TimeZoneMode,
}

/// Write a synthetic cell export for trying the other tools.
#[derive(Parser, Debug, Clone)]
#[command(name = "generate_sample", version)]
pub struct SampleArgs {
    /// Output CSV file
    #[arg(default_value = "sample_cells.csv")]
    pub output: PathBuf,

    /// Number of rows to generate
    #[arg(long, default_value_t = 500)]
    pub rows: usize,

    /// Seed for the generator; equal seeds give equal files
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
