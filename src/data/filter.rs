use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::Context;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};

use super::model::{FilterCriteria, Header, SampleComparison};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Columns every input must carry for the predicate to be evaluated.
pub const RADIO_COLUMN: &str = "radio";
pub const MCC_COLUMN: &str = "mcc";
pub const NET_COLUMN: &str = "net";
pub const SAMPLES_COLUMN: &str = "samples";

/// Position of `name` in `header`, or [`Error::ColumnNotFound`].
pub fn resolve_column(header: &Header, name: &str) -> Result<usize> {
    header
        .position(name)
        .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
}

// ---------------------------------------------------------------------------
// Row filter
// ---------------------------------------------------------------------------

/// Counters reported once the input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub rows_read: u64,
    pub rows_matched: u64,
}

/// A predicate plus projection with every column already resolved against
/// one header, so per-row work is plain indexing.
#[derive(Debug, Clone)]
pub struct RowFilter {
    criteria: FilterCriteria,
    radio: usize,
    mcc: usize,
    net: usize,
    samples: usize,
    columns: Vec<String>,
    projection: Vec<usize>,
    width: usize,
}

impl RowFilter {
    /// Resolve the criteria columns and the requested output columns.
    /// Fails on the first column that is missing from `header`.
    pub fn new(header: &Header, criteria: FilterCriteria, columns: Vec<String>) -> Result<Self> {
        if criteria.comparison == SampleComparison::Numeric
            && criteria.min_samples.parse::<u64>().is_err()
        {
            return Err(Error::InvalidThreshold(criteria.min_samples));
        }

        let radio = resolve_column(header, RADIO_COLUMN)?;
        let mcc = resolve_column(header, MCC_COLUMN)?;
        let net = resolve_column(header, NET_COLUMN)?;
        let samples = resolve_column(header, SAMPLES_COLUMN)?;

        let projection = columns
            .iter()
            .map(|c| resolve_column(header, c))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "resolved radio={radio} mcc={mcc} net={net} samples={samples} projection={projection:?}"
        );

        Ok(Self {
            criteria,
            radio,
            mcc,
            net,
            samples,
            columns,
            projection,
            width: header.len(),
        })
    }

    /// Evaluate the predicate. `record` must already have passed
    /// [`RowFilter::check_width`].
    pub fn matches(&self, record: &StringRecord) -> bool {
        record[self.radio] == self.criteria.radio
            && record[self.mcc] == self.criteria.mcc
            && record[self.net] == self.criteria.net
            && self.criteria.samples_pass(&record[self.samples])
    }

    /// The requested fields of `record`, in output order.
    pub fn project<'r>(&'r self, record: &'r StringRecord) -> impl Iterator<Item = &'r str> + 'r {
        self.projection.iter().map(move |&i| &record[i])
    }

    /// Reject rows whose field count differs from the header's.
    pub fn check_width(&self, record: &StringRecord) -> Result<()> {
        if record.len() != self.width {
            return Err(Error::MalformedRow {
                line: record_line(record),
                expected: self.width,
                found: record.len(),
            });
        }
        Ok(())
    }

    /// Stream every remaining row of `reader` through the filter into
    /// `output`. The output header is written first, even if nothing
    /// matches. Only one record is held in memory at a time.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: &mut csv::Reader<R>,
        output: W,
    ) -> Result<FilterStats> {
        if self.projection.is_empty() {
            // csv writes an empty record as `""`, which reads back as one
            // unnamed column. Zero columns are written as bare lines instead.
            let mut out = BufWriter::new(output);
            out.write_all(b"\n")?;
            let stats = self.scan(reader, |_| Ok(out.write_all(b"\n")?))?;
            out.flush()?;
            return Ok(stats);
        }

        let mut writer = csv::Writer::from_writer(output);
        writer.write_record(&self.columns)?;
        let stats = self.scan(reader, |record| Ok(writer.write_record(self.project(record))?))?;
        writer.flush()?;
        Ok(stats)
    }

    fn scan<R: Read>(
        &self,
        reader: &mut csv::Reader<R>,
        mut emit: impl FnMut(&StringRecord) -> Result<()>,
    ) -> Result<FilterStats> {
        let mut stats = FilterStats::default();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            stats.rows_read += 1;
            self.check_width(&record)?;
            if self.matches(&record) {
                emit(&record)?;
                stats.rows_matched += 1;
            }
        }
        Ok(stats)
    }
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Comma-delimited reader that hands the header back as an ordinary record.
/// Width checks are done by [`RowFilter::check_width`] so the error can name
/// the offending line.
pub fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

/// Read the first row as the header. Empty input is an error.
pub fn read_header<R: Read>(reader: &mut csv::Reader<R>) -> Result<Header> {
    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Err(Error::EmptyInput);
    }
    Ok(Header::from_record(&record))
}

/// Filter CSV text from `input` into `output`.
pub fn filter_csv<R: Read, W: Write>(
    input: R,
    output: W,
    criteria: FilterCriteria,
    columns: Vec<String>,
) -> Result<FilterStats> {
    let mut reader = csv_reader(input);
    let header = read_header(&mut reader)?;
    let filter = RowFilter::new(&header, criteria, columns)?;
    filter.run(&mut reader, output)
}

/// Filter the CSV file at `input` into a new file at `output`.
///
/// The output file is only created once the header has been read and every
/// column resolved, so a schema error leaves `output` untouched.
pub fn filter_file(
    input: &Path,
    output: &Path,
    criteria: FilterCriteria,
    columns: Vec<String>,
) -> anyhow::Result<FilterStats> {
    let file = File::open(input)
        .with_context(|| format!("Error opening the input file {}", input.display()))?;
    let mut reader = csv_reader(file);
    let header = read_header(&mut reader).context("Error reading CSV header")?;
    let filter = RowFilter::new(&header, criteria, columns)?;

    let out = File::create(output)
        .with_context(|| format!("Error creating the output file {}", output.display()))?;
    let stats = filter
        .run(&mut reader, out)
        .with_context(|| format!("Error filtering {}", input.display()))?;

    info!(
        "{}: {} rows read, {} matched, written to {}",
        input.display(),
        stats.rows_read,
        stats.rows_matched,
        output.display()
    );
    Ok(stats)
}
