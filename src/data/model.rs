use std::fmt;

use clap::ValueEnum;
use csv::StringRecord;

// ---------------------------------------------------------------------------
// Header – column names of the first input row
// ---------------------------------------------------------------------------

/// Column names taken from the first row of a CSV input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn from_record(record: &StringRecord) -> Self {
        Self::new(record.iter().map(|c| c.to_string()).collect())
    }

    /// Zero-based position of `name`. Matching is exact and case-sensitive;
    /// when a name appears more than once the earliest column wins.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// How the `samples` column is compared against the minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SampleComparison {
    /// Raw string ordering: "10" sorts before "9".
    #[default]
    Lexical,
    /// Both sides parsed as unsigned integers.
    Numeric,
}

impl fmt::Display for SampleComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SampleComparison::Lexical => "lexical",
            SampleComparison::Numeric => "numeric",
        };
        f.write_str(s)
    }
}

/// Predicate inputs for the row filter. `radio`, `mcc` and `net` are exact
/// string matches; `min_samples` is a lower bound on the `samples` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub radio: String,
    pub mcc: String,
    pub net: String,
    pub min_samples: String,
    pub comparison: SampleComparison,
}

impl FilterCriteria {
    pub fn new(
        radio: impl Into<String>,
        mcc: impl Into<String>,
        net: impl Into<String>,
        min_samples: impl Into<String>,
    ) -> Self {
        Self {
            radio: radio.into(),
            mcc: mcc.into(),
            net: net.into(),
            min_samples: min_samples.into(),
            comparison: SampleComparison::default(),
        }
    }

    pub fn with_comparison(mut self, comparison: SampleComparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Whether a row's sample count satisfies the minimum.
    pub fn samples_pass(&self, samples: &str) -> bool {
        match self.comparison {
            SampleComparison::Lexical => samples >= self.min_samples.as_str(),
            SampleComparison::Numeric => {
                match (samples.parse::<u64>(), self.min_samples.parse::<u64>()) {
                    (Ok(have), Ok(want)) => have >= want,
                    _ => false,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Marker – one point on the rendered map
// ---------------------------------------------------------------------------

/// A map marker parsed from one positional row
/// (`lon, lat, created, updated, cell`).
///
/// `created` and `updated` keep the raw epoch text; conversion happens at
/// render time so an unparsable timestamp only blanks its own field.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lon: f64,
    pub lat: f64,
    pub created: String,
    pub updated: String,
    pub cell: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_position_first_match_wins() {
        let header = Header::new(vec!["radio".into(), "mcc".into(), "radio".into()]);
        assert_eq!(header.position("radio"), Some(0));
        assert_eq!(header.position("mcc"), Some(1));
        assert_eq!(header.position("Radio"), None);
        assert_eq!(header.position("net"), None);
    }

    #[test]
    fn test_lexical_samples_compare_as_strings() {
        let criteria = FilterCriteria::new("GSM", "262", "1", "9");
        assert!(criteria.samples_pass("9"));
        assert!(criteria.samples_pass("90"));
        assert!(!criteria.samples_pass("10"));
        assert!(!criteria.samples_pass("100"));
    }

    #[test]
    fn test_numeric_samples_compare_as_integers() {
        let criteria =
            FilterCriteria::new("GSM", "262", "1", "9").with_comparison(SampleComparison::Numeric);
        assert!(criteria.samples_pass("10"));
        assert!(criteria.samples_pass("9"));
        assert!(!criteria.samples_pass("8"));
        assert!(!criteria.samples_pass("many"));
    }
}
