use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use super::model::Marker;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Positional marker reader
// ---------------------------------------------------------------------------

/// Fields a marker row must carry, in order: lon, lat, created, updated, cell.
pub const MARKER_FIELDS: usize = 5;

/// CSV reader for marker input. The first row is consumed as a header and
/// never consulted: marker columns are read by position.
pub fn marker_reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
}

/// Iterate the data rows of `reader` as markers. Stops being useful at the
/// first `Err`; callers are expected to abort there.
pub fn markers<R: Read>(reader: &mut csv::Reader<R>) -> impl Iterator<Item = Result<Marker>> + '_ {
    reader
        .records()
        .map(|result| result.map_err(Error::from).and_then(|r| parse_marker(&r)))
}

/// Build a [`Marker`] from one positional row. Extra trailing fields are
/// ignored; a row shorter than [`MARKER_FIELDS`] or a coordinate that is
/// not a finite number is an error. Ranges are not checked.
pub fn parse_marker(record: &StringRecord) -> Result<Marker> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    if record.len() < MARKER_FIELDS {
        return Err(Error::MalformedRow {
            line,
            expected: MARKER_FIELDS,
            found: record.len(),
        });
    }

    let coordinate = |idx: usize, field: &'static str| -> Result<f64> {
        let raw = &record[idx];
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| Error::InvalidCoordinate {
                line,
                field,
                value: raw.to_string(),
            })
    };

    Ok(Marker {
        lon: coordinate(0, "longitude")?,
        lat: coordinate(1, "latitude")?,
        created: record[2].to_string(),
        updated: record[3].to_string(),
        cell: record[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(input: &str) -> Result<Vec<Marker>> {
        let mut reader = marker_reader(input.as_bytes());
        markers(&mut reader).collect()
    }

    #[test]
    fn test_header_is_discarded_by_position() {
        // Header names are irrelevant; only column order matters.
        let markers = load("a,b,c,d,e\n12.34,56.78,0,60,abc\n").unwrap();
        assert_eq!(
            markers,
            vec![Marker {
                lon: 12.34,
                lat: 56.78,
                created: "0".into(),
                updated: "60".into(),
                cell: "abc".into(),
            }]
        );
    }

    #[test]
    fn test_header_only_and_empty_inputs() {
        assert!(load("lon,lat,created,updated,cell\n").unwrap().is_empty());
        assert!(load("").unwrap().is_empty());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let markers = load("lon,lat,created,updated,cell,x\n1,2,3,4,5,6\n").unwrap();
        assert_eq!(markers[0].cell, "5");
    }

    #[test]
    fn test_bad_longitude() {
        let err = load("lon,lat,created,updated,cell\n1,2,3,4,ok\nwest,2,3,4,bad\n").unwrap_err();
        match err {
            Error::InvalidCoordinate { line, field, value } => {
                assert_eq!(line, 3);
                assert_eq!(field, "longitude");
                assert_eq!(value, "west");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_latitude() {
        let err = load("lon,lat,created,updated,cell\n1,,3,4,x\n").unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { field: "latitude", .. }));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let err = load("lon,lat,created,updated,cell\ninf,2,3,4,x\n").unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { field: "longitude", .. }));
    }

    #[test]
    fn test_out_of_range_coordinates_pass_through() {
        let markers = load("lon,lat,created,updated,cell\n200,-95.5,3,4,x\n").unwrap();
        assert_eq!((markers[0].lon, markers[0].lat), (200.0, -95.5));
    }

    #[test]
    fn test_short_row() {
        let err = load("lon,lat,created,updated,cell\n1,2,3\n").unwrap_err();
        assert!(matches!(err, Error::MalformedRow { expected: 5, found: 3, .. }));
    }

    #[test]
    fn test_bad_timestamp_is_kept_raw() {
        let markers = load("lon,lat,created,updated,cell\n1,2,soon,,x\n").unwrap();
        assert_eq!(markers[0].created, "soon");
        assert_eq!(markers[0].updated, "");
    }
}
