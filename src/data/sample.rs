use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// One row of a cell export, in the column order tools like OpenCelliD use.
#[derive(Debug, Clone, Serialize)]
pub struct CellRow {
    pub radio: &'static str,
    pub mcc: u16,
    pub net: u16,
    pub area: u32,
    pub cell: u64,
    pub unit: u16,
    pub lon: f64,
    pub lat: f64,
    pub range: u32,
    pub samples: u32,
    pub changeable: u8,
    pub created: i64,
    pub updated: i64,
    #[serde(rename = "averageSignal")]
    pub average_signal: i32,
}

/// Operators to draw from: (mcc, net, centre lon, centre lat).
const OPERATORS: [(u16, u16, f64, f64); 6] = [
    (262, 1, 13.40, 52.52),
    (262, 2, 11.58, 48.14),
    (262, 3, 9.99, 53.55),
    (228, 1, 8.54, 47.37),
    (208, 10, 2.35, 48.86),
    (310, 260, -122.42, 37.77),
];

const RADIOS: [&str; 3] = ["GSM", "UMTS", "LTE"];

/// splitmix64.
struct SplitMix {
    state: u64,
}

impl SplitMix {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64() as usize % items.len()]
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// Deterministic stream of plausible cell rows.
pub struct SampleGenerator {
    rng: SplitMix,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SplitMix::new(seed),
        }
    }

    pub fn next_row(&mut self) -> CellRow {
        let rng = &mut self.rng;
        let radio = *rng.pick(&RADIOS);
        let &(mcc, net, lon0, lat0) = rng.pick(&OPERATORS);

        let cell = match radio {
            "LTE" => rng.range(1, 268_435_456),
            "UMTS" => rng.range(1, 16_777_216),
            _ => rng.range(1, 65_536),
        };
        let unit = if radio == "GSM" { 0 } else { rng.range(0, 512) as u16 };

        // Sample counts are heavy-tailed: most cells have few observations.
        let samples = (rng.unit().powi(4) * 2000.0) as u32 + 1;
        let created = rng.range(1_300_000_000, 1_650_000_000) as i64;
        let updated = created + rng.range(0, 50_000_000) as i64;

        CellRow {
            radio,
            mcc,
            net,
            area: rng.range(1, 65_535) as u32,
            cell,
            unit,
            lon: round6(lon0 + (rng.unit() - 0.5) * 0.6),
            lat: round6(lat0 + (rng.unit() - 0.5) * 0.4),
            range: rng.range(100, 5_000) as u32,
            samples,
            changeable: 1,
            created,
            updated,
            average_signal: if rng.unit() < 0.7 { 0 } else { -(rng.range(50, 110) as i32) },
        }
    }
}

/// Write a header plus `rows` generated rows as CSV. Returns the row count.
pub fn write_sample<W: Write>(output: W, rows: usize, seed: u64) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(output);
    let mut generator = SampleGenerator::new(seed);
    for _ in 0..rows {
        writer.serialize(generator.next_row())?;
    }
    writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(rows: usize, seed: u64) -> String {
        let mut out = Vec::new();
        write_sample(&mut out, rows, seed).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let text = sample(1, 1);
        assert_eq!(
            text.lines().next().unwrap(),
            "radio,mcc,net,area,cell,unit,lon,lat,range,samples,changeable,created,updated,averageSignal"
        );
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_same_seed_same_output() {
        assert_eq!(sample(50, 7), sample(50, 7));
        assert_ne!(sample(50, 7), sample(50, 8));
    }

    #[test]
    fn test_rows_are_plausible() {
        let mut generator = SampleGenerator::new(3);
        for _ in 0..200 {
            let row = generator.next_row();
            assert!(RADIOS.contains(&row.radio));
            assert!(row.samples >= 1 && row.samples <= 2001);
            assert!(row.updated >= row.created);
            assert!((-180.0..=180.0).contains(&row.lon));
            assert!((-90.0..=90.0).contains(&row.lat));
        }
    }
}
