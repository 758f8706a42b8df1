//! HTML map rendering.
//!
//! The output is one self-contained page that pulls Leaflet and
//! Leaflet.markercluster from public CDNs at pinned versions. Every marker
//! becomes one script statement adding a tooltip-bearing marker to a single
//! cluster layer.

use std::fmt;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local, SecondsFormat};
use clap::ValueEnum;
use log::{info, warn};

use crate::data::loader::{marker_reader, markers};
use crate::data::model::Marker;
use crate::error::Result;

pub const LEAFLET_VERSION: &str = "1.9.4";
pub const MARKER_CLUSTER_VERSION: &str = "1.4.1";

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Zone used when rendering epoch timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TimeZoneMode {
    /// `1970-01-01T00:00:00Z`; identical output on every machine.
    #[default]
    Utc,
    /// The zone configured for the running process.
    Local,
}

impl fmt::Display for TimeZoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeZoneMode::Utc => "utc",
            TimeZoneMode::Local => "local",
        };
        f.write_str(s)
    }
}

/// Convert epoch seconds to RFC 3339. Anything that is not an integer in
/// chrono's representable range yields an empty string.
pub fn format_timestamp(raw: &str, zone: TimeZoneMode) -> String {
    let Some(utc) = raw
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
    else {
        warn!("leaving unparsable timestamp '{raw}' blank");
        return String::new();
    };

    match zone {
        TimeZoneMode::Utc => utc.to_rfc3339_opts(SecondsFormat::Secs, true),
        TimeZoneMode::Local => utc
            .with_timezone(&Local)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape text for use as HTML content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Encode `text` as a JavaScript string literal that is safe inside an
/// inline `<script>` element.
pub fn script_string(text: &str) -> String {
    serde_json::Value::String(text.to_owned())
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

// ---------------------------------------------------------------------------
// Document assembly
// ---------------------------------------------------------------------------

fn page_start() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <title>Location Map</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet@{leaflet}/dist/leaflet.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@{cluster}/dist/MarkerCluster.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@{cluster}/dist/MarkerCluster.Default.css" />
  <style>
    #map {{
      height: 800px;
    }}
  </style>
</head>
<body>
  <div id="map"></div>
  <script src="https://cdn.jsdelivr.net/npm/leaflet@{leaflet}/dist/leaflet.js"></script>
  <script src="https://unpkg.com/leaflet.markercluster@{cluster}/dist/leaflet.markercluster.js"></script>
  <script>
    var map = L.map('map').setView([0, 0], 2);

    L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
      attribution: 'Map data &copy; <a href="https://www.openstreetmap.org/">OpenStreetMap</a> contributors',
      maxZoom: 18,
    }}).addTo(map);

    var markers = L.markerClusterGroup();

"#,
        leaflet = LEAFLET_VERSION,
        cluster = MARKER_CLUSTER_VERSION,
    )
}

const PAGE_END: &str = r#"
    map.addLayer(markers);
  </script>
</body>
</html>
"#;

/// An HTML map page under construction.
#[derive(Debug, Clone)]
pub struct MapDocument {
    html: String,
    zone: TimeZoneMode,
    markers: usize,
}

impl MapDocument {
    pub fn new(zone: TimeZoneMode) -> Self {
        Self {
            html: page_start(),
            zone,
            markers: 0,
        }
    }

    /// Tooltip markup for `marker`; the cell id is escaped, the timestamps
    /// are produced by [`format_timestamp`] and need no escaping.
    pub fn tooltip(&self, marker: &Marker) -> String {
        format!(
            "Created: {}<br />Updated: {}<br />Cell: {}",
            format_timestamp(&marker.created, self.zone),
            format_timestamp(&marker.updated, self.zone),
            escape_html(&marker.cell),
        )
    }

    pub fn push(&mut self, marker: &Marker) {
        let statement = format!(
            "    markers.addLayer(L.marker([{:.6}, {:.6}]).bindTooltip({}));\n",
            marker.lat,
            marker.lon,
            script_string(&self.tooltip(marker)),
        );
        self.html.push_str(&statement);
        self.markers += 1;
    }

    /// Number of markers pushed so far.
    pub fn len(&self) -> usize {
        self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers == 0
    }

    pub fn finish(mut self) -> String {
        self.html.push_str(PAGE_END);
        self.html
    }
}

/// Render every marker row of `input`. The first bad row aborts rendering.
pub fn render_map<R: Read>(input: R, zone: TimeZoneMode) -> Result<MapDocument> {
    let mut reader = marker_reader(input);
    let mut doc = MapDocument::new(zone);
    for marker in markers(&mut reader) {
        doc.push(&marker?);
    }
    Ok(doc)
}

/// Render the CSV at `input` into an HTML page at `output`.
///
/// The page is built completely in memory first; `output` is only created
/// once every row has been parsed. Returns the number of markers written.
pub fn render_file(input: &Path, output: &Path, zone: TimeZoneMode) -> anyhow::Result<usize> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("Error opening the input file {}", input.display()))?;
    let doc = render_map(file, zone)
        .with_context(|| format!("Error reading markers from {}", input.display()))?;
    let count = doc.len();

    std::fs::write(output, doc.finish())
        .with_context(|| format!("Error writing the output file {}", output.display()))?;

    info!(
        "{}: rendered {count} markers ({zone} timestamps) to {}",
        input.display(),
        output.display()
    );
    Ok(count)
}
