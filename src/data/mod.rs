/// Data layer: cell rows in, filtered rows or map markers out.
///
/// Architecture:
/// ```text
///   cell export .csv
///        │
///        ├────────────────────┐
///        ▼                    ▼
///   ┌──────────┐        ┌──────────┐
///   │  filter   │        │  loader   │  positional rows → Marker
///   └──────────┘        └──────────┘
///        │ header → column positions,      │
///        │ predicate, projection           ▼
///        ▼                           render::MapDocument
///   filtered .csv
/// ```
///
/// `sample` produces synthetic exports in the same layout.

pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
