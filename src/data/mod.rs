/// Data layer: decoding, numeric tables, windowing and statistics.
///
/// Architecture:
/// ```text
///  GBK .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode bytes, parse records → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  slice    │  check columns, row bound, window → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  per-column describe
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod slice;
pub mod stats;
