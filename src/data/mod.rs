/// Data layer: raw tables, reading, and grouped reduction.
///
/// Architecture:
/// ```text
///  sparse_bullshark_2000.csv   bullshark_2000.csv
///        │                          │
///        ▼                          ▼
///   ┌──────────┐               ┌──────────┐
///   │  loader   │  parse file → SampleTable (position-addressed rows)
///   └──────────┘               └──────────┘
///        │                          │
///        ▼                          ▼
///   ┌───────────┐              ┌───────────┐
///   │ aggregate  │ group mean   │ aggregate  │ overall mean
///   └───────────┘              └───────────┘
///        │                          │
///        ▼                          ▼
///   AggregatedSeries            f64 (baseline)
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
