/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  chicago.csv / new_york_city.csv / washington.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, derive month/weekday/hour → TripDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ TripDataset │  Vec<TripRecord> for one city
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  month / weekday predicates → filtered copy
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
