/// Data layer: core types, loading, derived columns and filtering.
///
/// Architecture:
/// ```text
///  vehicles_us.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → Vec<Listing>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  manufacturer token, title-cased model
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ListingTable  │  immutable rows, filter options
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterState → filtered indices
///   └──────────┘
/// ```

pub mod derive;
pub mod filter;
pub mod loader;
pub mod model;
