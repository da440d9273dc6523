/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  social_media_post_performance.csv  (or synthetic fallback)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read + coerce → PostTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ PostTable  │  immutable snapshot, Vec<PostRecord> + distinct values
///   └───────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ filter / aggregate  │  pure transforms → chart-shaped tables
///   └────────────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
