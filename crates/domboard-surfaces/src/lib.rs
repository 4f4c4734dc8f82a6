#![forbid(unsafe_code)]

//! Surface aggregation for building-permit projects.
//!
//! Totals are pure functions of the current collections, recomputed on every
//! change and never stored as the rendering source of truth:
//!
//! - [`measure`]: the útil/común/total triple and its sum reduction.
//! - [`floor`]: consolidated cross-building floors, partitioned into
//!   below-ground and above-ground subtotals plus a grand total.
//! - [`level`]: per-building levels (roof folds into the above-ground
//!   partition) and the template-based display grouping.
//! - [`polygon`]: surface polygons with derived areas; polygon mutations
//!   recompute the owning level and fire the collaborator's recompute
//!   endpoint without awaiting it.

pub mod floor;
pub mod level;
pub mod measure;
pub mod polygon;

pub use floor::{Floor, FloorId, FloorKind, FloorTotals, display_partitions};
pub use level::{
    BuildingId, Level, LevelId, LevelKind, LevelRow, LevelTotals, group_by_template,
};
pub use measure::{SurfaceMeasure, aggregate};
pub use polygon::{
    PolygonError, PolygonId, PolygonKind, PolygonSet, SurfaceBackend, SurfacePolygon,
    level_measure_from_polygons,
};
