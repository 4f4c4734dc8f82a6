//! Consolidated cross-building floors and their subtotals.

use serde::{Deserialize, Serialize};

use crate::measure::{SurfaceMeasure, aggregate};

/// Stable identifier for a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorId(pub u64);

/// Below-ground (subterráneo) or above-ground (sobre terreno).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorKind {
    Below,
    Above,
}

/// A consolidated floor grouping across buildings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: FloorId,
    pub name: String,
    pub kind: FloorKind,
    /// Display/sort order within the kind partition.
    pub order: i32,
    pub measure: SurfaceMeasure,
}

/// Partitioned floor subtotals plus the grand total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorTotals {
    pub below: SurfaceMeasure,
    pub above: SurfaceMeasure,
    pub general: SurfaceMeasure,
}

impl FloorTotals {
    /// Sum each partition independently; the grand total sums both.
    #[must_use]
    pub fn compute(floors: &[Floor]) -> Self {
        let below = aggregate(
            floors
                .iter()
                .filter(|floor| floor.kind == FloorKind::Below)
                .map(|floor| floor.measure),
        );
        let above = aggregate(
            floors
                .iter()
                .filter(|floor| floor.kind == FloorKind::Above)
                .map(|floor| floor.measure),
        );
        Self {
            below,
            above,
            general: below + above,
        }
    }
}

/// Display order: below-ground floors deepest first, then above-ground
/// ascending. Returns borrowed partitions, already sorted.
#[must_use]
pub fn display_partitions(floors: &[Floor]) -> (Vec<&Floor>, Vec<&Floor>) {
    let mut below: Vec<&Floor> = floors
        .iter()
        .filter(|floor| floor.kind == FloorKind::Below)
        .collect();
    below.sort_by(|a, b| b.order.cmp(&a.order));

    let mut above: Vec<&Floor> = floors
        .iter()
        .filter(|floor| floor.kind == FloorKind::Above)
        .collect();
    above.sort_by(|a, b| a.order.cmp(&b.order));

    (below, above)
}
