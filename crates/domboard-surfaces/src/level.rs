//! Per-building levels, their subtotals, and the template display grouping.

use serde::{Deserialize, Serialize};

use crate::measure::{SurfaceMeasure, aggregate};

/// Stable identifier for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub u64);

/// Stable identifier for the building a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(pub u64);

/// Level classification. Roofs count toward the above-ground partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Below,
    Above,
    Roof,
}

impl LevelKind {
    /// Whether the level counts toward the below-ground subtotal.
    #[must_use]
    pub fn is_below(self) -> bool {
        matches!(self, Self::Below)
    }
}

/// A level of a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub building: BuildingId,
    pub name: String,
    pub kind: LevelKind,
    /// Display/sort order within the kind partition.
    pub order: i32,
    pub measure: SurfaceMeasure,
    /// Another level this one repeats; repeated levels are grouped for
    /// display under their template.
    #[serde(default)]
    pub template: Option<LevelId>,
}

/// Partitioned level subtotals plus the grand total.
///
/// `Roof` levels fold into the above-ground partition for totals purposes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelTotals {
    pub below: SurfaceMeasure,
    pub above: SurfaceMeasure,
    pub general: SurfaceMeasure,
}

impl LevelTotals {
    /// Sum each partition independently; the grand total sums both.
    #[must_use]
    pub fn compute(levels: &[Level]) -> Self {
        let below = aggregate(
            levels
                .iter()
                .filter(|level| level.kind.is_below())
                .map(|level| level.measure),
        );
        let above = aggregate(
            levels
                .iter()
                .filter(|level| !level.kind.is_below())
                .map(|level| level.measure),
        );
        Self {
            below,
            above,
            general: below + above,
        }
    }
}

/// One display row of the level list.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelRow<'a> {
    /// A level with no template relationship.
    Single(&'a Level),
    /// A template level with the levels repeating it, listed beneath an
    /// expandable row.
    Group {
        template: &'a Level,
        members: Vec<&'a Level>,
    },
}

impl LevelRow<'_> {
    /// The measure shown on the row.
    ///
    /// Display-only semantics: a group shows its template level's own
    /// measure, not a sum over the members.
    #[must_use]
    pub fn shown_measure(&self) -> SurfaceMeasure {
        match self {
            Self::Single(level) => level.measure,
            Self::Group { template, .. } => template.measure,
        }
    }
}

/// Group levels for display: levels sharing a template collapse under one
/// expandable row headed by the template level.
///
/// Only levels without a template of their own head groups. A level whose
/// template is missing from the collection, references itself, or is not a
/// group head falls back to a standalone row, so every level surfaces
/// exactly once. Input order is preserved.
#[must_use]
pub fn group_by_template(levels: &[Level]) -> Vec<LevelRow<'_>> {
    let is_group_head = |id: LevelId| {
        levels
            .iter()
            .any(|candidate| candidate.id == id && candidate.template.is_none())
    };

    let mut rows = Vec::new();
    for level in levels {
        match level.template {
            // Member: surfaces under its template's group row.
            Some(template_id) if template_id != level.id && is_group_head(template_id) => {}
            // Self-reference or missing/non-head template: standalone.
            Some(_) => rows.push(LevelRow::Single(level)),
            None => {
                let members: Vec<&Level> = levels
                    .iter()
                    .filter(|candidate| candidate.template == Some(level.id))
                    .collect();
                if members.is_empty() {
                    rows.push(LevelRow::Single(level));
                } else {
                    rows.push(LevelRow::Group {
                        template: level,
                        members,
                    });
                }
            }
        }
    }
    rows
}
