//! Surface polygons and the per-level derived measure.
//!
//! A polygon's area is `width × length`, halved when `count_as_half` is set
//! (right-triangle measurement); a present, nonzero `manual_total` overrides
//! the computed area entirely. The exact triangulation formula beyond the
//! halving lives server-side.
//!
//! Every polygon mutation recomputes the owning level's derived measure and
//! fires the collaborator's recompute endpoint. That call is fire-and-forget:
//! failures are logged and never block or roll back the local edit.

use std::fmt;

use domboard_core::backend::BackendError;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::level::LevelId;
use crate::measure::SurfaceMeasure;

/// Stable identifier for a surface polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonId(pub u64);

/// Which measure the polygon contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonKind {
    Util,
    Comun,
}

/// A measured surface polygon belonging to a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfacePolygon {
    pub id: PolygonId,
    pub level: LevelId,
    pub name: String,
    pub kind: PolygonKind,
    pub width: f64,
    pub length: f64,
    /// Right-triangle flag: halves the computed area.
    #[serde(default)]
    pub count_as_half: bool,
    /// When present and nonzero, overrides the computed area.
    #[serde(default)]
    pub manual_total: Option<f64>,
}

impl SurfacePolygon {
    /// Derived area in m².
    #[must_use]
    pub fn total(&self) -> f64 {
        if let Some(manual) = self.manual_total {
            if manual != 0.0 {
                return manual;
            }
        }
        let area = self.width * self.length;
        if self.count_as_half { area / 2.0 } else { area }
    }
}

/// Derive a level's measure from its polygons: útil and común sum their
/// respective polygon kinds, total sums both.
#[must_use]
pub fn level_measure_from_polygons(polygons: &[SurfacePolygon]) -> SurfaceMeasure {
    let util: f64 = polygons
        .iter()
        .filter(|polygon| polygon.kind == PolygonKind::Util)
        .map(SurfacePolygon::total)
        .sum();
    let comun: f64 = polygons
        .iter()
        .filter(|polygon| polygon.kind == PolygonKind::Comun)
        .map(SurfacePolygon::total)
        .sum();
    SurfaceMeasure::new(util, comun, util + comun)
}

/// The server-side recompute seam, fired after every polygon mutation.
pub trait SurfaceBackend {
    /// `POST /levels/{id}/recalculate_from_polygons`.
    fn recalculate_level(&mut self, level: LevelId) -> Result<(), BackendError>;
}

/// Failures of polygon mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonError {
    UnknownPolygon(PolygonId),
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPolygon(id) => write!(f, "unknown polygon {}", id.0),
        }
    }
}

impl std::error::Error for PolygonError {}

/// The polygon collection for a project, across levels.
///
/// Mutations return the owning level's freshly derived measure so the UI can
/// update its totals immediately, before the server recompute lands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonSet {
    polygons: Vec<SurfacePolygon>,
}

impl PolygonSet {
    /// Wrap polygons fetched from the collaborator.
    #[must_use]
    pub fn new(polygons: Vec<SurfacePolygon>) -> Self {
        Self { polygons }
    }

    /// All polygons, in insertion order.
    #[must_use]
    pub fn polygons(&self) -> &[SurfacePolygon] {
        &self.polygons
    }

    /// Polygons belonging to `level`.
    pub fn for_level(&self, level: LevelId) -> impl Iterator<Item = &SurfacePolygon> {
        self.polygons
            .iter()
            .filter(move |polygon| polygon.level == level)
    }

    /// Derived measure for `level` from its current polygons.
    #[must_use]
    pub fn level_measure(&self, level: LevelId) -> SurfaceMeasure {
        let polygons: Vec<SurfacePolygon> = self.for_level(level).cloned().collect();
        level_measure_from_polygons(&polygons)
    }

    /// Add a polygon; returns the owning level's recomputed measure.
    pub fn add(
        &mut self,
        polygon: SurfacePolygon,
        backend: &mut dyn SurfaceBackend,
    ) -> SurfaceMeasure {
        let level = polygon.level;
        self.polygons.push(polygon);
        self.recompute_and_notify(level, backend)
    }

    /// Replace the polygon with `updated.id`; returns the owning level's
    /// recomputed measure.
    ///
    /// When the update moves the polygon to another level, the previous
    /// owner lost surface too: both levels are recomputed and notified.
    pub fn update(
        &mut self,
        updated: SurfacePolygon,
        backend: &mut dyn SurfaceBackend,
    ) -> Result<SurfaceMeasure, PolygonError> {
        let Some(existing) = self
            .polygons
            .iter_mut()
            .find(|polygon| polygon.id == updated.id)
        else {
            return Err(PolygonError::UnknownPolygon(updated.id));
        };
        let previous_level = existing.level;
        let level = updated.level;
        *existing = updated;
        if previous_level != level {
            self.recompute_and_notify(previous_level, backend);
        }
        Ok(self.recompute_and_notify(level, backend))
    }

    /// Remove a polygon; returns the owning level's recomputed measure.
    pub fn remove(
        &mut self,
        id: PolygonId,
        backend: &mut dyn SurfaceBackend,
    ) -> Result<SurfaceMeasure, PolygonError> {
        let Some(index) = self.polygons.iter().position(|polygon| polygon.id == id) else {
            return Err(PolygonError::UnknownPolygon(id));
        };
        let level = self.polygons[index].level;
        self.polygons.remove(index);
        Ok(self.recompute_and_notify(level, backend))
    }

    fn recompute_and_notify(
        &self,
        level: LevelId,
        backend: &mut dyn SurfaceBackend,
    ) -> SurfaceMeasure {
        // Fire-and-forget: the UI proceeds with the locally derived measure.
        if let Err(err) = backend.recalculate_level(level) {
            error!(level = level.0, error = %err, "level recompute request failed");
        }
        self.level_measure(level)
    }
}
