//! The útil/común/total surface triple (m²).

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Usable, common, and total surface area in m².
///
/// All three measures are tracked at every aggregation tier. Missing values
/// from the collaborator coerce to 0 at construction
/// ([`SurfaceMeasure::from_parts`]); summation itself never special-cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMeasure {
    pub util: f64,
    pub comun: f64,
    pub total: f64,
}

impl SurfaceMeasure {
    /// The additive identity.
    pub const ZERO: Self = Self {
        util: 0.0,
        comun: 0.0,
        total: 0.0,
    };

    /// Build from known values.
    #[must_use]
    pub const fn new(util: f64, comun: f64, total: f64) -> Self {
        Self { util, comun, total }
    }

    /// Build from optional values, coercing absent ones to 0.
    #[must_use]
    pub fn from_parts(util: Option<f64>, comun: Option<f64>, total: Option<f64>) -> Self {
        Self {
            util: util.unwrap_or(0.0),
            comun: comun.unwrap_or(0.0),
            total: total.unwrap_or(0.0),
        }
    }
}

impl Add for SurfaceMeasure {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            util: self.util + rhs.util,
            comun: self.comun + rhs.comun,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for SurfaceMeasure {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for SurfaceMeasure {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Pure sum reduction over a measure collection. No hidden state: calling
/// twice on unchanged input yields identical results.
#[must_use]
pub fn aggregate<I>(measures: I) -> SurfaceMeasure
where
    I: IntoIterator<Item = SurfaceMeasure>,
{
    measures.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_coerces_none_to_zero() {
        let measure = SurfaceMeasure::from_parts(Some(10.5), None, Some(10.5));
        assert_eq!(measure, SurfaceMeasure::new(10.5, 0.0, 10.5));
    }

    #[test]
    fn aggregate_sums_componentwise() {
        let measures = [
            SurfaceMeasure::new(10.0, 2.0, 12.0),
            SurfaceMeasure::new(5.0, 1.0, 6.0),
        ];
        assert_eq!(aggregate(measures), SurfaceMeasure::new(15.0, 3.0, 18.0));
    }

    #[test]
    fn aggregate_is_idempotent_over_unchanged_input() {
        let measures = vec![
            SurfaceMeasure::new(1.25, 0.5, 1.75),
            SurfaceMeasure::new(3.0, 0.0, 3.0),
        ];
        assert_eq!(aggregate(measures.clone()), aggregate(measures));
    }

    #[test]
    fn empty_input_sums_to_zero() {
        assert_eq!(aggregate(std::iter::empty()), SurfaceMeasure::ZERO);
    }
}
