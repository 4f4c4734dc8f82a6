//! Per-section row → column-count store.
//!
//! The store only moves keys around; shifting the rows of the items that live
//! on those rows is the layout crate's companion step, applied atomically
//! with the key shift from the caller's point of view.
//!
//! # Invariants
//!
//! 1. Row keys are `>= 1`.
//! 2. Column counts are in `1..=8` ([`MAX_COLUMN_COUNT`]).
//! 3. Insert/delete shift every key past the target by exactly one, never
//!    colliding (keys stay unique because the shift is applied to the whole
//!    tail at once).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Column count assigned to freshly inserted rows.
pub const DEFAULT_ROW_COLUMNS: u8 = 3;

/// Upper bound the admin UI offers for a row's column count.
pub const MAX_COLUMN_COUNT: u8 = 8;

/// Mapping from row number to column count for one section.
///
/// Rows without an entry fall back to a width derived from the items actually
/// on the row (the layout crate's `columns_for`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowColumnConfig {
    rows: BTreeMap<u32, u8>,
}

impl RowColumnConfig {
    /// Empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configured column count for `row`, if any.
    #[must_use]
    pub fn columns(&self, row: u32) -> Option<u8> {
        self.rows.get(&row).copied()
    }

    /// Highest configured row, or 0 when empty.
    #[must_use]
    pub fn max_row(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    /// Number of configured rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate entries in ascending row order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.rows.iter().map(|(&row, &count)| (row, count))
    }

    /// Upsert the column count for `row`.
    pub fn set_columns(&mut self, row: u32, count: u8) -> Result<(), RowConfigError> {
        if row == 0 {
            return Err(RowConfigError::ZeroRow);
        }
        if count == 0 || count > MAX_COLUMN_COUNT {
            return Err(RowConfigError::ColumnCountOutOfRange { count });
        }
        self.rows.insert(row, count);
        Ok(())
    }

    /// Insert a fresh default-width row at `target`, shifting keys `>= target` up.
    pub fn insert_before(&mut self, target: u32) -> Result<(), RowConfigError> {
        if target == 0 {
            return Err(RowConfigError::ZeroRow);
        }
        self.shift_up_from(target);
        self.rows.insert(target, DEFAULT_ROW_COLUMNS);
        Ok(())
    }

    /// Insert a fresh default-width row at `target + 1`, shifting keys `> target` up.
    pub fn insert_after(&mut self, target: u32) -> Result<(), RowConfigError> {
        if target == 0 {
            return Err(RowConfigError::ZeroRow);
        }
        self.shift_up_from(target + 1);
        self.rows.insert(target + 1, DEFAULT_ROW_COLUMNS);
        Ok(())
    }

    /// Remove the entry at `target` and shift keys `> target` down.
    pub fn delete(&mut self, target: u32) -> Result<(), RowConfigError> {
        if target == 0 {
            return Err(RowConfigError::ZeroRow);
        }
        self.rows.remove(&target);
        self.rows = self
            .rows
            .iter()
            .map(|(&row, &count)| (if row > target { row - 1 } else { row }, count))
            .collect();
        Ok(())
    }

    fn shift_up_from(&mut self, target: u32) {
        self.rows = self
            .rows
            .iter()
            .map(|(&row, &count)| (if row >= target { row + 1 } else { row }, count))
            .collect();
    }
}

/// Validation failures for row-config mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowConfigError {
    ZeroRow,
    ColumnCountOutOfRange { count: u8 },
}

impl fmt::Display for RowConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRow => write!(f, "row 0 is invalid (rows are 1-based)"),
            Self::ColumnCountOutOfRange { count } => {
                write!(f, "column count {count} outside 1..={MAX_COLUMN_COUNT}")
            }
        }
    }
}

impl std::error::Error for RowConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(entries: &[(u32, u8)]) -> RowColumnConfig {
        let mut config = RowColumnConfig::new();
        for &(row, count) in entries {
            config.set_columns(row, count).unwrap();
        }
        config
    }

    #[test]
    fn set_columns_validates_range() {
        let mut config = RowColumnConfig::new();
        assert!(config.set_columns(0, 3).is_err());
        assert!(config.set_columns(1, 0).is_err());
        assert!(config.set_columns(1, 9).is_err());
        assert!(config.set_columns(1, 8).is_ok());
        assert_eq!(config.columns(1), Some(8));
    }

    #[test]
    fn insert_before_shifts_tail_and_adds_default() {
        let mut config = config(&[(1, 2), (2, 4), (3, 5)]);
        config.insert_before(2).unwrap();
        assert_eq!(config.columns(1), Some(2));
        assert_eq!(config.columns(2), Some(DEFAULT_ROW_COLUMNS));
        assert_eq!(config.columns(3), Some(4));
        assert_eq!(config.columns(4), Some(5));
        assert_eq!(config.max_row(), 4);
    }

    #[test]
    fn insert_after_leaves_target_in_place() {
        let mut config = config(&[(1, 2), (2, 4)]);
        config.insert_after(1).unwrap();
        assert_eq!(config.columns(1), Some(2));
        assert_eq!(config.columns(2), Some(DEFAULT_ROW_COLUMNS));
        assert_eq!(config.columns(3), Some(4));
    }

    #[test]
    fn delete_shifts_tail_down() {
        let mut config = config(&[(1, 2), (2, 4), (3, 5)]);
        config.delete(2).unwrap();
        assert_eq!(config.columns(1), Some(2));
        assert_eq!(config.columns(2), Some(5));
        assert_eq!(config.columns(3), None);
        assert_eq!(config.max_row(), 2);
    }

    #[test]
    fn delete_of_unconfigured_row_still_shifts() {
        // Rows can exist only through items; deleting such a row must still
        // renumber configured rows past it.
        let mut config = config(&[(1, 2), (3, 5)]);
        config.delete(2).unwrap();
        assert_eq!(config.columns(1), Some(2));
        assert_eq!(config.columns(2), Some(5));
    }

    #[test]
    fn insert_then_delete_round_trips() {
        let original = config(&[(1, 2), (2, 4), (3, 5)]);
        let mut mutated = original.clone();
        mutated.insert_before(2).unwrap();
        mutated.delete(2).unwrap();
        assert_eq!(mutated, original);
    }

    #[test]
    fn max_row_empty_is_zero() {
        assert_eq!(RowColumnConfig::new().max_row(), 0);
    }

    #[test]
    fn serde_round_trip() {
        let config = config(&[(1, 2), (4, 5)]);
        let json = serde_json::to_string(&config).unwrap();
        let back: RowColumnConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_config() -> impl Strategy<Value = RowColumnConfig> {
            prop::collection::vec((1u32..=10, 1u8..=8), 0..8).prop_map(|entries| {
                let mut config = RowColumnConfig::new();
                for (row, count) in entries {
                    config.set_columns(row, count).unwrap();
                }
                config
            })
        }

        proptest! {
            #[test]
            fn insert_before_then_delete_is_identity(
                config in arb_config(),
                target in 1u32..=11,
            ) {
                let mut mutated = config.clone();
                mutated.insert_before(target).unwrap();
                mutated.delete(target).unwrap();
                prop_assert_eq!(mutated, config);
            }

            #[test]
            fn shifts_never_collide_keys(config in arb_config(), target in 1u32..=11) {
                let before = config.len();
                let mut mutated = config;
                mutated.insert_before(target).unwrap();
                // One fresh entry, nothing swallowed by the shift.
                prop_assert_eq!(mutated.len(), before + 1);
            }
        }
    }
}
