//! Occupancy grid builder.
//!
//! Converts the flat item list plus the row config into a dense row-major
//! matrix for rendering. The matrix is derived state: callers rebuild it
//! whenever items, row config, or the derived max row change, and never
//! mutate it in place.
//!
//! # Placement policy
//!
//! Two passes. Parameters are placed first and never displace an already
//! placed parameter. Text cells are placed second and unconditionally
//! overwrite whatever sits at their coordinate (they are layout/label
//! elements with visual priority). Overwrites are logged as conflicts so the
//! policy is observable instead of silent.
//!
//! # Invariants
//!
//! 1. For an in-bounds item, `[column, span_end]` on its row is the item at
//!    `column` and [`Cell::Covered`] at the rest; no cell outside the range
//!    is touched by that item.
//! 2. Spans running past the row width are clipped, never wrapped.
//! 3. Items whose row or column is out of bounds are skipped entirely.

use domboard_core::item::{GridItem, ItemId};
use domboard_core::row_config::RowColumnConfig;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Cap on the column count derived from item spans when a row has no
/// configured width.
pub const MAX_FALLBACK_COLUMNS: u32 = 5;

/// One rendering slot of the occupancy matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Nothing here; renders as an empty drop target.
    Empty,
    /// An item's anchor cell.
    Item(ItemId),
    /// Covered by a spanning item to its left; renders as nothing.
    Covered { by: ItemId },
}

impl Cell {
    /// Whether the cell holds an item anchor.
    #[must_use]
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }
}

/// Effective column count for `row`: the configured value if present, else
/// the widest span end among items on the row, clamped to
/// `1..=`[`MAX_FALLBACK_COLUMNS`].
#[must_use]
pub fn columns_for(row: u32, config: &RowColumnConfig, items: &[GridItem]) -> u32 {
    if let Some(count) = config.columns(row) {
        return u32::from(count);
    }
    let widest = items
        .iter()
        .filter(|item| item.row() == row)
        .map(|item| item.placement().span_end())
        .max()
        .unwrap_or(1);
    widest.clamp(1, MAX_FALLBACK_COLUMNS)
}

/// Dense row×column occupancy matrix for one section.
///
/// Rows and columns are 1-based, matching the stored item coordinates. Row
/// widths may differ per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGrid {
    rows: Vec<Vec<Cell>>,
}

impl SectionGrid {
    /// Build the matrix from the authoritative collections.
    ///
    /// `max_row` is derived from the config keys and item rows; a section
    /// with neither renders empty.
    #[must_use]
    pub fn build(items: &[GridItem], config: &RowColumnConfig) -> Self {
        let max_row = config
            .max_row()
            .max(items.iter().map(GridItem::row).max().unwrap_or(0));

        // Per-row fallback widths are span-derived; compute them once.
        let mut widths: FxHashMap<u32, u32> = FxHashMap::default();
        for row in 1..=max_row {
            widths.insert(row, columns_for(row, config, items));
        }

        let mut rows: Vec<Vec<Cell>> = (1..=max_row)
            .map(|row| vec![Cell::Empty; widths[&row] as usize])
            .collect();

        for item in items.iter().filter(|item| !item.is_text()) {
            place(&mut rows, item, false);
        }
        for item in items.iter().filter(|item| item.is_text()) {
            place(&mut rows, item, true);
        }

        Self { rows }
    }

    /// Cell at 1-based `(row, column)`, if in bounds.
    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> Option<&Cell> {
        if row == 0 || column == 0 {
            return None;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|cells| cells.get(column as usize - 1))
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub fn max_row(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Width of 1-based `row`, or 0 when out of bounds.
    #[must_use]
    pub fn width_of(&self, row: u32) -> u32 {
        if row == 0 {
            return 0;
        }
        self.rows
            .get(row as usize - 1)
            .map(|cells| cells.len() as u32)
            .unwrap_or(0)
    }

    /// Whether the section renders empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows as `(row_number, cells)` in order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &[Cell])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, cells)| (index as u32 + 1, cells.as_slice()))
    }
}

fn place(rows: &mut [Vec<Cell>], item: &GridItem, overwrite: bool) {
    let id = item.id();
    let placement = item.placement();
    if placement.validate().is_err() {
        warn!(item = %id, ?placement, "item with invalid placement, skipped");
        return;
    }
    let Some(cells) = rows.get_mut(placement.row as usize - 1) else {
        debug!(item = %id, row = placement.row, "item row outside grid, skipped");
        return;
    };
    let width = cells.len() as u32;
    if placement.column > width {
        debug!(item = %id, column = placement.column, width, "item column outside row, skipped");
        return;
    }

    let anchor = &mut cells[placement.column as usize - 1];
    match *anchor {
        Cell::Empty => *anchor = Cell::Item(id),
        Cell::Item(existing) if existing == id => {
            // Idempotent re-placement.
        }
        Cell::Item(existing) | Cell::Covered { by: existing } => {
            if overwrite {
                warn!(
                    winner = %id,
                    displaced = %existing,
                    row = placement.row,
                    column = placement.column,
                    "text cell overwrote an occupied grid cell"
                );
                *anchor = Cell::Item(id);
            } else {
                warn!(
                    item = %id,
                    occupant = %existing,
                    row = placement.row,
                    column = placement.column,
                    "parameter placement conflicts with occupied cell, skipped"
                );
                return;
            }
        }
    }

    // Mark the rest of the span, clipped to the row width.
    let end = placement.span_end().min(width);
    for column in placement.column + 1..=end {
        let cell = &mut cells[column as usize - 1];
        if let Cell::Item(existing) = *cell {
            warn!(
                spanning = %id,
                displaced = %existing,
                row = placement.row,
                column,
                "span covered an anchored item"
            );
        }
        *cell = Cell::Covered { by: id };
    }
}
