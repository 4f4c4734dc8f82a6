//! Drag-reposition resolver.
//!
//! A single-pointer state machine: `Idle -> Dragging(item, origin_row) ->
//! Idle`. Exactly one resolver instance exists per grid, and at most one drag
//! is active at a time.
//!
//! # Invariants
//!
//! 1. Cross-row drags are rejected: if the resolved target row differs from
//!    the origin row, the drag is a no-op and the item keeps its position.
//! 2. A resolved move never changes the item's span.
//! 3. The resolved row is clamped to `1..=max_row + 1`, the column to
//!    `1..=columns_for(row)`.
//! 4. Dropping on nothing, or on the dragged item itself, is a no-op.
//!
//! The resolver only decides; committing the move (and requesting
//! persistence) is [`ops::SectionState::commit_drag`](crate::ops::SectionState::commit_drag).

use std::fmt;

use domboard_core::item::{GridItem, ItemId};
use domboard_core::row_config::RowColumnConfig;
use tracing::debug;

use crate::grid::columns_for;

/// What the pointer was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Another placed item; the drop resolves to its coordinates.
    Item(ItemId),
    /// An empty grid slot.
    EmptyCell { row: u32, column: u32 },
}

impl DropTarget {
    /// Parse the `empty-{row}-{column}` placeholder encoding used by the
    /// rendering layer for empty slots.
    #[must_use]
    pub fn from_placeholder(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix("empty-")?;
        let (row, column) = rest.split_once('-')?;
        let row: u32 = row.parse().ok()?;
        let column: u32 = column.parse().ok()?;
        if row == 0 || column == 0 {
            return None;
        }
        Some(Self::EmptyCell { row, column })
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{id}"),
            Self::EmptyCell { row, column } => write!(f, "empty-{row}-{column}"),
        }
    }
}

/// Outcome of a completed drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing to do (no target, self-drop, unknown target, or no active drag).
    NoOp,
    /// The target row differed from the origin row; position unchanged.
    RejectedCrossRow {
        item: ItemId,
        origin_row: u32,
        candidate_row: u32,
    },
    /// Commit the item to the resolved, clamped coordinates (span unchanged).
    Moved { item: ItemId, row: u32, column: u32 },
}

/// Failures starting a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    UnknownItem(ItemId),
    DragInProgress,
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "drag start on unknown item {id}"),
            Self::DragInProgress => write!(f, "a drag is already in progress"),
        }
    }
}

impl std::error::Error for DragError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { item: ItemId, origin_row: u32 },
}

/// The per-grid drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResolver {
    state: DragState,
}

impl Default for DragResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DragResolver {
    /// A resolver in the idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Whether a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin dragging `item`, recording its origin row.
    pub fn drag_start(&mut self, items: &[GridItem], item: ItemId) -> Result<(), DragError> {
        if self.is_dragging() {
            return Err(DragError::DragInProgress);
        }
        let Some(found) = items.iter().find(|candidate| candidate.id() == item) else {
            return Err(DragError::UnknownItem(item));
        };
        self.state = DragState::Dragging {
            item,
            origin_row: found.row(),
        };
        Ok(())
    }

    /// Finish the drag, resolving `over` against the current grid state.
    ///
    /// Always returns to idle; the outcome tells the caller whether and where
    /// to commit.
    pub fn drag_end(
        &mut self,
        items: &[GridItem],
        config: &RowColumnConfig,
        over: Option<DropTarget>,
    ) -> DragOutcome {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let DragState::Dragging { item, origin_row } = state else {
            debug!("drag end without an active drag");
            return DragOutcome::NoOp;
        };

        let Some(target) = over else {
            return DragOutcome::NoOp;
        };
        if matches!(target, DropTarget::Item(id) if id == item) {
            return DragOutcome::NoOp;
        }

        let (candidate_row, candidate_column) = match target {
            DropTarget::Item(id) => {
                match items.iter().find(|candidate| candidate.id() == id) {
                    Some(found) => (found.placement().row, found.placement().column),
                    None => {
                        debug!(target = %id, "drop target no longer exists");
                        return DragOutcome::NoOp;
                    }
                }
            }
            DropTarget::EmptyCell { row, column } => (row, column),
        };

        if candidate_row != origin_row {
            debug!(
                item = %item,
                origin_row,
                candidate_row,
                "cross-row drag rejected"
            );
            return DragOutcome::RejectedCrossRow {
                item,
                origin_row,
                candidate_row,
            };
        }

        let max_row = config
            .max_row()
            .max(items.iter().map(GridItem::row).max().unwrap_or(0));
        let row = candidate_row.clamp(1, max_row.saturating_add(1));
        let column = candidate_column.clamp(1, columns_for(row, config, items));

        DragOutcome::Moved { item, row, column }
    }

    /// Abort any active drag without emitting an outcome.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domboard_core::item::{GridPlacement, TextCell, TextCellId};

    fn text(id: u64, row: u32, column: u32) -> GridItem {
        GridItem::Text(TextCell {
            id: TextCellId::new(id).unwrap(),
            content: String::new(),
            placement: GridPlacement::new(row, column, 1).unwrap(),
        })
    }

    fn config(entries: &[(u32, u8)]) -> RowColumnConfig {
        let mut config = RowColumnConfig::new();
        for &(row, count) in entries {
            config.set_columns(row, count).unwrap();
        }
        config
    }

    #[test]
    fn placeholder_parsing() {
        assert_eq!(
            DropTarget::from_placeholder("empty-2-4"),
            Some(DropTarget::EmptyCell { row: 2, column: 4 })
        );
        assert_eq!(DropTarget::from_placeholder("empty-0-4"), None);
        assert_eq!(DropTarget::from_placeholder("empty-2"), None);
        assert_eq!(DropTarget::from_placeholder("cell-2-4"), None);
        let target = DropTarget::EmptyCell { row: 2, column: 4 };
        assert_eq!(target.to_string(), "empty-2-4");
    }

    #[test]
    fn cross_row_drag_is_rejected() {
        let items = vec![text(1, 1, 1), text(2, 2, 1)];
        let config = config(&[(1, 3), (2, 3)]);
        let mut resolver = DragResolver::new();

        resolver.drag_start(&items, items[0].id()).unwrap();
        let outcome = resolver.drag_end(&items, &config, Some(DropTarget::Item(items[1].id())));
        assert_eq!(
            outcome,
            DragOutcome::RejectedCrossRow {
                item: items[0].id(),
                origin_row: 1,
                candidate_row: 2,
            }
        );
        assert!(!resolver.is_dragging());
    }

    #[test]
    fn same_row_drop_on_empty_cell_moves() {
        let items = vec![text(1, 1, 1)];
        let config = config(&[(1, 4)]);
        let mut resolver = DragResolver::new();

        resolver.drag_start(&items, items[0].id()).unwrap();
        let outcome = resolver.drag_end(
            &items,
            &config,
            Some(DropTarget::EmptyCell { row: 1, column: 3 }),
        );
        assert_eq!(
            outcome,
            DragOutcome::Moved {
                item: items[0].id(),
                row: 1,
                column: 3,
            }
        );
    }

    #[test]
    fn column_clamps_to_row_width() {
        let items = vec![text(1, 1, 1)];
        let config = config(&[(1, 3)]);
        let mut resolver = DragResolver::new();

        resolver.drag_start(&items, items[0].id()).unwrap();
        let outcome = resolver.drag_end(
            &items,
            &config,
            Some(DropTarget::EmptyCell { row: 1, column: 9 }),
        );
        assert_eq!(
            outcome,
            DragOutcome::Moved {
                item: items[0].id(),
                row: 1,
                column: 3,
            }
        );
    }

    #[test]
    fn row_clamp_saturates_at_numeric_bounds() {
        let items = vec![text(1, u32::MAX, 1)];
        let config = RowColumnConfig::new();
        let mut resolver = DragResolver::new();

        resolver.drag_start(&items, items[0].id()).unwrap();
        let outcome = resolver.drag_end(
            &items,
            &config,
            Some(DropTarget::EmptyCell {
                row: u32::MAX,
                column: 1,
            }),
        );
        assert_eq!(
            outcome,
            DragOutcome::Moved {
                item: items[0].id(),
                row: u32::MAX,
                column: 1,
            }
        );
    }

    #[test]
    fn self_drop_and_missing_target_are_noops() {
        let items = vec![text(1, 1, 1)];
        let config = config(&[(1, 3)]);
        let mut resolver = DragResolver::new();

        resolver.drag_start(&items, items[0].id()).unwrap();
        assert_eq!(
            resolver.drag_end(&items, &config, Some(DropTarget::Item(items[0].id()))),
            DragOutcome::NoOp
        );

        resolver.drag_start(&items, items[0].id()).unwrap();
        assert_eq!(resolver.drag_end(&items, &config, None), DragOutcome::NoOp);
    }

    #[test]
    fn only_one_drag_at_a_time() {
        let items = vec![text(1, 1, 1), text(2, 1, 2)];
        let mut resolver = DragResolver::new();
        resolver.drag_start(&items, items[0].id()).unwrap();
        assert_eq!(
            resolver.drag_start(&items, items[1].id()),
            Err(DragError::DragInProgress)
        );
        resolver.reset();
        assert!(resolver.drag_start(&items, items[1].id()).is_ok());
    }

    #[test]
    fn unknown_item_cannot_start() {
        let items = vec![text(1, 1, 1)];
        let mut resolver = DragResolver::new();
        let ghost = GridItem::Text(TextCell {
            id: TextCellId::new(99).unwrap(),
            content: String::new(),
            placement: GridPlacement::new(1, 1, 1).unwrap(),
        })
        .id();
        assert_eq!(
            resolver.drag_start(&items, ghost),
            Err(DragError::UnknownItem(ghost))
        );
    }
}
