//! Row and cell mutation operations over a section's authoritative state.
//!
//! [`SectionState`] owns the item list and row config for one section. Every
//! mutation applies in memory first, then issues its persistence commands
//! through the journal; on a mid-sequence backend failure the in-memory
//! state is restored from the pre-operation snapshot and the journal
//! compensates the backend best-effort.
//!
//! Callers re-derive the occupancy grid ([`SectionState::grid`]) after each
//! confirmed mutation; the grid is never patched incrementally.

use std::fmt;

use domboard_core::backend::BackendError;
use domboard_core::item::{
    GridItem, GridPlacement, ItemId, ItemModelError, ParameterId, TextCell, TextCellId,
};
use domboard_core::row_config::{RowColumnConfig, RowConfigError};
use domboard_core::ui_state::SectionId;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::backend::{BackendCommand, GridBackend, JournalFailure, JournalStep, run_journal};
use crate::drag::DragOutcome;
use crate::grid::SectionGrid;

/// Authoritative positioned-item and row-config state for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionState {
    section: SectionId,
    items: Vec<GridItem>,
    row_columns: RowColumnConfig,
}

impl SectionState {
    /// Wrap the collections fetched from the collaborator.
    #[must_use]
    pub fn new(section: SectionId, items: Vec<GridItem>, row_columns: RowColumnConfig) -> Self {
        Self {
            section,
            items,
            row_columns,
        }
    }

    /// The owning section.
    #[must_use]
    pub fn section(&self) -> SectionId {
        self.section
    }

    /// Current items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    /// Current row config.
    #[must_use]
    pub fn row_columns(&self) -> &RowColumnConfig {
        &self.row_columns
    }

    /// Derive a fresh occupancy grid from the current state.
    #[must_use]
    pub fn grid(&self) -> SectionGrid {
        SectionGrid::build(&self.items, &self.row_columns)
    }

    /// Upsert the column count for `row`.
    pub fn set_columns(
        &mut self,
        row: u32,
        count: u8,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        let snapshot = self.clone();
        let inverse = self.config_command();
        self.row_columns.set_columns(row, count)?;
        let steps = vec![JournalStep {
            command: self.config_command(),
            inverse: Some(inverse),
        }];
        self.persist(snapshot, steps, backend)
    }

    /// Insert a fresh default-width row at `target`; rows and items at
    /// `target` and below shift down by one.
    pub fn insert_row_before(
        &mut self,
        target: u32,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        debug!(section = self.section.get(), target, "insert row before");
        let snapshot = self.clone();
        let config_inverse = self.config_command();
        self.row_columns.insert_before(target)?;

        let mut steps = vec![JournalStep {
            command: self.config_command(),
            inverse: Some(config_inverse),
        }];
        steps.extend(self.shift_rows(|row| row >= target, 1));
        self.persist(snapshot, steps, backend)
    }

    /// Insert a fresh default-width row after `target`; rows and items below
    /// it shift down by one.
    pub fn insert_row_after(
        &mut self,
        target: u32,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        debug!(section = self.section.get(), target, "insert row after");
        let snapshot = self.clone();
        let config_inverse = self.config_command();
        self.row_columns.insert_after(target)?;

        let mut steps = vec![JournalStep {
            command: self.config_command(),
            inverse: Some(config_inverse),
        }];
        steps.extend(self.shift_rows(|row| row > target, 1));
        self.persist(snapshot, steps, backend)
    }

    /// Delete `target`: its items are removed, rows below shift up by one.
    ///
    /// Item deletions are issued before the shift, matching the collaborator
    /// call order. Deleted parameters cannot be recreated through this
    /// boundary, so their journal steps carry no inverse.
    pub fn delete_row(
        &mut self,
        target: u32,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        if target == 0 {
            return Err(OpsError::Config(RowConfigError::ZeroRow));
        }
        debug!(section = self.section.get(), target, "delete row");
        let snapshot = self.clone();

        let mut steps = Vec::new();
        let mut kept = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if item.row() == target {
                steps.push(delete_step(&item));
            } else {
                kept.push(item);
            }
        }
        self.items = kept;

        let config_inverse = BackendCommand::UpdateRowColumns {
            section: self.section,
            rows_columns: snapshot.row_columns.clone(),
        };
        self.row_columns.delete(target)?;
        steps.push(JournalStep {
            command: self.config_command(),
            inverse: Some(config_inverse),
        });
        steps.extend(self.shift_rows(|row| row > target, -1));
        self.persist(snapshot, steps, backend)
    }

    /// Place a new text cell on the grid.
    pub fn add_text_cell(
        &mut self,
        cell: TextCell,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        cell.placement.validate()?;
        let id = ItemId::Text(cell.id);
        if self.items.iter().any(|item| item.id() == id) {
            return Err(OpsError::DuplicateItem(id));
        }
        let snapshot = self.clone();
        let steps = vec![JournalStep {
            command: BackendCommand::CreateTextCell {
                id: cell.id,
                row: cell.placement.row,
                column: cell.placement.column,
                span: cell.placement.span,
                content: cell.content.clone(),
            },
            inverse: Some(BackendCommand::DeleteTextCell { id: cell.id }),
        }];
        self.items.push(GridItem::Text(cell));
        self.persist(snapshot, steps, backend)
    }

    /// Update a text cell's content and/or placement (the edit-modal path;
    /// the row may change freely here, unlike drags).
    pub fn edit_text_cell(
        &mut self,
        id: TextCellId,
        content: Option<String>,
        placement: Option<GridPlacement>,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        if let Some(placement) = placement {
            placement.validate()?;
        }
        let item_id = ItemId::Text(id);
        let snapshot = self.clone();
        let Some(GridItem::Text(cell)) = self
            .items
            .iter_mut()
            .find(|item| item.id() == item_id)
        else {
            return Err(OpsError::UnknownItem(item_id));
        };

        let inverse = text_update_command(cell);
        if let Some(content) = content {
            cell.content = content;
        }
        if let Some(placement) = placement {
            cell.placement = placement;
        }
        let steps = vec![JournalStep {
            command: text_update_command(cell),
            inverse: Some(inverse),
        }];
        self.persist(snapshot, steps, backend)
    }

    /// Replace a parameter's full placement, span included (the edit-modal
    /// path; the row may change freely here, unlike drags).
    pub fn edit_parameter_placement(
        &mut self,
        id: ParameterId,
        placement: GridPlacement,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        placement.validate()?;
        let item_id = ItemId::Parameter(id);
        let snapshot = self.clone();
        let Some(GridItem::Parameter(cell)) = self
            .items
            .iter_mut()
            .find(|item| item.id() == item_id)
        else {
            return Err(OpsError::UnknownItem(item_id));
        };

        let inverse = BackendCommand::UpdateParameterPosition {
            id: cell.id,
            row: cell.placement.row,
            column: cell.placement.column,
            span: cell.placement.span,
        };
        cell.placement = placement;
        let steps = vec![JournalStep {
            command: BackendCommand::UpdateParameterPosition {
                id: cell.id,
                row: cell.placement.row,
                column: cell.placement.column,
                span: cell.placement.span,
            },
            inverse: Some(inverse),
        }];
        self.persist(snapshot, steps, backend)
    }

    /// Remove a single item from the grid.
    pub fn delete_cell(
        &mut self,
        id: ItemId,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        let Some(index) = self.items.iter().position(|item| item.id() == id) else {
            return Err(OpsError::UnknownItem(id));
        };
        let snapshot = self.clone();
        let removed = self.items.remove(index);
        let steps = vec![delete_step(&removed)];
        self.persist(snapshot, steps, backend)
    }

    /// Reposition a single item (span unchanged).
    ///
    /// This is the programmatic/modal path: no same-row constraint applies.
    pub fn move_cell(
        &mut self,
        id: ItemId,
        row: u32,
        column: u32,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        let snapshot = self.clone();
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            return Err(OpsError::UnknownItem(id));
        };
        let span = item.placement().span;
        GridPlacement::new(row, column, span)?;

        let inverse = position_command(item);
        {
            let placement = item.placement_mut();
            placement.row = row;
            placement.column = column;
        }
        let steps = vec![JournalStep {
            command: position_command(&*item),
            inverse: Some(inverse),
        }];
        self.persist(snapshot, steps, backend)
    }

    /// Apply a resolved drag. Rejections and no-ops leave state untouched.
    pub fn commit_drag(
        &mut self,
        outcome: DragOutcome,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        match outcome {
            DragOutcome::Moved { item, row, column } => {
                self.move_cell(item, row, column, backend)
            }
            DragOutcome::NoOp | DragOutcome::RejectedCrossRow { .. } => Ok(Vec::new()),
        }
    }

    fn config_command(&self) -> BackendCommand {
        BackendCommand::UpdateRowColumns {
            section: self.section,
            rows_columns: self.row_columns.clone(),
        }
    }

    /// Shift matching items by `delta` rows, emitting one position command
    /// per item (the collaborator has no batch endpoint).
    fn shift_rows(&mut self, matches: impl Fn(u32) -> bool, delta: i32) -> Vec<JournalStep> {
        let mut steps = Vec::new();
        for item in &mut self.items {
            if !matches(item.row()) {
                continue;
            }
            let inverse = position_command(item);
            let placement = item.placement_mut();
            placement.row = placement.row.saturating_add_signed(delta);
            steps.push(JournalStep {
                command: position_command(&*item),
                inverse: Some(inverse),
            });
        }
        steps
    }

    fn persist(
        &mut self,
        snapshot: Self,
        steps: Vec<JournalStep>,
        backend: &mut dyn GridBackend,
    ) -> Result<Vec<BackendCommand>, OpsError> {
        match run_journal(backend, steps) {
            Ok(commands) => Ok(commands),
            Err(failure) => {
                error!(
                    section = self.section.get(),
                    applied = failure.applied,
                    compensated = failure.compensated,
                    uncompensated = failure.uncompensated,
                    error = %failure.error,
                    "mutation failed, in-memory state restored"
                );
                *self = snapshot;
                Err(OpsError::from(failure))
            }
        }
    }
}

fn position_command(item: &GridItem) -> BackendCommand {
    match item {
        GridItem::Parameter(cell) => BackendCommand::UpdateParameterPosition {
            id: cell.id,
            row: cell.placement.row,
            column: cell.placement.column,
            span: cell.placement.span,
        },
        GridItem::Text(cell) => text_update_command(cell),
    }
}

fn text_update_command(cell: &TextCell) -> BackendCommand {
    BackendCommand::UpdateTextCell {
        id: cell.id,
        row: cell.placement.row,
        column: cell.placement.column,
        span: cell.placement.span,
        content: cell.content.clone(),
    }
}

fn delete_step(item: &GridItem) -> JournalStep {
    match item {
        GridItem::Parameter(cell) => JournalStep {
            command: BackendCommand::DeleteParameter { id: cell.id },
            // The collaborator exposes no create-parameter call.
            inverse: None,
        },
        GridItem::Text(cell) => JournalStep {
            command: BackendCommand::DeleteTextCell { id: cell.id },
            inverse: Some(BackendCommand::CreateTextCell {
                id: cell.id,
                row: cell.placement.row,
                column: cell.placement.column,
                span: cell.placement.span,
                content: cell.content.clone(),
            }),
        },
    }
}

/// Failures of mutation operations.
#[derive(Debug)]
pub enum OpsError {
    Config(RowConfigError),
    Item(ItemModelError),
    UnknownItem(ItemId),
    DuplicateItem(ItemId),
    /// A backend call failed partway through a command sequence. In-memory
    /// state was restored; the backend was compensated best-effort.
    PartialFailure {
        applied: usize,
        compensated: usize,
        uncompensated: usize,
        failed: Box<BackendCommand>,
        error: BackendError,
    },
}

impl fmt::Display for OpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "row config: {err}"),
            Self::Item(err) => write!(f, "item: {err}"),
            Self::UnknownItem(id) => write!(f, "unknown item {id}"),
            Self::DuplicateItem(id) => write!(f, "item {id} already placed"),
            Self::PartialFailure {
                applied,
                compensated,
                uncompensated,
                error,
                ..
            } => write!(
                f,
                "backend failed after {applied} step(s) ({compensated} compensated, \
                 {uncompensated} left): {error}"
            ),
        }
    }
}

impl std::error::Error for OpsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Item(err) => Some(err),
            Self::PartialFailure { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<RowConfigError> for OpsError {
    fn from(err: RowConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ItemModelError> for OpsError {
    fn from(err: ItemModelError) -> Self {
        Self::Item(err)
    }
}

impl From<JournalFailure> for OpsError {
    fn from(failure: JournalFailure) -> Self {
        Self::PartialFailure {
            applied: failure.applied,
            compensated: failure.compensated,
            uncompensated: failure.uncompensated,
            failed: Box::new(failure.failed),
            error: failure.error,
        }
    }
}
