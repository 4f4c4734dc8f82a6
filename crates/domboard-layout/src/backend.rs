//! Persistence port and compensating-action journal.
//!
//! The collaborator API is one call per touched entity, so compound
//! operations (row insert/delete) are inherently multi-step. The journal
//! records each successful command together with its inverse; when a step
//! fails, recorded inverses are replayed in reverse order. This is best
//! effort: a compensation can itself fail, and parameter deletions have no
//! inverse at this boundary (the API exposes no create-parameter call). Both
//! cases are logged and counted in the failure report.
//!
//! Commands are attempted once. No retry, no idempotency keys.

use domboard_core::backend::BackendError;
use domboard_core::item::{ParameterId, TextCellId};
use domboard_core::row_config::RowColumnConfig;
use domboard_core::ui_state::SectionId;
use serde::{Deserialize, Serialize};
use tracing::error;

/// One persistence call, mirroring the collaborator's endpoint shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendCommand {
    /// `PATCH /parameter-categories/{id}` — replace the row→columns map.
    UpdateRowColumns {
        section: SectionId,
        rows_columns: RowColumnConfig,
    },
    /// `PATCH /form-parameters/{id}/update_grid_position`.
    UpdateParameterPosition {
        id: ParameterId,
        row: u32,
        column: u32,
        span: u32,
    },
    /// `PATCH /form-grid-cells/{id}`.
    UpdateTextCell {
        id: TextCellId,
        row: u32,
        column: u32,
        span: u32,
        content: String,
    },
    /// `POST /form-grid-cells`.
    CreateTextCell {
        id: TextCellId,
        row: u32,
        column: u32,
        span: u32,
        content: String,
    },
    /// `DELETE /form-grid-cells/{id}`.
    DeleteTextCell { id: TextCellId },
    /// `DELETE /form-parameters/{id}`.
    DeleteParameter { id: ParameterId },
}

/// The persistence collaborator seam.
///
/// Implementations translate commands into network calls; tests swap in an
/// in-memory fake. Synchronous by design: the surrounding event loop runs
/// one operation to completion at a time.
pub trait GridBackend {
    fn apply(&mut self, command: &BackendCommand) -> Result<(), BackendError>;
}

/// A command paired with its inverse, when one exists at this boundary.
#[derive(Debug, Clone)]
pub(crate) struct JournalStep {
    pub command: BackendCommand,
    pub inverse: Option<BackendCommand>,
}

/// Report for a sequence that failed partway.
#[derive(Debug, Clone)]
pub struct JournalFailure {
    /// Commands applied before the failure.
    pub applied: usize,
    /// The command that failed.
    pub failed: BackendCommand,
    /// The backend's error for the failed command.
    pub error: BackendError,
    /// Inverses that were replayed successfully.
    pub compensated: usize,
    /// Applied commands left uncompensated (missing or failed inverse).
    pub uncompensated: usize,
}

/// Run `steps` in order; on failure, replay recorded inverses in reverse.
pub(crate) fn run_journal(
    backend: &mut dyn GridBackend,
    steps: Vec<JournalStep>,
) -> Result<Vec<BackendCommand>, JournalFailure> {
    let mut done: Vec<JournalStep> = Vec::with_capacity(steps.len());

    for step in steps {
        if let Err(err) = backend.apply(&step.command) {
            let applied = done.len();
            let mut compensated = 0;
            let mut uncompensated = 0;
            for recorded in done.into_iter().rev() {
                match recorded.inverse {
                    Some(inverse) => match backend.apply(&inverse) {
                        Ok(()) => compensated += 1,
                        Err(comp_err) => {
                            error!(
                                command = ?inverse,
                                error = %comp_err,
                                "compensation failed, backend state diverged"
                            );
                            uncompensated += 1;
                        }
                    },
                    None => {
                        error!(
                            command = ?recorded.command,
                            "no inverse exists for applied command"
                        );
                        uncompensated += 1;
                    }
                }
            }
            return Err(JournalFailure {
                applied,
                failed: step.command,
                error: err,
                compensated,
                uncompensated,
            });
        }
        done.push(step);
    }

    Ok(done.into_iter().map(|step| step.command).collect())
}
