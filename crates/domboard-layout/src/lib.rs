#![forbid(unsafe_code)]

//! Grid layout for DOM permit-form sections.
//!
//! Three pieces, composed by the surrounding UI:
//!
//! - [`grid`]: derives a dense row×column occupancy matrix from the
//!   authoritative item list and row config. Pure; rebuilt on every change.
//! - [`drag`]: the single-pointer drag-reposition state machine, enforcing
//!   the same-row movement invariant and clamping to grid bounds.
//! - [`ops`]: row and cell mutation operations over a section's state,
//!   issuing persistence commands through the [`backend`] port with a
//!   compensating-action journal for multi-step sequences.

pub mod backend;
pub mod drag;
pub mod grid;
pub mod ops;

pub use backend::{BackendCommand, GridBackend, JournalFailure};
pub use drag::{DragError, DragOutcome, DragResolver, DropTarget};
pub use grid::{Cell, MAX_FALLBACK_COLUMNS, SectionGrid, columns_for};
pub use ops::{OpsError, SectionState};
