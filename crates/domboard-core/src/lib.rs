#![forbid(unsafe_code)]

//! Data model for DOM permit-form grids.
//!
//! This crate holds the types shared by the layout and surface crates:
//!
//! - [`item`]: positioned grid items (parameters and text cells) as an
//!   explicit tagged union, with newtype identifiers.
//! - [`row_config`]: the per-section row → column-count store and its
//!   shift operations.
//! - [`ui_state`]: the explicit per-section UI context (expand/collapse,
//!   view/edit mode) owned by the top-level controller.
//! - [`backend`]: the shared collaborator error shape.

pub mod backend;
pub mod item;
pub mod row_config;
pub mod ui_state;

pub use backend::BackendError;
pub use item::{
    DataType, GridItem, GridPlacement, ItemId, ItemModelError, ParameterCell,
    ParameterDefinition, ParameterId, TextCell, TextCellId,
};
pub use row_config::{DEFAULT_ROW_COLUMNS, MAX_COLUMN_COUNT, RowColumnConfig, RowConfigError};
pub use ui_state::{SectionId, SectionMode, SectionUiState};
