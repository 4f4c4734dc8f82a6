//! Positioned grid items: parameters and text cells.
//!
//! Items are modeled as an explicit tagged union ([`GridItem`]) rather than
//! shape-sniffing on field presence. Both variants share a [`GridPlacement`]
//! (1-based row/column plus a column span); parameters additionally carry a
//! [`ParameterDefinition`], text cells carry literal content.
//!
//! # Invariants
//!
//! 1. Identifiers are non-zero (`0` is reserved/invalid, like a null id from
//!    the collaborator backend).
//! 2. `row`, `column`, and `span` are all `>= 1`.
//! 3. An item's span occupies `[column, column + span - 1]` on its row; the
//!    grid builder clips spans that run past the row width.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a parameter placement.
///
/// `0` is reserved/invalid so ids are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterId(u64);

impl ParameterId {
    /// Create a new parameter id, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, ItemModelError> {
        if raw == 0 {
            return Err(ItemModelError::ZeroId { kind: "parameter" });
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Stable identifier for a text cell.
///
/// `0` is reserved/invalid so ids are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextCellId(u64);

impl TextCellId {
    /// Create a new text-cell id, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, ItemModelError> {
        if raw == 0 {
            return Err(ItemModelError::ZeroId { kind: "text cell" });
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Kind-tagged item identifier, used as a grid-cell reference and drag handle.
///
/// Parameter and text-cell ids live in independent namespaces, so the tag is
/// part of the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    Parameter(ParameterId),
    Text(TextCellId),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter(id) => write!(f, "parameter-{}", id.get()),
            Self::Text(id) => write!(f, "text-{}", id.get()),
        }
    }
}

/// Data type of a parameter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Decimal,
    Integer,
    Boolean,
    Text,
    Date,
}

/// Definition a parameter placement is bound to (name, code, unit, flags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub code: String,
    pub data_type: DataType,
    /// Measurement unit, when the data type carries one (e.g. "m²").
    #[serde(default)]
    pub unit: Option<String>,
    /// Whether the value is derived server-side rather than user-entered.
    #[serde(default)]
    pub is_calculated: bool,
}

/// 1-based grid coordinates plus column span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPlacement {
    pub row: u32,
    pub column: u32,
    /// Number of columns occupied starting at `column`. Always `>= 1`.
    pub span: u32,
}

impl GridPlacement {
    /// Create a placement, validating that all fields are `>= 1`.
    pub fn new(row: u32, column: u32, span: u32) -> Result<Self, ItemModelError> {
        let placement = Self { row, column, span };
        placement.validate()?;
        Ok(placement)
    }

    /// Check the 1-based coordinate invariant.
    pub fn validate(self) -> Result<(), ItemModelError> {
        for (field, value) in [("row", self.row), ("column", self.column), ("span", self.span)] {
            if value == 0 {
                return Err(ItemModelError::InvalidPlacement { field, value });
            }
        }
        Ok(())
    }

    /// Last column the placement occupies (`column + span - 1`).
    #[must_use]
    pub const fn span_end(self) -> u32 {
        (self.column + self.span).saturating_sub(1)
    }
}

/// A typed form field placed on a section's grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterCell {
    pub id: ParameterId,
    pub definition: ParameterDefinition,
    /// Display/validation hint; not enforced by the grid itself.
    #[serde(default)]
    pub is_required: bool,
    pub placement: GridPlacement,
}

/// A static label/content block placed on the same grid as parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCell {
    pub id: TextCellId,
    pub content: String,
    pub placement: GridPlacement,
}

/// An item placed on a section's grid.
///
/// The tag is assigned at construction time; there is no field-presence
/// heuristic anywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridItem {
    Parameter(ParameterCell),
    Text(TextCell),
}

impl GridItem {
    /// Kind-tagged identifier of the item.
    #[must_use]
    pub fn id(&self) -> ItemId {
        match self {
            Self::Parameter(cell) => ItemId::Parameter(cell.id),
            Self::Text(cell) => ItemId::Text(cell.id),
        }
    }

    /// The item's grid placement.
    #[must_use]
    pub fn placement(&self) -> GridPlacement {
        match self {
            Self::Parameter(cell) => cell.placement,
            Self::Text(cell) => cell.placement,
        }
    }

    /// Mutable access to the item's grid placement.
    pub fn placement_mut(&mut self) -> &mut GridPlacement {
        match self {
            Self::Parameter(cell) => &mut cell.placement,
            Self::Text(cell) => &mut cell.placement,
        }
    }

    /// Row the item sits on.
    #[must_use]
    pub fn row(&self) -> u32 {
        self.placement().row
    }

    /// Whether this is a text cell.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// Validation failures for item construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemModelError {
    ZeroId { kind: &'static str },
    InvalidPlacement { field: &'static str, value: u32 },
}

impl fmt::Display for ItemModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroId { kind } => write!(f, "{kind} id 0 is invalid"),
            Self::InvalidPlacement { field, value } => {
                write!(f, "grid placement {field} must be >= 1, got {value}")
            }
        }
    }
}

impl std::error::Error for ItemModelError {}
