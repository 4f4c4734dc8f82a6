//! Explicit per-section UI context.
//!
//! Expand/collapse and view/edit mode used to live in ambient browser
//! storage keyed by stringly-typed section ids; here they are an explicit
//! map owned by the top-level controller and keyed by [`SectionId`], so no
//! string/number key coercion can desynchronize lookups.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Identifier of a form section (parameter category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(u64);

impl SectionId {
    /// Wrap a raw section id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Whether a section renders read-only or with admin editing affordances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMode {
    #[default]
    View,
    Editable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SectionEntry {
    expanded: bool,
    mode: SectionMode,
}

/// Per-section UI state map.
///
/// Sections default to collapsed, view mode; entries are created lazily on
/// first write.
#[derive(Debug, Clone, Default)]
pub struct SectionUiState {
    entries: AHashMap<SectionId, SectionEntry>,
}

impl SectionUiState {
    /// Empty state: every section collapsed and in view mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `section` is expanded (default: collapsed).
    #[must_use]
    pub fn is_expanded(&self, section: SectionId) -> bool {
        self.entries.get(&section).map(|e| e.expanded).unwrap_or(false)
    }

    /// Current mode for `section` (default: [`SectionMode::View`]).
    #[must_use]
    pub fn mode(&self, section: SectionId) -> SectionMode {
        self.entries.get(&section).map(|e| e.mode).unwrap_or_default()
    }

    /// Flip the expanded flag, returning the new value.
    pub fn toggle_expanded(&mut self, section: SectionId) -> bool {
        let entry = self.entries.entry(section).or_default();
        entry.expanded = !entry.expanded;
        entry.expanded
    }

    /// Set the expanded flag directly.
    pub fn set_expanded(&mut self, section: SectionId, expanded: bool) {
        self.entries.entry(section).or_default().expanded = expanded;
    }

    /// Switch a section between view and editable mode.
    pub fn set_mode(&mut self, section: SectionId, mode: SectionMode) {
        self.entries.entry(section).or_default().mode = mode;
    }
}
