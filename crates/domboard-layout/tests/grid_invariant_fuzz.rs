//! Property-style invariants for the occupancy grid and mutation operations.
//!
//! Random item collections and operation inputs are run against the public
//! API, asserting occupancy consistency, shift round-trips, and the same-row
//! drag rule after each step.

use domboard_core::backend::BackendError;
use domboard_core::item::{
    DataType, GridItem, GridPlacement, ParameterCell, ParameterDefinition, ParameterId, TextCell,
    TextCellId,
};
use domboard_core::row_config::RowColumnConfig;
use domboard_core::ui_state::SectionId;
use domboard_layout::{
    BackendCommand, Cell, DragOutcome, DragResolver, DropTarget, GridBackend, SectionGrid,
    SectionState, columns_for,
};
use proptest::prelude::*;

/// Backend that accepts everything.
#[derive(Default)]
struct AcceptAll;

impl GridBackend for AcceptAll {
    fn apply(&mut self, _command: &BackendCommand) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Backend that fails every call after the first `ok` ones.
struct FailAfter {
    ok: usize,
    calls: usize,
}

impl GridBackend for FailAfter {
    fn apply(&mut self, _command: &BackendCommand) -> Result<(), BackendError> {
        self.calls += 1;
        if self.calls > self.ok {
            Err(BackendError::new("injected failure"))
        } else {
            Ok(())
        }
    }
}

fn parameter(id: u64, row: u32, column: u32, span: u32) -> GridItem {
    GridItem::Parameter(ParameterCell {
        id: ParameterId::new(id).unwrap(),
        definition: ParameterDefinition {
            name: format!("p{id}"),
            code: format!("p{id}"),
            data_type: DataType::Decimal,
            unit: None,
            is_calculated: false,
        },
        is_required: false,
        placement: GridPlacement::new(row, column, span).unwrap(),
    })
}

fn text(id: u64, row: u32, column: u32, span: u32) -> GridItem {
    GridItem::Text(TextCell {
        id: TextCellId::new(id).unwrap(),
        content: format!("t{id}"),
        placement: GridPlacement::new(row, column, span).unwrap(),
    })
}

/// Raw placements: rows 1..=4, columns 1..=8, spans 1..=3. Overlaps allowed;
/// the builder must stay consistent regardless.
fn arb_items() -> impl Strategy<Value = Vec<GridItem>> {
    prop::collection::vec(
        (1u32..=4, 1u32..=8, 1u32..=3, prop::bool::ANY),
        0..12,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(index, (row, column, span, is_text))| {
                let id = index as u64 + 1;
                if is_text {
                    text(id, row, column, span)
                } else {
                    parameter(id, row, column, span)
                }
            })
            .collect()
    })
}

fn arb_config() -> impl Strategy<Value = RowColumnConfig> {
    prop::collection::vec((1u32..=4, 1u8..=8), 0..4).prop_map(|entries| {
        let mut config = RowColumnConfig::new();
        for (row, count) in entries {
            config.set_columns(row, count).unwrap();
        }
        config
    })
}

fn find(items: &[GridItem], id: domboard_core::item::ItemId) -> Option<&GridItem> {
    items.iter().find(|item| item.id() == id)
}

proptest! {
    /// Every anchor and covered cell traces back to an item whose placement
    /// actually reaches that coordinate.
    #[test]
    fn grid_cells_are_consistent_with_items(items in arb_items(), config in arb_config()) {
        let grid = SectionGrid::build(&items, &config);

        for (row, cells) in grid.rows() {
            for (index, cell) in cells.iter().enumerate() {
                let column = index as u32 + 1;
                match cell {
                    Cell::Empty => {}
                    Cell::Item(id) => {
                        let item = find(&items, *id).expect("anchor refers to a real item");
                        prop_assert_eq!(item.placement().row, row);
                        prop_assert_eq!(item.placement().column, column);
                    }
                    Cell::Covered { by } => {
                        let item = find(&items, *by).expect("cover refers to a real item");
                        let placement = item.placement();
                        prop_assert_eq!(placement.row, row);
                        prop_assert!(column > placement.column);
                        prop_assert!(column <= placement.span_end());
                    }
                }
            }
        }
    }

    /// Rebuilding from unchanged state yields the same grid.
    #[test]
    fn build_is_deterministic(items in arb_items(), config in arb_config()) {
        let first = SectionGrid::build(&items, &config);
        let second = SectionGrid::build(&items, &config);
        prop_assert_eq!(first, second);
    }

    /// Inserting a row and deleting it again restores items and config.
    #[test]
    fn insert_then_delete_round_trips(
        items in arb_items(),
        config in arb_config(),
        target in 1u32..=5,
    ) {
        let mut state = SectionState::new(SectionId::new(1), items, config);
        let original = state.clone();
        let mut backend = AcceptAll;

        state.insert_row_before(target, &mut backend).unwrap();
        state.delete_row(target, &mut backend).unwrap();
        prop_assert_eq!(state, original);
    }

    /// A cross-row drop never moves the item.
    #[test]
    fn cross_row_drag_never_moves(
        items in arb_items(),
        config in arb_config(),
        drag_index in 0usize..12,
        target_row in 1u32..=6,
        target_column in 1u32..=8,
    ) {
        prop_assume!(!items.is_empty());
        let drag_index = drag_index % items.len();
        let dragged = items[drag_index].id();
        let origin_row = items[drag_index].row();
        prop_assume!(target_row != origin_row);

        let mut state = SectionState::new(SectionId::new(1), items, config);
        let before = state.clone();
        let mut resolver = DragResolver::new();
        let mut backend = AcceptAll;

        resolver.drag_start(state.items(), dragged).unwrap();
        let outcome = resolver.drag_end(
            state.items(),
            state.row_columns(),
            Some(DropTarget::EmptyCell { row: target_row, column: target_column }),
        );
        let rejected_cross_row = matches!(outcome, DragOutcome::RejectedCrossRow { .. });
        prop_assert!(rejected_cross_row);
        state.commit_drag(outcome, &mut backend).unwrap();
        prop_assert_eq!(state, before);
    }

    /// Same-row moves land within grid bounds.
    #[test]
    fn resolved_moves_are_in_bounds(
        items in arb_items(),
        config in arb_config(),
        drag_index in 0usize..12,
        target_column in 1u32..=20,
    ) {
        prop_assume!(!items.is_empty());
        let drag_index = drag_index % items.len();
        let dragged = items[drag_index].id();
        let origin_row = items[drag_index].row();

        let mut resolver = DragResolver::new();
        resolver.drag_start(&items, dragged).unwrap();
        let outcome = resolver.drag_end(
            &items,
            &config,
            Some(DropTarget::EmptyCell { row: origin_row, column: target_column }),
        );

        match outcome {
            DragOutcome::Moved { row, column, .. } => {
                prop_assert_eq!(row, origin_row);
                prop_assert!(column >= 1);
                prop_assert!(column <= columns_for(row, &config, &items));
            }
            DragOutcome::NoOp => {}
            DragOutcome::RejectedCrossRow { .. } => {
                prop_assert!(false, "same-row drop must not be rejected");
            }
        }
    }

    /// A backend failure partway through a compound operation leaves the
    /// section exactly as it was.
    #[test]
    fn partial_failure_restores_state(
        items in arb_items(),
        config in arb_config(),
        target in 1u32..=5,
        ok in 0usize..4,
    ) {
        let mut state = SectionState::new(SectionId::new(1), items, config);
        let before = state.clone();
        let mut backend = FailAfter { ok, calls: 0 };

        if state.insert_row_before(target, &mut backend).is_err() {
            prop_assert_eq!(state, before);
        }
    }
}
