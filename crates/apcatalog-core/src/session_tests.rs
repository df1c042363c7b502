//! Tests for `session` module

use super::session::*;
use crate::catalog::ColumnCatalog;
use crate::error::Error;
use crate::preferences::ColumnPreferences;
use crate::selection::{ToggleOutcome, CAPACITY_NOTICE};
use crate::sort::{SortDirection, SortSpec};
use std::collections::BTreeSet;

fn initial() -> (SessionState, ColumnCatalog) {
    let catalog = ColumnCatalog::access_points();
    let state = SessionState::new(ColumnPreferences::defaults(&catalog));
    (state, catalog)
}

fn on_page(state: SessionState, page: usize, catalog: &ColumnCatalog) -> SessionState {
    state.apply(Action::GotoPage(page), catalog).unwrap()
}

#[test]
fn test_initial_state() {
    // Arrange & Act
    let (state, _) = initial();

    // Assert
    assert_eq!(state.page, 1);
    assert_eq!(state.per_page, 25);
    assert_eq!(state.view, ViewMode::Table);
    assert!(state.sort.is_none());
    assert!(!state.selection_mode);
    assert!(!state.has_active_filters());
}

#[test]
fn test_search_resets_page() {
    // Arrange
    let (state, catalog) = initial();
    let state = on_page(state, 3, &catalog);

    // Act
    let next = state
        .apply(Action::SetGlobalSearch("cisco".into()), &catalog)
        .unwrap();

    // Assert
    assert_eq!(next.page, 1);
    assert_eq!(next.global_search, "cisco");
    assert!(next.has_active_filters());
}

#[test]
fn test_column_filter_set_and_remove() {
    // Arrange
    let (state, catalog) = initial();
    let state = on_page(state, 2, &catalog);

    // Act
    let filtered = state
        .apply(
            Action::SetColumnFilter {
                key: "vendor".into(),
                search: String::new(),
                selected: BTreeSet::from(["Cisco".to_string()]),
            },
            &catalog,
        )
        .unwrap();
    let cleared = filtered
        .apply(
            Action::SetColumnFilter {
                key: "vendor".into(),
                search: String::new(),
                selected: BTreeSet::new(),
            },
            &catalog,
        )
        .unwrap();

    // Assert
    assert_eq!(filtered.page, 1);
    assert!(filtered.column_filters.contains_key("vendor"));
    assert!(!cleared.column_filters.contains_key("vendor"));
}

#[test]
fn test_column_filter_rejects_unfilterable_column() {
    // Arrange
    let (state, catalog) = initial();

    // Act
    let result = state.apply(
        Action::SetColumnFilter {
            key: "comments".into(),
            search: "x".into(),
            selected: BTreeSet::new(),
        },
        &catalog,
    );

    // Assert
    assert!(matches!(result, Err(Error::ColumnNotFilterable(_))));
}

#[test]
fn test_clear_all_filters() {
    // Arrange
    let (state, catalog) = initial();
    let state = state
        .apply(Action::SetGlobalSearch("x".into()), &catalog)
        .unwrap()
        .apply(
            Action::SetColumnFilter {
                key: "generation".into(),
                search: "7".into(),
                selected: BTreeSet::new(),
            },
            &catalog,
        )
        .unwrap();

    // Act
    let next = state.apply(Action::ClearAllFilters, &catalog).unwrap();

    // Assert
    assert!(next.global_search.is_empty());
    assert!(next.column_filters.is_empty());
    assert!(!next.has_active_filters());
}

#[test]
fn test_sort_by_toggles_and_keeps_page() {
    // Arrange
    let (state, catalog) = initial();
    let state = on_page(state, 2, &catalog);

    // Act
    let once = state.apply(Action::SortBy("vendor".into()), &catalog).unwrap();
    let twice = once.apply(Action::SortBy("vendor".into()), &catalog).unwrap();
    let other = twice.apply(Action::SortBy("model".into()), &catalog).unwrap();

    // Assert
    assert_eq!(once.sort, Some(SortSpec::asc("vendor")));
    assert_eq!(twice.sort.as_ref().map(|s| s.direction), Some(SortDirection::Desc));
    assert_eq!(other.sort, Some(SortSpec::asc("model")));
    assert_eq!(other.page, 2);
}

#[test]
fn test_per_page_validates_and_resets_page() {
    // Arrange
    let (state, catalog) = initial();
    let state = on_page(state, 4, &catalog);

    // Act
    let next = state.apply(Action::SetPerPage(50), &catalog).unwrap();
    let invalid = next.apply(Action::SetPerPage(7), &catalog);

    // Assert
    assert_eq!(next.per_page, 50);
    assert_eq!(next.page, 1);
    assert!(matches!(invalid, Err(Error::InvalidPageSize { size: 7, .. })));
}

#[test]
fn test_navigation_is_noop_at_bounds() {
    // Arrange
    let (state, catalog) = initial();

    // Act
    let prev = state.apply(Action::PrevPage, &catalog).unwrap();
    let next = state.apply(Action::NextPage { total_pages: 3 }, &catalog).unwrap();
    let last = state.apply(Action::LastPage { total_pages: 3 }, &catalog).unwrap();
    let beyond = last.apply(Action::NextPage { total_pages: 3 }, &catalog).unwrap();
    let first = beyond.apply(Action::FirstPage, &catalog).unwrap();
    let empty_last = state.apply(Action::LastPage { total_pages: 0 }, &catalog).unwrap();

    // Assert
    assert_eq!(prev.page, 1);
    assert_eq!(next.page, 2);
    assert_eq!(last.page, 3);
    assert_eq!(beyond.page, 3);
    assert_eq!(first.page, 1);
    assert_eq!(empty_last.page, 1);
}

#[test]
fn test_rejected_toggle_sets_notice() {
    // Arrange
    let (mut state, catalog) = initial();
    for id in ["a", "b", "c", "d"] {
        state = state
            .apply(Action::ToggleSelection(id.into()), &catalog)
            .unwrap();
    }

    // Act
    let rejected = state
        .apply(Action::ToggleSelection("e".into()), &catalog)
        .unwrap();
    let after = rejected.apply(Action::ShowTable, &catalog).unwrap();

    // Assert
    assert_eq!(rejected.last_toggle, Some(ToggleOutcome::Rejected));
    assert_eq!(rejected.notice(), Some(CAPACITY_NOTICE));
    assert_eq!(rejected.selection.len(), 4);
    assert!(after.notice().is_none());
}

#[test]
fn test_deselect_all_exits_selection_mode() {
    // Arrange
    let (state, catalog) = initial();
    let state = state
        .apply(Action::EnterSelectionMode, &catalog)
        .unwrap()
        .apply(Action::ToggleSelection("a".into()), &catalog)
        .unwrap();

    // Act
    let next = state.apply(Action::DeselectAll, &catalog).unwrap();

    // Assert
    assert!(state.selection_mode);
    assert!(next.selection.is_empty());
    assert!(!next.selection_mode);
}

#[test]
fn test_compare_view_switching_and_removal() {
    // Arrange
    let (state, catalog) = initial();
    let state = state
        .apply(Action::ToggleSelection("a".into()), &catalog)
        .unwrap()
        .apply(Action::ToggleSelection("b".into()), &catalog)
        .unwrap();

    // Act
    let compare = state.apply(Action::ShowCompare, &catalog).unwrap();
    let removed = compare
        .apply(Action::RemoveFromComparison("a".into()), &catalog)
        .unwrap();
    let back = removed.apply(Action::ShowTable, &catalog).unwrap();

    // Assert
    assert_eq!(compare.view, ViewMode::Compare);
    assert_eq!(removed.selection.ids().collect::<Vec<_>>(), vec!["b"]);
    assert_eq!(back.view, ViewMode::Table);
}

#[test]
fn test_save_columns_reconciles_order() {
    // Arrange
    let (state, catalog) = initial();

    // Act
    let next = state
        .apply(
            Action::SaveColumns {
                visible: vec!["vendor".into(), "model".into(), "uwb".into()],
                order: vec!["uwb".into(), "model".into(), "vendor".into()],
            },
            &catalog,
        )
        .unwrap();

    // Assert
    assert_eq!(next.preferences.column_order, vec!["vendor", "model", "uwb"]);
    assert_eq!(next.preferences.visible_columns.len(), 3);
}

#[test]
fn test_failed_action_leaves_state_untouched() {
    // Arrange
    let (state, catalog) = initial();
    let before = state.clone();

    // Act
    let result = state.apply(Action::SortBy("nope".into()), &catalog);

    // Assert
    assert!(result.is_err());
    assert_eq!(state, before);
}

#[test]
fn test_with_page_sizes() {
    // Arrange
    let (state, _) = initial();

    // Act
    let ok = state.clone().with_page_sizes(vec![5, 20], 20).unwrap();
    let bad = state.with_page_sizes(vec![5, 20], 25);

    // Assert
    assert_eq!(ok.per_page, 20);
    assert!(matches!(bad, Err(Error::InvalidPageSize { size: 25, .. })));
}

#[test]
fn test_state_serializes_to_json() {
    // Arrange
    let (state, catalog) = initial();
    let state = state.apply(Action::SortBy("vendor".into()), &catalog).unwrap();

    // Act
    let json = serde_json::to_string(&state).unwrap();
    let back: SessionState = serde_json::from_str(&json).unwrap();

    // Assert
    assert_eq!(back, state);
    assert!(json.contains("\"view\":\"table\""));
}
