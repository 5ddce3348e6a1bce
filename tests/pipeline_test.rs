//! 検索・フィルタ・ソート・選択の統合テスト
//!
//! 取得から出力対象の決定までをダッシュボード経由で検証

use serde_json::{json, Value};
use vehicle_dashboard_common::{
    query, Dashboard, ExportError, ExportScope, FilterDimension, PlatformScope, Query,
    SortState, VehicleField, VehicleRecord,
};

fn payload(records: Value) -> Value {
    json!({ "success": [ { "data": { "data": records } } ] })
}

fn scenario_a_records() -> Value {
    json!([
        { "Vehicle no": "A1", "vehicle status": "RUNNING", "Project": "P1", "Company": "C1", "Vehicle name": "Bus" },
        { "Vehicle no": "A2", "vehicle status": "STOPPED", "Project": "P2", "Company": "C1", "Vehicle name": "Car" }
    ])
}

fn loaded(records: Value) -> Dashboard {
    let mut dashboard = Dashboard::default();
    let ticket = dashboard.begin_fetch(PlatformScope::Platform("gp".into()));
    dashboard.complete_fetch(ticket, Ok(payload(records)));
    dashboard
}

fn numbers(dashboard: &Dashboard) -> Vec<String> {
    dashboard
        .view()
        .records()
        .iter()
        .map(|r| r.get(VehicleField::VehicleNo).unwrap_or_default().to_string())
        .collect()
}

fn fleet() -> Vec<VehicleRecord> {
    [
        ("K7", "RUNNING", "P1", "C1", "Bus"),
        ("B2", "STOPPED", "P1", "C2", "Car"),
        ("Z9", "running", "P2", "C1", "Bus"),
        ("M4", "IDLE", "P1", "C1", "bus"),
        ("A1", "Running", "P1", "C1", "Truck"),
    ]
    .iter()
    .map(|(no, status, project, company, name)| {
        VehicleRecord::from_pairs([
            ("Vehicle no", *no),
            ("vehicle status", *status),
            ("Project", *project),
            ("Company", *company),
            ("Vehicle name", *name),
        ])
    })
    .collect()
}

fn view_numbers(records: &[VehicleRecord], q: &Query) -> Vec<String> {
    query::apply(records, q)
        .records()
        .iter()
        .map(|r| r.get(VehicleField::VehicleNo).unwrap_or_default().to_string())
        .collect()
}

// =============================================
// シナリオ
// =============================================

#[test]
fn test_status_filter_any_case() {
    for value in ["running", "RUNNING", "Running"] {
        let mut dashboard = loaded(scenario_a_records());
        dashboard.set_filter(FilterDimension::Status, Some(value.into()));
        assert_eq!(numbers(&dashboard), vec!["A1"]);
    }
}

#[test]
fn test_empty_query_keeps_input_order() {
    let dashboard = loaded(json!([
        { "Vehicle no": "C3" }, { "Vehicle no": "A1" }, { "Vehicle no": "B2" }
    ]));
    assert_eq!(numbers(&dashboard), vec!["C3", "A1", "B2"]);
    assert_eq!(dashboard.view().summary(), "Showing 3 of 3 vehicles");
}

#[test]
fn test_sort_descending_by_vehicle_no() {
    let mut dashboard = loaded(json!([
        { "Vehicle no": "A1" }, { "Vehicle no": "A3" }, { "Vehicle no": "A2" }
    ]));
    dashboard.set_sort(Some(SortState::descending(VehicleField::VehicleNo)));
    assert_eq!(numbers(&dashboard), vec!["A3", "A2", "A1"]);
}

#[test]
fn test_refetch_with_fewer_records_resets_selection() {
    let mut dashboard = loaded(json!([
        { "Vehicle no": "A1" }, { "Vehicle no": "A2" }, { "Vehicle no": "A3" }
    ]));
    dashboard.toggle_all();
    assert_eq!(dashboard.selection().positions(), vec![0, 1, 2]);

    let ticket = dashboard.begin_fetch(PlatformScope::Platform("gp".into()));
    dashboard.complete_fetch(ticket, Ok(payload(json!([ { "Vehicle no": "A9" } ]))));
    assert_eq!(dashboard.selected_count(), 0);
}

#[test]
fn test_export_with_nothing_selected_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = loaded(scenario_a_records());

    let result =
        vehicle_dashboard::export::export_dashboard(&dashboard, ExportScope::Selected, dir.path());
    assert!(matches!(result, Err(vehicle_dashboard::error::DashboardError::NothingSelected)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(dashboard.export_rows(ExportScope::Selected), Err(ExportError::NothingSelected));
}

// =============================================
// 性質
// =============================================

#[test]
fn test_descending_is_reverse_of_ascending_without_ties() {
    let records = fleet();
    let ascending = Query { sort: Some(SortState::ascending(VehicleField::VehicleNo)), ..Default::default() };
    let descending = Query { sort: Some(SortState::descending(VehicleField::VehicleNo)), ..Default::default() };

    let mut reversed = view_numbers(&records, &ascending);
    reversed.reverse();
    assert_eq!(reversed, view_numbers(&records, &descending));
}

#[test]
fn test_search_is_idempotent() {
    let records = fleet();
    for needle in ["b", "BUS", "p1", "run", "zz"] {
        let q = Query { search: needle.into(), ..Default::default() };
        let once: Vec<VehicleRecord> =
            query::apply(&records, &q).records().iter().map(|r| (*r).clone()).collect();
        let twice: Vec<VehicleRecord> =
            query::apply(&once, &q).records().iter().map(|r| (*r).clone()).collect();
        assert_eq!(once, twice, "search {:?}", needle);
    }
}

#[test]
fn test_filters_commute() {
    let records = fleet();
    let assignments = [
        (FilterDimension::Status, "running"),
        (FilterDimension::Company, "c1"),
        (FilterDimension::VehicleType, "BUS"),
    ];

    let mut all_at_once = Query::default();
    for (dimension, value) in assignments {
        all_at_once.filters.set(dimension, Some(value.into()));
    }
    let expected = view_numbers(&records, &all_at_once);
    assert_eq!(expected, vec!["K7", "Z9"]);

    // 1つずつ順に絞り込んでも、どの順序でも同じ結果
    let orders = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];
    for order in orders {
        let mut current = records.clone();
        for index in order {
            let (dimension, value) = assignments[index];
            let mut single = Query::default();
            single.filters.set(dimension, Some(value.into()));
            current = query::apply(&current, &single).records().iter().map(|r| (*r).clone()).collect();
        }
        let got: Vec<String> = current
            .iter()
            .map(|r| r.get(VehicleField::VehicleNo).unwrap_or_default().to_string())
            .collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn test_selection_stays_within_view() {
    let mut dashboard = Dashboard::default();
    dashboard.replace_records(fleet());

    let steps: Vec<Box<dyn Fn(&mut Dashboard)>> = vec![
        Box::new(|d: &mut Dashboard| d.toggle_all()),
        Box::new(|d: &mut Dashboard| d.set_search("p1")),
        Box::new(|d: &mut Dashboard| d.toggle_row(3)),
        Box::new(|d: &mut Dashboard| d.toggle_row(10)),
        Box::new(|d: &mut Dashboard| d.set_filter(FilterDimension::Company, Some("c1".into()))),
        Box::new(|d: &mut Dashboard| d.toggle_all()),
        Box::new(|d: &mut Dashboard| d.sort_by(VehicleField::Status)),
        Box::new(|d: &mut Dashboard| d.reset_filters()),
        Box::new(|d: &mut Dashboard| d.toggle_row(4)),
        Box::new(|d: &mut Dashboard| d.replace_records(Vec::new())),
        Box::new(|d: &mut Dashboard| d.toggle_all()),
    ];

    for step in steps {
        step(&mut dashboard);
        let len = dashboard.view().len();
        assert!(dashboard.selected_count() <= len);
        assert!(dashboard.selection().positions().iter().all(|&p| p < len));
    }
}

#[test]
fn test_reset_leaves_sort_and_selection() {
    let mut dashboard = Dashboard::default();
    dashboard.replace_records(fleet());
    dashboard.sort_by(VehicleField::VehicleNo);
    dashboard.sort_by(VehicleField::VehicleNo);
    dashboard.toggle_row(0);

    dashboard.reset_filters();
    assert_eq!(dashboard.query().sort, Some(SortState::descending(VehicleField::VehicleNo)));
    assert_eq!(dashboard.selection().positions(), vec![0]);
}
