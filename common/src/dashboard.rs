//! ダッシュボードの状態管理
//!
//! レコード・検索語・フィルタ・ソート・選択・ローディング状態をまとめて持ち、
//! 入力が変わるたびにビューを導出し直して選択を同期する。
//!
//! ## 取得の流れ
//! 1. `begin_fetch` でチケットを発行（世代番号を進め、ローディング開始）
//! 2. 取得完了後に `complete_fetch` へチケットと結果を渡す
//! 3. 最新世代のチケットだけが反映され、古い応答は捨てられる

use crate::error::{ExportError, FetchError};
use crate::export::ExportScope;
use crate::normalizer::{normalize_payload, NormalizeReport};
use crate::platform::{PlatformScope, PlatformTable};
use crate::query::{self, DerivedView, FilterDimension, Query, SortState};
use crate::selection::SelectionSet;
use crate::types::{VehicleField, VehicleRecord};
use serde_json::Value;

/// 取得リクエストの識別子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    scope: PlatformScope,
}

impl FetchTicket {
    pub fn scope(&self) -> &PlatformScope {
        &self.scope
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 取得結果を渡したときの扱い
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 反映した
    Applied {
        scope: PlatformScope,
        count: usize,
        report: NormalizeReport,
    },
    /// 取得・解釈に失敗し、0件として反映した
    Failed { scope: PlatformScope, reason: String },
    /// 新しいリクエストがあるため捨てた
    Stale { scope: PlatformScope },
}

/// ダッシュボード全体の状態
#[derive(Debug, Clone)]
pub struct Dashboard {
    platforms: PlatformTable,
    scope: PlatformScope,
    records: Vec<VehicleRecord>,
    query: Query,
    selection: SelectionSet,
    loading: bool,
    generation: u64,
}

impl Dashboard {
    pub fn new(platforms: PlatformTable) -> Self {
        Self {
            platforms,
            scope: PlatformScope::All,
            records: Vec::new(),
            query: Query::default(),
            selection: SelectionSet::default(),
            loading: false,
            generation: 0,
        }
    }

    pub fn platforms(&self) -> &PlatformTable {
        &self.platforms
    }

    /// 現在（最後に要求した）スコープ
    pub fn scope(&self) -> &PlatformScope {
        &self.scope
    }

    /// フィルタ前の全レコード
    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    // =============================================
    // 取得
    // =============================================

    /// スコープ変更に伴う取得を開始する
    pub fn begin_fetch(&mut self, scope: PlatformScope) -> FetchTicket {
        self.generation += 1;
        self.scope = scope.clone();
        self.loading = true;
        FetchTicket { generation: self.generation, scope }
    }

    /// 取得結果を反映する
    ///
    /// # Arguments
    /// * `ticket` - `begin_fetch` が返したチケット
    /// * `result` - レスポンスボディ（JSON）または取得エラー
    ///
    /// # Returns
    /// 反映・失敗・破棄のいずれか。失敗時もローディングは解除される。
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Value, FetchError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            return FetchOutcome::Stale { scope: ticket.scope };
        }

        self.loading = false;

        let normalized = result
            .map_err(|e| e.to_string())
            .and_then(|payload| {
                normalize_payload(&payload, &ticket.scope).map_err(|e| e.to_string())
            });

        match normalized {
            Ok(mut report) => {
                self.records = std::mem::take(&mut report.records);
                self.resync_selection();
                FetchOutcome::Applied {
                    scope: ticket.scope,
                    count: self.records.len(),
                    report,
                }
            }
            Err(reason) => {
                self.records.clear();
                self.resync_selection();
                FetchOutcome::Failed { scope: ticket.scope, reason }
            }
        }
    }

    /// 正規化済みレコードを直接差し替える
    pub fn replace_records(&mut self, records: Vec<VehicleRecord>) {
        self.records = records;
        self.resync_selection();
    }

    // =============================================
    // 検索・フィルタ・ソート
    // =============================================

    pub fn set_search(&mut self, search: &str) {
        self.query.search = search.to_string();
        self.resync_selection();
    }

    pub fn set_filter(&mut self, dimension: FilterDimension, value: Option<String>) {
        self.query.filters.set(dimension, value);
        self.resync_selection();
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.query.sort = sort;
        self.resync_selection();
    }

    /// 列ヘッダのクリック
    pub fn sort_by(&mut self, field: VehicleField) {
        let next = query::next_sort(self.query.sort, field);
        self.set_sort(Some(next));
    }

    /// 検索語と4つのフィルタをクリアする（ソート・選択はそのまま）
    pub fn reset_filters(&mut self) {
        self.query.search.clear();
        self.query.filters = Default::default();
        self.resync_selection();
    }

    /// 現在のビュー
    pub fn view(&self) -> DerivedView<'_> {
        query::apply(&self.records, &self.query)
    }

    /// フィルタの選択肢（フィルタ前レコードから）
    pub fn filter_options(&self, dimension: FilterDimension) -> Vec<String> {
        query::filter_options(&self.records, dimension)
    }

    // =============================================
    // 選択
    // =============================================

    pub fn toggle_row(&mut self, position: usize) {
        self.resync_selection();
        self.selection.toggle(position);
    }

    pub fn toggle_all(&mut self) {
        self.resync_selection();
        self.selection.toggle_all();
    }

    pub fn clear_selection(&mut self) {
        self.selection.reset();
    }

    pub fn selected_count(&self) -> usize {
        self.selection.count()
    }

    fn resync_selection(&mut self) {
        let len = self.view().len();
        self.selection.sync(len);
    }

    // =============================================
    // エクスポート
    // =============================================

    /// 出力対象のレコードを集める
    ///
    /// 0件なら `NothingSelected`（シリアライズ前に止める）。
    pub fn export_rows(&self, scope: ExportScope) -> Result<Vec<&VehicleRecord>, ExportError> {
        let view = self.view();
        let rows: Vec<&VehicleRecord> = match scope {
            ExportScope::AllInView => view.into_records(),
            ExportScope::Selected => self
                .selection
                .positions()
                .into_iter()
                .filter_map(|p| view.get(p))
                .collect(),
        };

        if rows.is_empty() {
            return Err(ExportError::NothingSelected);
        }
        Ok(rows)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(PlatformTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(numbers: &[&str]) -> Value {
        let data: Vec<Value> = numbers
            .iter()
            .map(|n| json!({ "Vehicle no": n, "vehicle status": "RUNNING" }))
            .collect();
        json!({ "success": [ { "data": { "data": data } } ] })
    }

    fn loaded(numbers: &[&str]) -> Dashboard {
        let mut dashboard = Dashboard::default();
        let ticket = dashboard.begin_fetch(PlatformScope::Platform("gp".into()));
        dashboard.complete_fetch(ticket, Ok(payload(numbers)));
        dashboard
    }

    fn view_numbers(dashboard: &Dashboard) -> Vec<String> {
        dashboard
            .view()
            .records()
            .iter()
            .map(|r| r.get(VehicleField::VehicleNo).unwrap_or("-").to_string())
            .collect()
    }

    #[test]
    fn test_fetch_applies_and_clears_loading() {
        let mut dashboard = Dashboard::default();
        let ticket = dashboard.begin_fetch(PlatformScope::Platform("gp".into()));
        assert!(dashboard.is_loading());

        let outcome = dashboard.complete_fetch(ticket, Ok(payload(&["A1", "A2"])));
        assert!(matches!(outcome, FetchOutcome::Applied { count: 2, .. }));
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.records().len(), 2);
    }

    #[test]
    fn test_fetch_failure_gives_zero_records() {
        let mut dashboard = loaded(&["A1"]);
        let ticket = dashboard.begin_fetch(PlatformScope::All);

        let outcome = dashboard.complete_fetch(ticket, Err(FetchError::Status(500)));
        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
        assert!(!dashboard.is_loading());
        assert!(dashboard.records().is_empty());
        assert_eq!(dashboard.view().summary(), "Showing 0 of 0 vehicles");
    }

    #[test]
    fn test_malformed_payload_is_failure() {
        let mut dashboard = loaded(&["A1"]);
        let ticket = dashboard.begin_fetch(PlatformScope::All);

        let outcome = dashboard.complete_fetch(ticket, Ok(json!({ "error": "down" })));
        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
        assert!(dashboard.records().is_empty());
        assert!(!dashboard.is_loading());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut dashboard = Dashboard::default();
        let all = dashboard.begin_fetch(PlatformScope::All);
        let coretrack = dashboard.begin_fetch(PlatformScope::Platform("coretrack".into()));

        let first = dashboard.complete_fetch(coretrack, Ok(payload(&["C1"])));
        assert!(matches!(first, FetchOutcome::Applied { count: 1, .. }));

        let late = dashboard.complete_fetch(all, Ok(payload(&["X1", "X2", "X3"])));
        assert_eq!(late, FetchOutcome::Stale { scope: PlatformScope::All });
        assert_eq!(view_numbers(&dashboard), vec!["C1"]);
        assert_eq!(dashboard.scope(), &PlatformScope::Platform("coretrack".into()));
    }

    #[test]
    fn test_stale_failure_does_not_clear_loading() {
        let mut dashboard = Dashboard::default();
        let old = dashboard.begin_fetch(PlatformScope::All);
        let _new = dashboard.begin_fetch(PlatformScope::Platform("gp".into()));

        let outcome = dashboard.complete_fetch(old, Err(FetchError::Network("reset".into())));
        assert!(matches!(outcome, FetchOutcome::Stale { .. }));
        assert!(dashboard.is_loading());
    }

    #[test]
    fn test_query_persists_across_fetch() {
        let mut dashboard = loaded(&["A1", "B2"]);
        dashboard.set_search("b");

        let ticket = dashboard.begin_fetch(PlatformScope::All);
        dashboard.complete_fetch(ticket, Ok(payload(&["B7", "C8"])));
        assert_eq!(dashboard.query().search, "b");
        assert_eq!(view_numbers(&dashboard), vec!["B7"]);
    }

    #[test]
    fn test_selection_resets_when_view_length_changes() {
        let mut dashboard = loaded(&["A1", "A2", "A3"]);
        dashboard.toggle_all();
        assert_eq!(dashboard.selected_count(), 3);

        dashboard.set_search("a2");
        assert_eq!(dashboard.selected_count(), 0);
    }

    #[test]
    fn test_selection_survives_same_length_reorder() {
        let mut dashboard = loaded(&["A1", "A2", "A3"]);
        dashboard.toggle_row(0);

        // 並び替えで件数が変わらないため選択は残り、別のレコードを指す
        dashboard.set_sort(Some(SortState::descending(VehicleField::VehicleNo)));
        assert_eq!(dashboard.selection().positions(), vec![0]);
        let rows = dashboard.export_rows(ExportScope::Selected).unwrap();
        assert_eq!(rows[0].get(VehicleField::VehicleNo), Some("A3"));
    }

    #[test]
    fn test_reset_filters_keeps_sort_and_selection() {
        let mut dashboard = loaded(&["A1", "A2"]);
        dashboard.sort_by(VehicleField::VehicleNo);
        dashboard.set_filter(FilterDimension::Status, Some("running".into()));
        dashboard.toggle_row(1);

        dashboard.reset_filters();
        assert!(dashboard.query().search.is_empty());
        assert!(dashboard.query().filters.is_empty());
        assert_eq!(dashboard.query().sort, Some(SortState::ascending(VehicleField::VehicleNo)));
        assert_eq!(dashboard.selected_count(), 1);
    }

    #[test]
    fn test_export_rows_selected_and_empty() {
        let mut dashboard = loaded(&["A1", "A2", "A3"]);
        assert_eq!(dashboard.export_rows(ExportScope::Selected), Err(ExportError::NothingSelected));

        dashboard.toggle_row(2);
        dashboard.toggle_row(0);
        let rows = dashboard.export_rows(ExportScope::Selected).unwrap();
        let numbers: Vec<_> = rows.iter().map(|r| r.get(VehicleField::VehicleNo).unwrap()).collect();
        assert_eq!(numbers, vec!["A1", "A3"]);

        assert_eq!(dashboard.export_rows(ExportScope::AllInView).unwrap().len(), 3);
    }

    #[test]
    fn test_export_all_in_empty_view() {
        let mut dashboard = loaded(&["A1"]);
        dashboard.set_search("zzz");
        assert_eq!(
            dashboard.export_rows(ExportScope::AllInView),
            Err(ExportError::NothingSelected)
        );
    }

    #[test]
    fn test_filter_options_from_unfiltered_records() {
        let mut dashboard = loaded(&["A1"]);
        dashboard.set_filter(FilterDimension::Status, Some("stopped".into()));
        assert!(dashboard.view().is_empty());
        assert_eq!(dashboard.filter_options(FilterDimension::Status), vec!["RUNNING"]);
    }
}
