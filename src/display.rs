//! 端末向けの表示
//!
//! 表・件数・取得時刻・プラットフォーム一覧を文字列にする。
//! 出力先（stdout）への書き込みは呼び出し側で行う。

use chrono::Local;
use vehicle_dashboard_common::{
    DerivedView, PlatformScope, PlatformTable, SelectionSet, SortDirection, SortState,
    VehicleField,
};

use crate::error::Result;

/// 値がないセルの表示
const EMPTY_CELL: &str = "-";

/// 1セルの最大表示幅
const MAX_CELL_WIDTH: usize = 24;

/// 列見出し（ソート中の列には矢印を付ける）
fn header_label(field: VehicleField, sort: Option<SortState>) -> String {
    match sort {
        Some(s) if s.field == field => {
            let arrow = match s.direction {
                SortDirection::Ascending => "▲",
                SortDirection::Descending => "▼",
            };
            format!("{} {}", field.label(), arrow)
        }
        _ => field.label().to_string(),
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{}{}", value, " ".repeat(width.saturating_sub(len)))
}

/// ビューを表にする
///
/// # Arguments
/// * `view` - 導出ビュー
/// * `sort` - 見出しに表示するソート状態
/// * `selection` - 渡した場合は先頭に選択欄を付ける
pub fn render_table(
    view: &DerivedView<'_>,
    sort: Option<SortState>,
    selection: Option<&SelectionSet>,
) -> String {
    let fields = VehicleField::ALL;

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(view.len() + 1);
    let mut header = vec!["#".to_string()];
    if selection.is_some() {
        header.insert(0, "[ ]".to_string());
    }
    header.extend(fields.iter().map(|f| header_label(*f, sort)));
    rows.push(header);

    for (position, record) in view.records().iter().enumerate() {
        let mut row = vec![position.to_string()];
        if let Some(selection) = selection {
            let mark = if selection.is_selected(position) { "[x]" } else { "[ ]" };
            row.insert(0, mark.to_string());
        }
        row.extend(
            fields
                .iter()
                .map(|f| truncate(record.get(*f).unwrap_or(EMPTY_CELL), MAX_CELL_WIDTH)),
        );
        rows.push(row);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let line: Vec<String> = row.iter().zip(&widths).map(|(v, w)| pad(v, *w)).collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
        if index == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("  "));
            out.push('\n');
        }
    }

    if view.is_empty() {
        out.push_str("No vehicles found\n");
    }
    out
}

/// 件数行（選択数付き）
pub fn render_summary(view: &DerivedView<'_>, selected: usize) -> String {
    if selected > 0 {
        format!("{} ({} selected)", view.summary(), selected)
    } else {
        view.summary()
    }
}

/// 取得時刻の行
pub fn fetched_at_line(table: &PlatformTable, scope: &PlatformScope) -> String {
    format!(
        "Fetched {} at {}",
        table.label(scope),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// プラットフォーム一覧
pub fn render_platforms(table: &PlatformTable) -> String {
    let mut out = format!("Base URL: {}\n", table.base_url);
    for (scope, label) in table.options() {
        out.push_str(&format!("  {:<12} {:<14} {}\n", scope.id(), label, table.endpoint(&scope)));
    }
    out
}

/// ビューをJSON配列にする（列順はペイロードどおり）
pub fn render_json(view: &DerivedView<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(view.records())?)
}
