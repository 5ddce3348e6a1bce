//! 対話式ブラウズモジュール
//!
//! 一覧を表示したまま、検索・絞り込み・ソート・行選択・出力をコマンドで操作する。
//! プラットフォームを変えたときだけ再取得する（同じプラットフォームの指定は無視）。

use crate::display;
use crate::error::{DashboardError, Result};
use crate::export;
use crate::gateway::{self, VehicleSource};
use dialoguer::Input;
use std::path::PathBuf;
use vehicle_dashboard_common::{Dashboard, ExportScope, FilterDimension, PlatformScope, VehicleField};

const HELP: &str = "\
操作:
  p <id|all>          プラットフォーム切替（再取得）
  s <語>              検索（s だけでクリア）
  f <列> [値]         絞り込み（列: status/project/company/type、値なしで解除）
  o <列>              ソート（同じ列をもう一度で降順）
  x <行> [行...]      行の選択を反転
  a                   全選択/全解除
  c                   選択をクリア
  r                   検索と絞り込みをリセット
  e [出力先]          選択行をExcel出力
  E [出力先]          表示中の全行をExcel出力
  l                   再表示
  q                   終了";

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    /// スコープを変えて再取得
    Platform(String),
    /// 検索語を設定
    Search(String),
    /// 絞り込みを設定（None で解除）
    Filter(FilterDimension, Option<String>),
    /// 列ヘッダのクリック
    Sort(VehicleField),
    /// 行の選択を反転
    Toggle(Vec<usize>),
    ToggleAll,
    ClearSelection,
    Reset,
    /// Excel出力
    Export(ExportScope, Option<PathBuf>),
    Show,
    Help,
    Quit,
}

fn parse_dimension(text: &str) -> std::result::Result<FilterDimension, String> {
    match text.to_lowercase().as_str() {
        "status" => Ok(FilterDimension::Status),
        "project" => Ok(FilterDimension::Project),
        "company" => Ok(FilterDimension::Company),
        "type" | "vehicle-type" | "vehicle_type" => Ok(FilterDimension::VehicleType),
        _ => Err(format!("不明な絞り込み列: {}", text)),
    }
}

/// 入力行をアクションに変換する
///
/// # Returns
/// 解釈できない入力はエラーメッセージ
pub fn parse_action(line: &str) -> std::result::Result<BrowseAction, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    match command {
        "p" if !rest.is_empty() => Ok(BrowseAction::Platform(rest.to_string())),
        "s" => Ok(BrowseAction::Search(rest.to_string())),
        "f" => {
            let (dimension, value) = match rest.split_once(char::is_whitespace) {
                Some((d, v)) => (d, Some(v.trim().to_string())),
                None => (rest, None),
            };
            Ok(BrowseAction::Filter(parse_dimension(dimension)?, value))
        }
        "o" => rest.parse().map(BrowseAction::Sort),
        "x" => {
            let positions = rest
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .map(|t| t.parse::<usize>().map_err(|_| format!("行番号が不正: {}", t)))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if positions.is_empty() {
                return Err("行番号を指定してください".into());
            }
            Ok(BrowseAction::Toggle(positions))
        }
        "a" => Ok(BrowseAction::ToggleAll),
        "c" => Ok(BrowseAction::ClearSelection),
        "r" => Ok(BrowseAction::Reset),
        "e" | "E" => {
            let scope = if command == "e" { ExportScope::Selected } else { ExportScope::AllInView };
            let output = (!rest.is_empty()).then(|| PathBuf::from(rest));
            Ok(BrowseAction::Export(scope, output))
        }
        "" | "l" => Ok(BrowseAction::Show),
        "?" | "h" | "help" => Ok(BrowseAction::Help),
        "q" | "quit" => Ok(BrowseAction::Quit),
        _ => Err(format!("不明な操作: {}（? でヘルプ）", line)),
    }
}

/// 取得を伴わないアクションを適用する
///
/// # Returns
/// 表を再表示すべきなら true
pub fn apply_local(dashboard: &mut Dashboard, action: &BrowseAction) -> bool {
    match action {
        BrowseAction::Search(text) => dashboard.set_search(text),
        BrowseAction::Filter(dimension, value) => dashboard.set_filter(*dimension, value.clone()),
        BrowseAction::Sort(field) => dashboard.sort_by(*field),
        BrowseAction::Toggle(positions) => {
            for &position in positions {
                dashboard.toggle_row(position);
            }
        }
        BrowseAction::ToggleAll => dashboard.toggle_all(),
        BrowseAction::ClearSelection => dashboard.clear_selection(),
        BrowseAction::Reset => dashboard.reset_filters(),
        BrowseAction::Show => {}
        _ => return false,
    }
    true
}

/// 切替先のスコープを解決する
///
/// # Returns
/// 現在のスコープと同じなら `None`（再取得しない）
pub fn scope_change(dashboard: &Dashboard, text: &str) -> Result<Option<PlatformScope>> {
    let scope = dashboard.platforms().resolve(text)?;
    Ok((scope != *dashboard.scope()).then_some(scope))
}

fn print_view(dashboard: &Dashboard) {
    let view = dashboard.view();
    println!();
    print!(
        "{}",
        display::render_table(&view, dashboard.query().sort, Some(dashboard.selection()))
    );
    println!("{}", display::render_summary(&view, dashboard.selected_count()));
}

/// 対話ループ
pub async fn run_browse(
    dashboard: &mut Dashboard,
    source: &dyn VehicleSource,
    initial: PlatformScope,
    default_output: PathBuf,
) -> Result<()> {
    gateway::load_scope(dashboard, source, initial).await;
    println!("{}", display::fetched_at_line(dashboard.platforms(), dashboard.scope()));
    print_view(dashboard);
    println!("\n{}\n", HELP);

    loop {
        let line: String = Input::new()
            .with_prompt("操作")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DashboardError::Prompt(e.to_string()))?;

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(message) => {
                println!("⚠ {}", message);
                continue;
            }
        };

        match action {
            BrowseAction::Quit => break,
            BrowseAction::Help => println!("{}", HELP),
            BrowseAction::Platform(text) => {
                let resolved = scope_change(dashboard, &text);
                match resolved {
                    Ok(None) => {
                        let label = dashboard.platforms().label(dashboard.scope());
                        println!("既に {} を表示中（再表示は l）", label);
                    }
                    Ok(Some(scope)) => {
                        gateway::load_scope(dashboard, source, scope).await;
                        println!(
                            "{}",
                            display::fetched_at_line(dashboard.platforms(), dashboard.scope())
                        );
                        print_view(dashboard);
                    }
                    Err(e) => println!("⚠ {}", e),
                }
            }
            BrowseAction::Export(scope, output) => {
                let target = output.unwrap_or_else(|| default_output.clone());
                match export::export_dashboard(dashboard, scope, &target) {
                    Ok(path) => println!("✔ Excel出力: {}", path.display()),
                    Err(e) => println!("⚠ {}", e),
                }
            }
            other => {
                if apply_local(dashboard, &other) {
                    print_view(dashboard);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vehicle_dashboard_common::VehicleRecord;

    fn dashboard() -> Dashboard {
        let mut dashboard = Dashboard::default();
        dashboard.replace_records(vec![
            VehicleRecord::from_pairs([("Vehicle no", "B2"), ("vehicle status", "RUNNING")]),
            VehicleRecord::from_pairs([("Vehicle no", "A1"), ("vehicle status", "STOPPED")]),
            VehicleRecord::from_pairs([("Vehicle no", "C3"), ("vehicle status", "RUNNING")]),
        ]);
        dashboard
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(parse_action("p coretrack"), Ok(BrowseAction::Platform("coretrack".into())));
        assert_eq!(parse_action("s  gj 01 "), Ok(BrowseAction::Search("gj 01".into())));
        assert_eq!(parse_action("s"), Ok(BrowseAction::Search(String::new())));
        assert_eq!(
            parse_action("f status RUNNING"),
            Ok(BrowseAction::Filter(FilterDimension::Status, Some("RUNNING".into())))
        );
        assert_eq!(parse_action("f type"), Ok(BrowseAction::Filter(FilterDimension::VehicleType, None)));
        assert_eq!(parse_action("o imei"), Ok(BrowseAction::Sort(VehicleField::Imei)));
        assert_eq!(parse_action("x 0, 2"), Ok(BrowseAction::Toggle(vec![0, 2])));
        assert_eq!(parse_action("e"), Ok(BrowseAction::Export(ExportScope::Selected, None)));
        assert_eq!(
            parse_action("E out"),
            Ok(BrowseAction::Export(ExportScope::AllInView, Some(PathBuf::from("out"))))
        );
        assert_eq!(parse_action(""), Ok(BrowseAction::Show));
        assert_eq!(parse_action("q"), Ok(BrowseAction::Quit));
    }

    #[test]
    fn test_parse_invalid_actions() {
        assert!(parse_action("p").is_err());
        assert!(parse_action("x").is_err());
        assert!(parse_action("x one").is_err());
        assert!(parse_action("f colour red").is_err());
        assert!(parse_action("o nowhere").is_err());
        assert!(parse_action("zzz").is_err());
    }

    #[test]
    fn test_apply_local_filter_then_select() {
        let mut dashboard = dashboard();
        assert!(apply_local(&mut dashboard, &parse_action("f status running").unwrap()));
        assert_eq!(dashboard.view().len(), 2);

        apply_local(&mut dashboard, &BrowseAction::Toggle(vec![1]));
        let rows = dashboard.export_rows(ExportScope::Selected).unwrap();
        assert_eq!(rows[0].get(VehicleField::VehicleNo), Some("C3"));
    }

    #[test]
    fn test_apply_local_sort_twice_is_descending() {
        let mut dashboard = dashboard();
        apply_local(&mut dashboard, &BrowseAction::Sort(VehicleField::VehicleNo));
        apply_local(&mut dashboard, &BrowseAction::Sort(VehicleField::VehicleNo));
        let first = dashboard.view().get(0).and_then(|r| r.get(VehicleField::VehicleNo));
        assert_eq!(first, Some("C3"));
    }

    #[test]
    fn test_scope_change_skips_current_scope() {
        let mut dashboard = dashboard();
        let _ = dashboard.begin_fetch(PlatformScope::Platform("coretrack".into()));

        assert_eq!(scope_change(&dashboard, "coretrack").unwrap(), None);
        assert_eq!(scope_change(&dashboard, "all").unwrap(), Some(PlatformScope::All));
        assert!(scope_change(&dashboard, "nowhere").is_err());
    }

    #[test]
    fn test_apply_local_ignores_fetch_actions() {
        let mut dashboard = dashboard();
        assert!(!apply_local(&mut dashboard, &BrowseAction::Platform("gp".into())));
        assert!(!apply_local(&mut dashboard, &BrowseAction::Quit));
    }
}
