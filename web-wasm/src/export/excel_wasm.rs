//! Excel生成（WASM版）
//!
//! 共通ライブラリでバッファを作り、Blobとしてダウンロードする

use super::{alert, download_bytes};
use vehicle_dashboard_common::export::excel_core::generate_excel_buffer;
use vehicle_dashboard_common::{Dashboard, ExportError, ExportScope, EXPORT_FILE_NAME};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 選択行をExcelに出力する
///
/// 何も選択されていなければアラートを出して終わる
pub fn export_selected(dashboard: &Dashboard) {
    if let Err(message) = try_export(dashboard, ExportScope::Selected) {
        alert(&message);
    }
}

fn try_export(dashboard: &Dashboard, scope: ExportScope) -> Result<(), String> {
    let rows = dashboard.export_rows(scope).map_err(|e| user_message(&e))?;
    let buffer = generate_excel_buffer(&rows).map_err(|e| user_message(&e))?;
    download_bytes(&buffer, EXPORT_FILE_NAME, XLSX_MIME)
        .map_err(|e| format!("Download failed: {:?}", e))
}

fn user_message(err: &ExportError) -> String {
    match err {
        ExportError::NothingSelected => "Please select at least one vehicle to export.".to_string(),
        ExportError::Workbook(msg) => format!("Excel generation failed: {}", msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        assert!(user_message(&ExportError::NothingSelected).contains("select at least one"));
        assert!(user_message(&ExportError::Workbook("x".into())).ends_with("x"));
    }
}
