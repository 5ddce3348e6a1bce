pub mod excel;

use crate::error::Result;
use std::path::{Path, PathBuf};
use vehicle_dashboard_common::{Dashboard, ExportScope, EXPORT_FILE_NAME};

/// 出力先のパスを決める
///
/// 既存ディレクトリ、または区切り文字で終わるパスなら固定ファイル名を付ける。
/// それ以外は指定どおりのファイルパス。
pub fn output_path(output: &Path) -> PathBuf {
    if output.is_dir() || ends_with_separator(output) {
        output.join(EXPORT_FILE_NAME)
    } else {
        output.to_path_buf()
    }
}

fn ends_with_separator(path: &Path) -> bool {
    path.to_string_lossy()
        .ends_with(|c: char| std::path::is_separator(c))
}

/// ダッシュボードの現在ビューをExcelに出力する
///
/// # Returns
/// 書き込んだファイルのパス。対象が0件なら `NothingSelected` でファイルは作らない。
pub fn export_dashboard(dashboard: &Dashboard, scope: ExportScope, output: &Path) -> Result<PathBuf> {
    let rows = dashboard.export_rows(scope)?;
    let path = output_path(output);
    excel::generate_excel(&rows, &path)?;
    Ok(path)
}
