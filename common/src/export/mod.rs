//! Export core modules shared across CLI and WASM wrappers.

/// 出力ファイル名（固定）
pub const EXPORT_FILE_NAME: &str = "VehicleData.xlsx";

/// シート名
pub const SHEET_NAME: &str = "Vehicles";

/// 出力範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// ビューに表示中の全レコード
    #[default]
    AllInView,
    /// 選択中の行のみ
    Selected,
}

#[cfg(feature = "excel")]
pub mod excel_core;
