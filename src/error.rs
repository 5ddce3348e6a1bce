use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("不明なプラットフォーム: {0}（`vehicle-dashboard platforms` で一覧を確認してください）")]
    UnknownPlatform(String),

    #[error("データ取得エラー: {0}")]
    Fetch(#[from] vehicle_dashboard_common::FetchError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("エクスポート対象がありません（行が選択されていません）")]
    NothingSelected,

    #[error("行番号が不正: {0}")]
    InvalidSelection(String),

    #[error("対話入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(vehicle_dashboard_common::Error),
}

impl From<vehicle_dashboard_common::Error> for DashboardError {
    fn from(err: vehicle_dashboard_common::Error) -> Self {
        use vehicle_dashboard_common::Error as CommonError;
        match err {
            CommonError::UnknownPlatform(id) => DashboardError::UnknownPlatform(id),
            CommonError::Export(e) => e.into(),
            other => DashboardError::Common(other),
        }
    }
}

impl From<vehicle_dashboard_common::ExportError> for DashboardError {
    fn from(err: vehicle_dashboard_common::ExportError) -> Self {
        use vehicle_dashboard_common::ExportError;
        match err {
            ExportError::NothingSelected => DashboardError::NothingSelected,
            ExportError::Workbook(msg) => DashboardError::ExcelGeneration(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
