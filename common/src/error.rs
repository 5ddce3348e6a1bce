//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// エクスポート時のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// 出力対象が0件（シリアライズ前に検出する）
    #[error("Nothing selected to export")]
    NothingSelected,

    #[error("Workbook error: {0}")]
    Workbook(String),
}

/// ペイロード全体が解釈できない場合のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// データ取得の失敗種別
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Response parse error: {0}")]
    Parse(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
