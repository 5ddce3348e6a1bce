//! プラットフォーム定義
//!
//! スコープID → エンドポイント・表示名の対応を一箇所に集約する。
//! CLIは設定ファイル、WASMは組み込みのデフォルトから生成して注入する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 全プラットフォーム集約を表すID
pub const ALL_SCOPE_ID: &str = "all";

/// 取得対象のスコープ
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PlatformScope {
    /// 全プラットフォームの集約
    #[default]
    All,
    /// 単一プラットフォーム
    Platform(String),
}

impl PlatformScope {
    pub fn id(&self) -> &str {
        match self {
            PlatformScope::All => ALL_SCOPE_ID,
            PlatformScope::Platform(id) => id,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, PlatformScope::All)
    }
}

impl std::fmt::Display for PlatformScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for PlatformScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Platform must not be empty".to_string());
        }
        if trimmed.eq_ignore_ascii_case(ALL_SCOPE_ID) {
            Ok(PlatformScope::All)
        } else {
            Ok(PlatformScope::Platform(trimmed.to_string()))
        }
    }
}

/// 単一プラットフォームの定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub label: String,
}

impl Platform {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
        }
    }
}

/// プラットフォーム表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTable {
    pub base_url: String,
    pub platforms: Vec<Platform>,
}

/// 既定の集約サーバー
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const DEFAULT_PLATFORM_IDS: &[&str] = &[
    "ansgujarat",
    "coretrack",
    "libi35",
    "smartbus",
    "taaseye",
    "advance55",
    "gp",
    "praygraj",
];

impl Default for PlatformTable {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            platforms: DEFAULT_PLATFORM_IDS.iter().map(|id| Platform::new(id)).collect(),
        }
    }
}

impl PlatformTable {
    /// ベースURLを差し替えた表
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// スコープに対応するエンドポイントURL
    pub fn endpoint(&self, scope: &PlatformScope) -> String {
        let base = self.base_url.trim_end_matches('/');
        match scope {
            PlatformScope::All => format!("{}/api/vehicles", base),
            PlatformScope::Platform(id) => format!("{}/api/vehicle/{}", base, id),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.platforms.iter().any(|p| p.id == id)
    }

    /// 入力文字列を既知のスコープへ解決する
    pub fn resolve(&self, text: &str) -> Result<PlatformScope> {
        let scope: PlatformScope = text.parse().map_err(Error::Config)?;
        match &scope {
            PlatformScope::All => Ok(scope),
            PlatformScope::Platform(id) if self.contains(id) => Ok(scope),
            PlatformScope::Platform(id) => Err(Error::UnknownPlatform(id.clone())),
        }
    }

    /// 表示名
    pub fn label(&self, scope: &PlatformScope) -> String {
        match scope {
            PlatformScope::All => "All".to_string(),
            PlatformScope::Platform(id) => self
                .platforms
                .iter()
                .find(|p| &p.id == id)
                .map(|p| p.label.clone())
                .unwrap_or_else(|| id.clone()),
        }
    }

    /// セレクタの選択肢（Allが先頭）
    pub fn options(&self) -> Vec<(PlatformScope, String)> {
        std::iter::once((PlatformScope::All, "All".to_string()))
            .chain(
                self.platforms
                    .iter()
                    .map(|p| (PlatformScope::Platform(p.id.clone()), p.label.clone())),
            )
            .collect()
    }
}
