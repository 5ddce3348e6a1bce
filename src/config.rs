use crate::error::{DashboardError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use vehicle_dashboard_common::{Platform, PlatformTable};

/// ベースURLを上書きする環境変数
pub const API_URL_ENV: &str = "VEHICLE_DASHBOARD_API_URL";

lazy_static! {
    static ref BASE_URL_PATTERN: Regex = Regex::new(r"^https?://[^\s/]+(:\d+)?(/\S*)?$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// 省略時は組み込みのプラットフォーム一覧
    pub platforms: Option<Vec<Platform>>,
    pub default_platform: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DashboardError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("vehicle-dashboard").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            base_url: vehicle_dashboard_common::platform::DEFAULT_BASE_URL.into(),
            platforms: None,
            default_platform: "all".into(),
            timeout_seconds: 30,
        }
    }

    /// 実際に使うベースURL
    pub fn effective_base_url(&self) -> String {
        // 環境変数を優先
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.base_url.clone(),
        }
    }

    /// ゲートウェイに注入するプラットフォーム表
    pub fn platform_table(&self) -> PlatformTable {
        let mut table = PlatformTable::default();
        if let Some(platforms) = &self.platforms {
            table.platforms = platforms.clone();
        }
        table.with_base_url(&self.effective_base_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        validate_base_url(&url)?;
        self.base_url = url.trim_end_matches('/').to_string();
        self.save()
    }
}

pub fn validate_base_url(url: &str) -> Result<()> {
    if BASE_URL_PATTERN.is_match(url) {
        Ok(())
    } else {
        Err(DashboardError::Config(format!("URLの形式が不正です: {}", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.default_platform, "all");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "timeout_seconds": 5 }"#).unwrap();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.base_url, "http://localhost:5000");
        assert!(config.platforms.is_none());
    }

    #[test]
    fn test_custom_platforms_replace_builtin() {
        let config = Config {
            base_url: "https://fleet.example.com".into(),
            platforms: Some(vec![Platform::new("depot")]),
            ..Default::default()
        };
        let table = config.platform_table();
        assert!(table.contains("depot"));
        assert!(!table.contains("coretrack"));
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("http://localhost:5000").is_ok());
        assert!(validate_base_url("https://fleet.example.com/proxy").is_ok());
        assert!(validate_base_url("localhost:5000").is_err());
        assert!(validate_base_url("http://bad host").is_err());
    }
}
