//! 車両データ取得（HTTP）
//!
//! スコープごとのエンドポイントへGETし、生のJSONを返す。
//! 反映は Dashboard のチケットで行い、古い応答は捨てる。

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use vehicle_dashboard_common::{
    Dashboard, FetchError, FetchOutcome, PlatformScope, PlatformTable,
};

use crate::error::{DashboardError, Result};

/// 車両データの取得元
#[async_trait]
pub trait VehicleSource: Send + Sync {
    /// スコープの生ペイロードを取得する
    async fn fetch(&self, scope: &PlatformScope) -> std::result::Result<Value, FetchError>;
}

/// 集約サーバーへのHTTPゲートウェイ
pub struct HttpGateway {
    client: reqwest::Client,
    table: PlatformTable,
}

impl HttpGateway {
    pub fn new(table: PlatformTable, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("HTTPクライアント生成エラー: {}", e)))?;
        Ok(Self { client, table })
    }

    pub fn table(&self) -> &PlatformTable {
        &self.table
    }
}

#[async_trait]
impl VehicleSource for HttpGateway {
    async fn fetch(&self, scope: &PlatformScope) -> std::result::Result<Value, FetchError> {
        let url = self.table.endpoint(scope);
        debug!(%url, scope = %scope, "fetching vehicles");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

/// スコープを取得してダッシュボードに反映する
///
/// 取得中はスピナーを表示し、成功・失敗どちらでも消す。
pub async fn load_scope(
    dashboard: &mut Dashboard,
    source: &dyn VehicleSource,
    scope: PlatformScope,
) -> FetchOutcome {
    let label = dashboard.platforms().label(&scope);
    let ticket = dashboard.begin_fetch(scope);

    let spinner = loading_spinner(&label);
    let result = source.fetch(ticket.scope()).await;
    spinner.finish_and_clear();

    let outcome = dashboard.complete_fetch(ticket, result);
    log_outcome(&outcome);
    outcome
}

fn loading_spinner(label: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Loading vehicles... ({})", label));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// 反映結果をログに残す
pub fn log_outcome(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Applied { scope, count, report } => {
            info!(scope = %scope, count, "vehicles loaded");
            if report.has_warnings() {
                warn!(
                    scope = %scope,
                    skipped_entries = ?report.skipped_entries,
                    skipped_records = report.skipped_records,
                    dropped_fields = report.dropped_fields,
                    "payload partially malformed"
                );
            }
        }
        FetchOutcome::Failed { scope, reason } => {
            warn!(scope = %scope, %reason, "failed to fetch vehicles; showing 0 vehicles");
        }
        FetchOutcome::Stale { scope } => {
            debug!(scope = %scope, "discarded stale response");
        }
    }
}
