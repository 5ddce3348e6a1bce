//! 車両データ取得（ブラウザ fetch）
//!
//! スコープ変更ごとに1回だけ要求し、応答はチケットで照合してから反映する

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;
use vehicle_dashboard_common::{Dashboard, FetchError, FetchOutcome, PlatformScope};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// エンドポイントからJSONを取得する
pub async fn fetch_vehicles(url: &str) -> Result<Value, FetchError> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| FetchError::Network(js_error(e)))?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(|e| FetchError::Network(js_error(e)))?;

    let window = web_sys::window().ok_or_else(|| FetchError::Network("window is unavailable".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Network(js_error(e)))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|e| FetchError::Network(js_error(e)))?;

    if !resp.ok() {
        return Err(FetchError::Status(resp.status()));
    }

    // キー順を保つため、テキストで受けて serde_json で解釈する
    let text = JsFuture::from(resp.text().map_err(|e| FetchError::Parse(js_error(e)))?)
        .await
        .map_err(|e| FetchError::Parse(js_error(e)))?
        .as_string()
        .unwrap_or_default();

    serde_json::from_str(&text).map_err(|e| FetchError::Parse(e.to_string()))
}

/// スコープを取得して反映する
///
/// 古いチケットの応答は `complete_fetch` が捨てる
pub fn load_scope(
    dashboard: RwSignal<Dashboard>,
    last_error: RwSignal<Option<String>>,
    scope: PlatformScope,
) {
    let Some(ticket) = dashboard.try_update(|d| d.begin_fetch(scope)) else {
        return;
    };
    let url = dashboard.with_untracked(|d| d.platforms().endpoint(ticket.scope()));

    spawn_local(async move {
        let result = fetch_vehicles(&url).await;
        let Some(outcome) = dashboard.try_update(|d| d.complete_fetch(ticket, result)) else {
            return;
        };

        match &outcome {
            FetchOutcome::Applied { scope, count, report } => {
                last_error.set(None);
                web_sys::console::log_1(&format!("loaded {} vehicles ({})", count, scope).into());
                if report.has_warnings() {
                    web_sys::console::warn_1(
                        &format!(
                            "payload partially malformed: skipped entries {:?}, skipped records {}, dropped fields {}",
                            report.skipped_entries, report.skipped_records, report.dropped_fields
                        )
                        .into(),
                    );
                }
            }
            FetchOutcome::Failed { scope, reason } => {
                last_error.set(Some(format!("Failed to load vehicles: {}", reason)));
                web_sys::console::error_1(&format!("fetch failed ({}): {}", scope, reason).into());
            }
            FetchOutcome::Stale { scope } => {
                web_sys::console::log_1(&format!("discarded stale response ({})", scope).into());
            }
        }
    });
}
