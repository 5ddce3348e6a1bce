//! レスポンス正規化モジュール
//!
//! プラットフォームごとに形の異なるAPIレスポンスを、
//! フラットな VehicleRecord の列に変換する。
//!
//! ## レスポンス形状
//! - 単一プラットフォーム: `success[0].data.data` にレコード配列
//! - 全プラットフォーム: `success` がプラットフォームごとのエントリ配列で、
//!   各エントリの `data.data` にレコード配列
//!
//! 枝が欠けている・壊れている場合、そのエントリは空として扱う。
//! ペイロード全体が解釈できない場合のみ `NormalizeError` を返す。

use crate::error::NormalizeError;
use crate::platform::PlatformScope;
use crate::types::{VehicleField, VehicleRecord};
use serde_json::{Map, Value};

/// 正規化結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    /// フラット化したレコード（プラットフォーム順→元の順）
    pub records: Vec<VehicleRecord>,
    /// `data.data` が見つからなかったエントリの位置
    pub skipped_entries: Vec<usize>,
    /// オブジェクトでなかったため捨てたレコード数
    pub skipped_records: usize,
    /// 配列・オブジェクト値のため捨てたフィールド数
    pub dropped_fields: usize,
}

impl NormalizeReport {
    /// 何かしら読み飛ばしがあったか
    pub fn has_warnings(&self) -> bool {
        !self.skipped_entries.is_empty() || self.skipped_records > 0 || self.dropped_fields > 0
    }
}

/// JSON文字列を正規化する
///
/// # Arguments
/// * `body` - レスポンスボディ
/// * `scope` - リクエストしたスコープ
///
/// # Returns
/// * `Ok(NormalizeReport)` - 正規化成功（部分的な欠落を含む）
/// * `Err` - JSONとして読めない、または `success` 配列がない
pub fn normalize_str(body: &str, scope: &PlatformScope) -> Result<NormalizeReport, NormalizeError> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|e| NormalizeError::MalformedPayload(format!("invalid JSON: {}", e)))?;
    normalize_payload(&payload, scope)
}

/// パース済みペイロードを正規化する
pub fn normalize_payload(
    payload: &Value,
    scope: &PlatformScope,
) -> Result<NormalizeReport, NormalizeError> {
    let entries = payload
        .get("success")
        .and_then(Value::as_array)
        .ok_or_else(|| NormalizeError::MalformedPayload("missing `success` array".into()))?;

    let mut report = NormalizeReport::default();

    match scope {
        PlatformScope::Platform(_) => {
            if let Some(entry) = entries.first() {
                collect_entry(entry, 0, false, &mut report);
            }
        }
        PlatformScope::All => {
            for (index, entry) in entries.iter().enumerate() {
                collect_entry(entry, index, true, &mut report);
            }
        }
    }

    Ok(report)
}

/// エントリ内のレコード配列（`data.data`）
fn record_list(entry: &Value) -> Option<&Vec<Value>> {
    entry.get("data")?.get("data")?.as_array()
}

fn collect_entry(entry: &Value, index: usize, tag_domain: bool, report: &mut NormalizeReport) {
    let Some(list) = record_list(entry) else {
        report.skipped_entries.push(index);
        return;
    };

    let domain = if tag_domain {
        entry.get("domain").and_then(Value::as_str)
    } else {
        None
    };

    for item in list {
        match item.as_object() {
            Some(object) => {
                let mut record = record_from_object(object, &mut report.dropped_fields);
                if record.domain.is_none() {
                    if let Some(domain) = domain {
                        record.set(VehicleField::Domain.key(), domain);
                    }
                }
                report.records.push(record);
            }
            None => report.skipped_records += 1,
        }
    }
}

/// JSONオブジェクトからレコードを作る
///
/// 数値・真偽値は文字列化、nullは欠落扱い、配列・オブジェクトは捨てて数える。
fn record_from_object(object: &Map<String, Value>, dropped: &mut usize) -> VehicleRecord {
    let mut record = VehicleRecord::new();
    for (key, value) in object {
        match value {
            Value::String(s) => record.set(key, s.as_str()),
            Value::Number(n) => record.set(key, n.to_string()),
            Value::Bool(b) => record.set(key, b.to_string()),
            Value::Null => {}
            Value::Array(_) | Value::Object(_) => *dropped += 1,
        }
    }
    record
}
