//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを作り、ファイルに書き出す

use crate::error::Result;
use std::path::Path;
use tracing::debug;
use vehicle_dashboard_common::export::excel_core;
use vehicle_dashboard_common::VehicleRecord;

pub fn generate_excel(records: &[&VehicleRecord], output_path: &Path) -> Result<()> {
    let buffer = excel_core::generate_excel_buffer(records)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(output_path, &buffer)?;
    debug!(path = %output_path.display(), rows = records.len(), bytes = buffer.len(), "excel written");
    Ok(())
}
