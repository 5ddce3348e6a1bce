//! Excel生成（共通ライブラリ）
//!
//! 1シートの一覧表を生成する。ヘッダは全レコードの列の和集合
//! （先頭レコードの列順、以降は初出順）、セルはすべて文字列として書き込む。

use super::SHEET_NAME;
use crate::error::ExportError;
use crate::types::VehicleRecord;
use rust_xlsxwriter::*;

/// ヘッダ行
///
/// 先頭レコードの列順を基準に、後続レコードにだけある列を初出順で足す。
pub fn header_columns(records: &[&VehicleRecord]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for (key, _) in record.columns() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.to_string());
            }
        }
    }
    headers
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `records` - 出力するレコード（順序どおりに1行ずつ）
///
/// # Returns
/// * `Ok(Vec<u8>)` - xlsxのバイト列
/// * `Err(ExportError::NothingSelected)` - レコードが0件
pub fn generate_excel_buffer(records: &[&VehicleRecord]) -> Result<Vec<u8>, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NothingSelected);
    }

    let headers = header_columns(records);
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| ExportError::Workbook(format!("シート名設定エラー: {}", e)))?;

    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, header, &header_format)
            .map_err(|e| ExportError::Workbook(format!("ヘッダ書き込みエラー: {}", e)))?;
        worksheet
            .set_column_width(col, (header.chars().count().max(12) + 2) as f64)
            .map_err(|e| ExportError::Workbook(format!("列幅設定エラー: {}", e)))?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            let value = record.value(header).unwrap_or("");
            worksheet
                .write_string(row, col as u16, value)
                .map_err(|e| ExportError::Workbook(format!("値書き込みエラー: {}", e)))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Workbook(format!("Excel保存エラー: {}", e)))
}
