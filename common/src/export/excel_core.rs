//! Excel生成（共通ライブラリ）
//!
//! 1行目に列名、2行目以降に1ファイル1行で文字列セルを書く一覧表

use rust_xlsxwriter::*;

/// ワークシート名
pub const SHEET_NAME: &str = "results";

/// 長文列（折り返し・幅広）
const LONG_TEXT_COLUMNS: &[&str] = &[
    "abstract",
    "abstract_translated",
    "conclusion_opinion",
    "article_summary",
];

const LONG_TEXT_WIDTH: f64 = 60.0;
const PATH_WIDTH: f64 = 40.0;
const TITLE_WIDTH: f64 = 40.0;
const DEFAULT_WIDTH: f64 = 18.0;

/// 列名から列幅（Excel文字幅）を決める
pub fn column_width(column: &str) -> f64 {
    match column {
        "file_path" => PATH_WIDTH,
        "title" | "title_translated" | "authors" => TITLE_WIDTH,
        c if LONG_TEXT_COLUMNS.contains(&c) => LONG_TEXT_WIDTH,
        _ => DEFAULT_WIDTH,
    }
}

/// 一覧表をバッファに生成
///
/// # Arguments
/// * `columns` - 列名（この順で出力）
/// * `rows` - 各行のセル値。`columns` と同じ長さに揃っていること（不足分は空セル）
pub fn generate_table_buffer<S: AsRef<str>>(
    columns: &[&str],
    rows: &[Vec<S>],
) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let wrap_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top);

    let plain_format = Format::new().set_align(FormatAlign::Top);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col_idx, column) in columns.iter().enumerate() {
        let col = col_idx as u16;
        worksheet
            .set_column_width(col, column_width(column))
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(0, col, *column, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    for (row_idx, row) in rows.iter().enumerate() {
        let excel_row = row_idx as u32 + 1;
        for (col_idx, column) in columns.iter().enumerate() {
            let value = row.get(col_idx).map(|v| v.as_ref()).unwrap_or("");
            let format = if LONG_TEXT_COLUMNS.contains(column) {
                &wrap_format
            } else {
                &plain_format
            };
            worksheet
                .write_string_with_format(excel_row, col_idx as u16, value, format)
                .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
