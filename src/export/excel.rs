//! Excel出力（CLI版）
//!
//! ワークブックの生成は共通ライブラリ、ここではファイルへの書き出しのみ

use crate::error::{PaperAiError, Result};
use paper_ai_common::export::excel_core::generate_table_buffer;
use paper_ai_common::FileRecord;
use std::path::Path;

/// 結果行を列順どおりに1シートへ書き出す
///
/// 行にない列は空セルになる。出力先の親フォルダがなければ作成する。
pub fn write_table(records: &[FileRecord], columns: &[&str], output_path: &Path) -> Result<()> {
    let rows: Vec<Vec<String>> = records.iter().map(|r| r.row(columns)).collect();

    let buffer = generate_table_buffer(columns, &rows).map_err(PaperAiError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;

    tracing::debug!(rows = rows.len(), path = %output_path.display(), "table written");
    Ok(())
}
