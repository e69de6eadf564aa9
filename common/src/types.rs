//! 解析結果の型定義
//!
//! - FileRecord: 1ファイル分の出力行
//! - プレースホルダ: 値を取得できなかった理由を区別する固定文字列

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::parser::{field_value_to_string, FieldMap};

/// AIは呼んだが値が得られなかった（キー欠落・API失敗・パース失敗）
pub const PLACEHOLDER_NOT_FOUND: &str = "information not found";

/// テキスト抽出に失敗したためAIを呼ばなかった
pub const PLACEHOLDER_EXTRACTION_FAILED: &str = "PDF text extraction failed";

/// 1ファイル分の結果行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// PDFファイルの絶対パス
    pub file_path: String,
    /// 要求列 → 値（要求列はすべて埋まっている）
    pub fields: HashMap<String, String>,
}

impl FileRecord {
    /// 要求列ごとに値を決めて行を組み立てる
    ///
    /// * `ai_result` が `None` で `text_extracted` が偽 → 抽出失敗プレースホルダ
    /// * `ai_result` が `None` で `text_extracted` が真 → 未検出プレースホルダ（AI呼び出し失敗）
    /// * `ai_result` があるがキーが欠落/空 → 未検出プレースホルダ
    pub fn build(
        file_path: impl Into<String>,
        requested: &[&str],
        ai_result: Option<&FieldMap>,
        text_extracted: bool,
    ) -> Self {
        let fields = requested
            .iter()
            .map(|&column| {
                let value = match ai_result {
                    Some(map) => map
                        .get(column)
                        .and_then(field_value_to_string)
                        .unwrap_or_else(|| PLACEHOLDER_NOT_FOUND.to_string()),
                    None if text_extracted => PLACEHOLDER_NOT_FOUND.to_string(),
                    None => PLACEHOLDER_EXTRACTION_FAILED.to_string(),
                };
                (column.to_string(), value)
            })
            .collect();

        Self {
            file_path: file_path.into(),
            fields,
        }
    }

    /// 列名で値を取得（`file_path` も解決する）
    pub fn get(&self, column: &str) -> Option<&str> {
        if column == "file_path" {
            return Some(&self.file_path);
        }
        self.fields.get(column).map(String::as_str)
    }

    /// 列順に並べた行の値（欠落は空文字）
    pub fn row(&self, columns: &[&str]) -> Vec<String> {
        columns
            .iter()
            .map(|c| self.get(c).unwrap_or_default().to_string())
            .collect()
    }
}
