//! APIレスポンスパーサー
//!
//! モデルの生出力からコードフェンスを外し、JSONオブジェクトとして読む。
//! キー集合の検証はしない（欠落キーは呼び出し側でプレースホルダに置き換える）。

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// 列名 → JSON値
pub type FieldMap = serde_json::Map<String, Value>;

lazy_static! {
    /// 先頭の ``` または ```json（言語タグ任意）
    static ref OPENING_FENCE: Regex = Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n?").unwrap();
    /// 末尾の ```
    static ref CLOSING_FENCE: Regex = Regex::new(r"\r?\n?```$").unwrap();
}

/// 前後のコードフェンスを取り除く
///
/// フェンスがなければ前後の空白を除いた文字列をそのまま返す。
///
/// # Examples
/// ```
/// use paper_ai_common::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
/// ```
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let start = OPENING_FENCE
        .find(trimmed)
        .map(|m| m.end())
        .unwrap_or(0);
    let body = &trimmed[start..];
    let end = CLOSING_FENCE
        .find(body)
        .map(|m| m.start())
        .unwrap_or(body.len());

    body[..end].trim()
}

/// モデル出力をフィールドマップにパース
///
/// # Returns
/// * `Ok(FieldMap)` - JSONオブジェクトとして読めた
/// * `Err(Error::Parse)` - JSONとして不正、またはオブジェクト以外
pub fn parse_fields(raw: &str) -> Result<FieldMap> {
    let json_str = strip_code_fence(raw);
    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("JSONパースエラー: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Parse(format!(
            "JSONオブジェクトではありません: {}",
            json_kind(&other)
        ))),
    }
}

/// セルに書く文字列へ変換（null・空文字は「値なし」）
pub fn field_value_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(field_value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// 観測用の整形済みJSON
pub fn pretty_fields(map: &FieldMap) -> String {
    serde_json::to_string_pretty(map).unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // strip_code_fence テスト
    // =============================================

    #[test]
    fn test_strip_json_fence() {
        let raw = "```json\n{\"title\": \"A\"}\n```";
        assert_eq!(strip_code_fence(raw), r#"{"title": "A"}"#);
    }

    #[test]
    fn test_strip_plain_fence() {
        let raw = "```\n{\"title\": \"A\"}\n```";
        assert_eq!(strip_code_fence(raw), r#"{"title": "A"}"#);
    }

    #[test]
    fn test_strip_fence_same_line() {
        let raw = "```json{\"title\": \"A\"}```";
        assert_eq!(strip_code_fence(raw), r#"{"title": "A"}"#);
    }

    #[test]
    fn test_strip_no_fence_trims_whitespace() {
        assert_eq!(strip_code_fence("\n  {\"a\": \"b\"}  \n"), r#"{"a": "b"}"#);
    }

    #[test]
    fn test_strip_keeps_json_ending_in_letter_j() {
        // フェンス除去は文字集合のstripではない（本文末尾の j/s/o/n を削らない）
        let raw = "```json\n{\"journal_name\": \"json\"}\n```";
        assert_eq!(strip_code_fence(raw), r#"{"journal_name": "json"}"#);
    }

    #[test]
    fn test_strip_crlf_fence() {
        let raw = "```json\r\n{\"a\": \"b\"}\r\n```";
        assert_eq!(strip_code_fence(raw), r#"{"a": "b"}"#);
    }

    // =============================================
    // parse_fields テスト
    // =============================================

    #[test]
    fn test_parse_round_trip() {
        let mut map = FieldMap::new();
        map.insert("title".into(), Value::String("Soil carbon".into()));
        map.insert("doi".into(), Value::String("10.1000/xyz".into()));
        map.insert("abstract".into(), Value::String("Line 1\n\"quoted\"".into()));

        let serialized = serde_json::to_string(&map).unwrap();
        assert_eq!(parse_fields(&serialized).unwrap(), map);
    }

    #[test]
    fn test_parse_fenced_equals_unfenced() {
        let plain = r#"{"title": "A", "authors": "X, Y"}"#;
        let fenced = format!("```json\n{}\n```", plain);
        let bare_fence = format!("```\n{}\n```", plain);

        let expected = parse_fields(plain).unwrap();
        assert_eq!(parse_fields(&fenced).unwrap(), expected);
        assert_eq!(parse_fields(&bare_fence).unwrap(), expected);
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_fields("{\"title\": ");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_non_object() {
        let result = parse_fields(r#"["title"]"#);
        match result {
            Err(Error::Parse(msg)) => assert!(msg.contains("array")),
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_parse_prose_is_error() {
        assert!(parse_fields("Sorry, I cannot help with that.").is_err());
        assert!(parse_fields("").is_err());
    }

    // =============================================
    // field_value_to_string テスト
    // =============================================

    #[test]
    fn test_value_conversion() {
        assert_eq!(field_value_to_string(&Value::String("x".into())), Some("x".into()));
        assert_eq!(field_value_to_string(&serde_json::json!(2021)), Some("2021".into()));
        assert_eq!(field_value_to_string(&serde_json::json!(true)), Some("true".into()));
        assert_eq!(field_value_to_string(&Value::Null), None);
        assert_eq!(field_value_to_string(&Value::String("   ".into())), None);
    }

    #[test]
    fn test_value_array_joined() {
        let authors = serde_json::json!(["Ada Lovelace", "Alan Turing", null]);
        assert_eq!(
            field_value_to_string(&authors),
            Some("Ada Lovelace, Alan Turing".into())
        );
        assert_eq!(field_value_to_string(&serde_json::json!([])), None);
    }

    #[test]
    fn test_value_object_compact_json() {
        let v = serde_json::json!({"k": "v"});
        assert_eq!(field_value_to_string(&v), Some(r#"{"k":"v"}"#.into()));
    }

    #[test]
    fn test_pretty_fields() {
        let map = parse_fields(r#"{"title":"A"}"#).unwrap();
        assert_eq!(pretty_fields(&map), "{\n  \"title\": \"A\"\n}");
    }
}
