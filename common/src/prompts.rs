//! プロンプト生成モジュール
//!
//! - build_system_prompt: 出力契約（JSONオブジェクト1つ、指定キーのみ）
//! - build_user_prompt: 指示文 + 論文本文（文字数上限で切り詰め）
//! - build_prompts: 上記2つの組

use crate::types::PLACEHOLDER_NOT_FOUND;

/// 本文の最大文字数（リクエストサイズの上限）
pub const MAX_DOCUMENT_CHARS: usize = 200_000;

/// システム/ユーザープロンプトの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// 文字単位で先頭 `max_chars` 文字に切り詰める（超過分は黙って捨てる）
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// システムプロンプト生成
///
/// # Arguments
/// * `requested` - 応答JSONに含めるキー（この順で提示）
pub fn build_system_prompt(requested: &[&str]) -> String {
    let keys = serde_json::to_string(requested).unwrap_or_default();

    format!(
        r#"You are a meticulous, top-tier research assistant. Your job is to analyse the academic paper text supplied by the user and extract information exactly as instructed.

Rules you must follow:
1. Core task: understand and carry out the specific extraction task in the user's message.
2. Output format: your entire answer MUST be a single, well-formed JSON object and nothing else.
3. JSON structure: the object must contain exactly these keys and no others: {keys}.
4. No extra content: never add explanations, comments or Markdown around the JSON. Start your answer with `{{` and end it with `}}`.
5. Rigour: if the journal name, publication year or DOI cannot be found explicitly in the text, set the value to "{PLACEHOLDER_NOT_FOUND}". Do not guess or invent values.
Work quickly and efficiently."#
    )
}

/// ユーザープロンプト生成
///
/// 本文は [`MAX_DOCUMENT_CHARS`] 文字で切り詰める。切り詰めたことはモデルに伝えない。
pub fn build_user_prompt(instructions: &str, document_text: &str) -> String {
    let body = truncate_chars(document_text, MAX_DOCUMENT_CHARS);

    format!(
        "**Task:**\nExtract the following information from the paper text I provide:\n{instructions}\n\nReturn the JSON object.\n--- TEXT START ---\n{body}\n--- TEXT END ---"
    )
}

/// 1ファイル分のプロンプトを生成
pub fn build_prompts(requested: &[&str], instructions: &str, document_text: &str) -> PromptPair {
    PromptPair {
        system: build_system_prompt(requested),
        user: build_user_prompt(instructions, document_text),
    }
}
