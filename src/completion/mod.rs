//! LLM呼び出し
//!
//! パイプラインは `CompletionClient` トレイトだけに依存する。
//! 実装は OpenAI互換API（`/models`, `/chat/completions`）の `OpenAiClient`。

mod openai;
mod types;

pub use openai::OpenAiClient;

use crate::error::Result;

/// 出力トークン上限
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

/// サンプリング温度（抽出用途なので低め）
pub const TEMPERATURE: f32 = 0.1;

/// 1回の補完リクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest<'a> {
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub model: &'a str,
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// 応答をJSONオブジェクトに制約する
    pub json_mode: bool,
}

impl<'a> CompletionRequest<'a> {
    /// 抽出用の固定パラメータで組み立てる
    pub fn extraction(system_prompt: &'a str, user_prompt: &'a str, model: &'a str) -> Self {
        Self {
            system_prompt,
            user_prompt,
            model,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            json_mode: true,
        }
    }
}

pub trait CompletionClient: Send {
    /// 応答テキストを返す（JSONとして正しいかは保証しない）
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String>;

    /// 利用可能なモデルID一覧（接続確認にも使う）
    fn list_models(&self) -> Result<Vec<String>>;
}
