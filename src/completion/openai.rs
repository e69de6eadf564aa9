//! OpenAI互換APIクライアント（同期）
//!
//! ワーカースレッドから直接呼ぶため reqwest の blocking クライアントを使う。

use super::types::{ChatMessage, ChatRequest, ChatResponse, ModelsResponse, ResponseFormat};
use super::{CompletionClient, CompletionRequest};
use crate::error::{PaperAiError, Result};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        Self::with_timeout(api_key, base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(api_key: &str, base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PaperAiError::ApiCall(format!("HTTPクライアント生成エラー: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> PaperAiError {
        if e.is_connect() {
            PaperAiError::ApiCall(format!("接続できません: {}", self.base_url))
        } else if e.is_timeout() {
            PaperAiError::ApiCall(format!("{}秒でタイムアウトしました", self.timeout_secs))
        } else {
            PaperAiError::ApiCall(e.to_string())
        }
    }

    fn check_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let preview: String = body.chars().take(300).collect();
        Err(PaperAiError::ApiCall(format!(
            "HTTP {}: {}",
            status.as_u16(),
            preview
        )))
    }
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String> {
        let body = ChatRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: request.user_prompt,
                },
            ],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            response_format: request
                .json_mode
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let parsed: ChatResponse = Self::check_status(response)?
            .json()
            .map_err(|e| PaperAiError::ApiParse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| PaperAiError::ApiParse("応答にメッセージがありません".into()))
    }

    fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let parsed: ModelsResponse = Self::check_status(response)?
            .json()
            .map_err(|e| PaperAiError::ApiParse(e.to_string()))?;

        Ok(parsed.data.into_iter().map(|m| m.id).collect())
    }
}
