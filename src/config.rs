//! 接続設定（永続化）と1回の実行設定
//!
//! - Config: `api_key` / `base_url` / `model_name` のフラットなJSON
//! - RunConfig: 実行開始前に検証済みで組み立てる不変の設定

use crate::error::{PaperAiError, Result};
use paper_ai_common::CapabilityFlags;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// APIキーの環境変数（保存値より優先）
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model_name: String::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// 指定パスから読み込み（ファイルがなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PaperAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("paper-ai").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        if self.api_key.trim().is_empty() {
            Err(PaperAiError::MissingApiKey)
        } else {
            Ok(self.api_key.clone())
        }
    }

    /// 表示用（キー本体は出さない）
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        match chars.len() {
            0 => "未設定".into(),
            n if n <= 8 => "********".into(),
            n => format!("{}…{}", chars[..3].iter().collect::<String>(), chars[n - 4..].iter().collect::<String>()),
        }
    }
}

/// 1回の実行設定（実行中は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_name: String,
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub flags: CapabilityFlags,
}

impl RunConfig {
    /// 空の項目があれば実行を拒否する
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model_name: impl Into<String>,
        input_dir: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        flags: CapabilityFlags,
    ) -> Result<Self> {
        let config = Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model_name: model_name.into(),
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            flags,
        };

        let missing: Vec<&str> = [
            ("api_key", config.api_key.trim().is_empty()),
            ("base_url", config.base_url.trim().is_empty()),
            ("model_name", config.model_name.trim().is_empty()),
            ("input_dir", config.input_dir.as_os_str().is_empty()),
            ("output_path", config.output_path.as_os_str().is_empty()),
        ]
        .into_iter()
        .filter(|(_, empty)| *empty)
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(PaperAiError::Config(format!(
                "未入力の設定項目があります: {}",
                missing.join(", ")
            )));
        }

        Ok(config)
    }

    /// 永続化する接続設定部分
    pub fn connection(&self) -> Config {
        Config {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model_name: self.model_name.clone(),
        }
    }
}
