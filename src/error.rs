use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaperAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`paper-ai config --set-api-key` で設定するか OPENAI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("PDFファイルが見つかりません: {0}")]
    NoPdfFound(String),

    #[error("PDFテキスト抽出エラー: {0}")]
    Extraction(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("ワーカースレッド起動エラー: {0}")]
    WorkerSpawn(String),

    #[error(transparent)]
    Common(#[from] paper_ai_common::Error),
}

pub type Result<T> = std::result::Result<T, PaperAiError>;
