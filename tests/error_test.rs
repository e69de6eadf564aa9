//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use paper_ai_rust::config::{RunConfig, DEFAULT_BASE_URL};
use paper_ai_rust::error::PaperAiError;
use paper_ai_rust::extractor::{LopdfExtractor, TextExtractor};
use paper_ai_rust::scanner;
use paper_ai_common::CapabilityFlags;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダを列挙した場合
#[test]
fn test_list_nonexistent_folder() {
    let result = scanner::list_pdf_files(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(PaperAiError::FolderNotFound(_))));
}

/// ファイルをフォルダとして渡した場合
#[test]
fn test_list_file_instead_of_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("paper.pdf");
    std::fs::write(&file, b"%PDF").unwrap();

    let result = scanner::list_pdf_files(&file);
    assert!(matches!(result, Err(PaperAiError::FolderNotFound(_))));
}

/// PDFのないフォルダ（エラーではなく空）
#[test]
fn test_list_folder_without_pdfs() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::list_pdf_files(dir.path());
    assert!(result.unwrap().is_empty());
}

/// 壊れたPDF
#[test]
fn test_extract_broken_pdf() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"%PDF-1.4\nthis is not really a pdf").unwrap();

    let result = LopdfExtractor.extract_text(&path);
    assert!(matches!(result, Err(PaperAiError::Extraction(_))));
}

/// 空の設定項目
#[test]
fn test_run_config_rejects_blank_model() {
    let result = RunConfig::new(
        "sk-test",
        DEFAULT_BASE_URL,
        "",
        "/data",
        "/data/out.xlsx",
        CapabilityFlags::all(),
    );
    match result {
        Err(PaperAiError::Config(msg)) => assert!(msg.contains("model_name")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

/// PaperAiErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PaperAiError::Config("テスト設定エラー".to_string()),
        PaperAiError::MissingApiKey,
        PaperAiError::FolderNotFound("/path/to/folder".to_string()),
        PaperAiError::NoPdfFound("/path/to/folder".to_string()),
        PaperAiError::Extraction("broken.pdf".to_string()),
        PaperAiError::ApiCall("HTTP 429".to_string()),
        PaperAiError::ApiParse("no choices".to_string()),
        PaperAiError::ExcelGeneration("Excel生成エラー".to_string()),
        PaperAiError::WorkerSpawn("resource".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let display = PaperAiError::MissingApiKey.to_string();

    assert!(display.contains("APIキー"));
    assert!(display.contains("paper-ai config"));
    assert!(display.contains("OPENAI_API_KEY"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PaperAiError = io_err.into();

    assert!(matches!(err, PaperAiError::Io(_)));
    assert!(err.to_string().contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PaperAiError = json_err.into();

    assert!(matches!(err, PaperAiError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_transparent() {
    let common_err = paper_ai_common::Error::Parse("応答がJSONではありません".to_string());
    let err: PaperAiError = common_err.into();

    assert!(matches!(err, PaperAiError::Common(_)));
    assert_eq!(err.to_string(), "Parse error: 応答がJSONではありません");
}

/// 応答パース失敗がそのまま伝播する
#[test]
fn test_parse_failure_propagates() {
    fn parse(raw: &str) -> paper_ai_rust::error::Result<paper_ai_common::FieldMap> {
        Ok(paper_ai_common::parse_fields(raw)?)
    }

    let err = parse("[1, 2]").unwrap_err();
    assert!(matches!(
        err,
        PaperAiError::Common(paper_ai_common::Error::Parse(_))
    ));
}
