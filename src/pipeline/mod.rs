//! バッチ処理本体
//!
//! 初期化 → PDF列挙 → 1ファイルずつ（抽出 → AI → 行生成）→ Excel出力。
//! 専用スレッドで動き、表示側へは `Event` だけを流す。
//! 途中の失敗はログに出して続行し、`TaskDone` は必ず最後に1回送る。

pub mod events;
pub mod models;

pub use events::{channel, Event, EventReceiver, EventSender};
pub use models::{fetch_models, spawn_model_fetch};

use crate::completion::{CompletionClient, CompletionRequest, OpenAiClient};
use crate::config::RunConfig;
use crate::error::{PaperAiError, Result};
use crate::export;
use crate::extractor::{LopdfExtractor, TextExtractor};
use crate::scanner;
use paper_ai_common::{build_prompts, parse_fields, pretty_fields, resolve, FieldMap, FieldPlan, FileRecord};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

const WORKER_THREAD_NAME: &str = "batch-worker";

/// 停止要求フラグ（共有）
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal(Arc<AtomicBool>);

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 接続情報からクライアントを作る関数
pub type Connector = Box<dyn FnOnce(&RunConfig) -> Result<Box<dyn CompletionClient>> + Send>;

/// 1回の実行で使う外部依存
pub struct RunContext {
    connector: Connector,
    extractor: Box<dyn TextExtractor>,
    cancel: CancellationSignal,
}

impl RunContext {
    pub fn new(
        connector: Connector,
        extractor: Box<dyn TextExtractor>,
        cancel: CancellationSignal,
    ) -> Self {
        Self {
            connector,
            extractor,
            cancel,
        }
    }

    /// OpenAI互換API + lopdf の標準構成
    pub fn openai(cancel: CancellationSignal) -> Self {
        Self::new(
            Box::new(|config: &RunConfig| -> Result<Box<dyn CompletionClient>> {
                let client = OpenAiClient::new(&config.api_key, &config.base_url)?;
                Ok(Box::new(client))
            }),
            Box::new(LopdfExtractor),
            cancel,
        )
    }

    pub fn cancel_signal(&self) -> CancellationSignal {
        self.cancel.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// 全ファイルを処理した
    Completed,
    /// 停止要求で途中終了した
    Cancelled,
    /// 初期化または列挙で中断した（ファイル未処理）
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    pub records: Vec<FileRecord>,
    /// 書き出したExcelファイル（書き出していなければNone）
    pub output: Option<PathBuf>,
}

impl RunReport {
    fn aborted() -> Self {
        Self {
            status: RunStatus::Aborted,
            records: Vec::new(),
            output: None,
        }
    }
}

/// 現在のスレッドでバッチを実行する
///
/// 結果は `RunReport` で返し、エラーは返さない（すべて `Event::Log` になる）。
/// 最後に必ず `Event::TaskDone` を1回だけ送る。
pub fn run_batch(config: &RunConfig, ctx: RunContext, events: &EventSender) -> RunReport {
    let report = execute(config, ctx, events);
    events.send(Event::TaskDone);
    report
}

fn execute(config: &RunConfig, ctx: RunContext, events: &EventSender) -> RunReport {
    let _span = tracing::info_span!("pipeline.run", input = %config.input_dir.display()).entered();
    let RunContext {
        connector,
        extractor,
        cancel,
    } = ctx;

    // 初期化（接続確認）
    events.log("APIクライアントを初期化しています...");
    let client = match connect_and_probe(connector, config) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("client initialization failed: {}", e);
            events.log(format!("APIクライアントの初期化に失敗しました: {}", e));
            return RunReport::aborted();
        }
    };
    events.log(format!("接続を確認しました: {}", config.base_url));

    // PDF列挙
    let files = match scanner::list_pdf_files(&config.input_dir) {
        Ok(files) if files.is_empty() => {
            let e = PaperAiError::NoPdfFound(config.input_dir.display().to_string());
            events.log(e.to_string());
            return RunReport::aborted();
        }
        Ok(files) => files,
        Err(e) => {
            tracing::warn!("listing failed: {}", e);
            events.log(format!("PDFファイルの一覧取得に失敗しました: {}", e));
            return RunReport::aborted();
        }
    };
    let total = files.len();
    events.log(format!("{}件のPDFファイルが見つかりました", total));

    let plan = resolve(config.flags);
    let mut records = Vec::with_capacity(total);

    for (index, path) in files.iter().enumerate() {
        if cancel.is_cancelled() {
            events.log(format!(
                "停止を要求されたため残り{}件をスキップします",
                total - index
            ));
            break;
        }
        let record = process_file(
            path,
            index,
            total,
            config,
            &plan,
            client.as_ref(),
            extractor.as_ref(),
            events,
        );
        records.push(record);
    }

    // 出力
    let mut output = None;
    if !records.is_empty() {
        match export::write_table(&records, &plan.columns, &config.output_path) {
            Ok(()) => {
                events.log(format!("結果を保存しました: {}", config.output_path.display()));
                output = Some(config.output_path.clone());
            }
            Err(e) => {
                tracing::warn!("export failed: {}", e);
                events.log(format!("Excelファイルの保存に失敗しました: {}", e));
            }
        }
    }

    let status = if cancel.is_cancelled() {
        events.log("処理を停止しました");
        RunStatus::Cancelled
    } else {
        events.log("すべての処理が完了しました");
        RunStatus::Completed
    };

    RunReport {
        status,
        records,
        output,
    }
}

fn connect_and_probe(connector: Connector, config: &RunConfig) -> Result<Box<dyn CompletionClient>> {
    let client = connector(config)?;
    let models = client.list_models()?;
    tracing::debug!("probe ok: {} models", models.len());
    Ok(client)
}

#[allow(clippy::too_many_arguments)]
fn process_file(
    path: &Path,
    index: usize,
    total: usize,
    config: &RunConfig,
    plan: &FieldPlan,
    client: &dyn CompletionClient,
    extractor: &dyn TextExtractor,
    events: &EventSender,
) -> FileRecord {
    let _span = tracing::info_span!("pipeline.file", index, path = %path.display()).entered();
    let name = display_name(path);

    events.send(Event::Progress {
        current: index + 1,
        total,
    });
    events.log(format!("処理中 ({}/{}): {}", index + 1, total, name));

    let text = match extractor.extract_text(path) {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            tracing::warn!("no text extracted");
            events.log(format!("テキストを抽出できませんでした: {}", name));
            None
        }
        Err(e) => {
            tracing::warn!("extraction failed: {}", e);
            events.log(format!("テキスト抽出に失敗しました ({}): {}", name, e));
            None
        }
    };

    let ai_result = text.as_deref().and_then(|text| {
        match request_fields(client, &config.model_name, plan, text) {
            Ok(map) => {
                events.log(format!("AI処理が完了しました: {}", name));
                events.send(Event::AiResult(pretty_fields(&map)));
                Some(map)
            }
            Err(e) => {
                tracing::warn!("completion failed: {}", e);
                events.log(format!("AI処理に失敗しました ({}): {}", name, e));
                None
            }
        }
    });

    FileRecord::build(
        path.to_string_lossy(),
        &plan.requested,
        ai_result.as_ref(),
        text.is_some(),
    )
}

/// プロンプト生成 → 補完 → JSON解析（再試行なし）
fn request_fields(
    client: &dyn CompletionClient,
    model: &str,
    plan: &FieldPlan,
    text: &str,
) -> Result<FieldMap> {
    let prompts = build_prompts(&plan.requested, &plan.instructions, text);
    tracing::debug!(
        system_chars = prompts.system.chars().count(),
        user_chars = prompts.user.chars().count(),
        "prompts built"
    );

    let request = CompletionRequest::extraction(&prompts.system, &prompts.user, model);
    let raw = client.complete(&request)?;
    Ok(parse_fields(&raw)?)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// 実行中のバッチ
pub struct RunHandle {
    events: EventReceiver,
    cancel: CancellationSignal,
    join: JoinHandle<RunReport>,
}

impl RunHandle {
    /// 溜まったイベントを取り出す（待たない）
    pub fn drain(&self) -> Vec<Event> {
        self.events.drain()
    }

    /// 停止を要求する（現在のファイルの処理後に止まる）
    ///
    /// 通知のログはワーカー側が出すので、終了後に呼んでもイベントは増えない。
    pub fn request_stop(&self) {
        self.cancel.cancel();
    }

    /// 終了を待って結果を返す
    pub fn join(self) -> RunReport {
        self.join.join().unwrap_or_else(|_| RunReport::aborted())
    }

    /// 終了を待ち、残りのイベントと結果を返す
    pub fn wait(self) -> (Vec<Event>, RunReport) {
        let Self { events, join, .. } = self;
        let report = join.join().unwrap_or_else(|_| RunReport::aborted());
        (events.drain(), report)
    }
}

/// 専用スレッドでバッチを開始する
pub fn spawn_run(config: RunConfig, ctx: RunContext) -> Result<RunHandle> {
    let (tx, rx) = channel();
    let cancel = ctx.cancel_signal();

    let join = std::thread::Builder::new()
        .name(WORKER_THREAD_NAME.into())
        .spawn(move || {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| execute(&config, ctx, &tx)));
            let report = outcome.unwrap_or_else(|_| {
                tx.log("内部エラーにより処理を中断しました");
                RunReport::aborted()
            });
            tx.send(Event::TaskDone);
            report
        })
        .map_err(|e| PaperAiError::WorkerSpawn(e.to_string()))?;

    Ok(RunHandle {
        events: rx,
        cancel,
        join,
    })
}
