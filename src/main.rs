use anyhow::{bail, Context, Result};
use clap::Parser;
use paper_ai_common::CapabilityFlags;
use paper_ai_rust::cli::{Cli, Commands};
use paper_ai_rust::completion::{CompletionClient, OpenAiClient};
use paper_ai_rust::config::{Config, RunConfig};
use paper_ai_rust::console::ConsoleObserver;
use paper_ai_rust::export::default_output_path;
use paper_ai_rust::pipeline::{self, CancellationSignal, RunContext, RunStatus};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// イベント取り出し間隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::Run {
            folder,
            output,
            no_translate,
            no_summarize,
            api_key,
            base_url,
            model,
        } => {
            println!("📄 paper-ai - 論文PDF一括解析\n");

            let key_from_arg = api_key.is_some();
            let api_key = match api_key {
                Some(key) => key,
                None => config.get_api_key()?,
            };
            let base_url = base_url.unwrap_or_else(|| config.base_url.clone());
            let model = model.unwrap_or_else(|| config.model_name.clone());
            if model.trim().is_empty() {
                bail!("モデルが設定されていません。--model を指定するか `paper-ai models --select <ID>` で保存してください");
            }

            let folder = absolute_path(folder)?;
            let output = output
                .unwrap_or_else(|| default_output_path(&folder, chrono::Local::now().date_naive()));
            let flags = CapabilityFlags {
                translate: !no_translate,
                summarize: !no_summarize,
            };

            let run_config = RunConfig::new(api_key, base_url, model, folder, output, flags)?;

            // 接続設定は実行後に保存（環境変数のキーは書き込まない）
            let mut saved = run_config.connection();
            if !key_from_arg {
                saved.api_key = config.api_key.clone();
            }

            let status = execute_run(run_config).await?;

            saved.save().context("設定の保存に失敗しました")?;

            if status == RunStatus::Aborted {
                bail!("処理を中断しました");
            }
        }

        Commands::Models { select } => {
            let api_key = config.get_api_key()?;
            let base_url = config.base_url.clone();

            let (events, handle) = pipeline::spawn_model_fetch(
                move || -> paper_ai_rust::error::Result<Box<dyn CompletionClient>> {
                    let client = OpenAiClient::new(&api_key, &base_url)?;
                    Ok(Box::new(client))
                },
            )?;

            let mut observer = ConsoleObserver::new();
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            while !handle.is_finished() {
                interval.tick().await;
                observer.handle_all(events.drain());
            }
            let models = handle
                .join()
                .map_err(|_| anyhow::anyhow!("モデル取得スレッドが異常終了しました"))?;
            observer.handle_all(events.drain());

            let Some(models) = models else {
                bail!("モデル一覧を取得できませんでした");
            };

            let mut config = config;
            if let Some(select) = select {
                if models.contains(&select) {
                    config.model_name = select;
                    config.save()?;
                    println!("\n✔ モデルを保存しました: {}", config.model_name);
                } else {
                    println!("\n⚠ 一覧にないモデルです: {}（現在の設定を維持します）", select);
                }
            }
            println!("現在のモデル: {}", display_or_unset(&config.model_name));
        }

        Commands::Config {
            set_api_key,
            set_base_url,
            set_model,
            show,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(key) = set_api_key {
                let key = if key.is_empty() {
                    dialoguer::Password::new()
                        .with_prompt("APIキー")
                        .interact()
                        .context("APIキーの入力に失敗しました")?
                } else {
                    key
                };
                config.api_key = key.trim().to_string();
                println!("✔ APIキーを設定しました");
                changed = true;
            }

            if let Some(url) = set_base_url {
                config.base_url = url.trim().to_string();
                println!("✔ ベースURLを設定しました: {}", config.base_url);
                changed = true;
            }

            if let Some(model) = set_model {
                config.model_name = model.trim().to_string();
                println!("✔ モデルを設定しました: {}", config.model_name);
                changed = true;
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!("APIキー: {}", config.masked_api_key());
                println!("ベースURL: {}", config.base_url);
                println!("モデル: {}", display_or_unset(&config.model_name));
            }
        }
    }

    Ok(())
}

/// ワーカースレッドで実行し、終了までイベントを表示する
async fn execute_run(run_config: RunConfig) -> Result<RunStatus> {
    let handle = pipeline::spawn_run(run_config, RunContext::openai(CancellationSignal::new()))?;

    let mut observer = ConsoleObserver::new();
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut stop_requested = false;

    while !observer.is_done() {
        tokio::select! {
            _ = interval.tick() => {
                observer.handle_all(handle.drain());
            }
            result = &mut ctrl_c, if !stop_requested => {
                if let Err(e) = result {
                    tracing::warn!("ctrl-c handler failed: {}", e);
                }
                stop_requested = true;
                handle.request_stop();
            }
        }
    }

    let report = tokio::task::spawn_blocking(move || handle.join())
        .await
        .context("ワーカースレッドの終了待ちに失敗しました")?;

    println!();
    println!("✔ {}件のPDFを処理しました", report.records.len());
    if let Some(path) = &report.output {
        println!("✔ Excel出力: {}", path.display());
    }

    Ok(report.status)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "paper_ai_rust=debug,paper_ai_common=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn absolute_path(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("カレントディレクトリを取得できません")?;
    Ok(cwd.join(path))
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "未設定"
    } else {
        value
    }
}
