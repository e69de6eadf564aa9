//! モデル一覧の取得

use super::events::{channel, Event, EventReceiver, EventSender};
use crate::completion::CompletionClient;
use crate::error::{PaperAiError, Result};
use std::thread::JoinHandle;

/// モデル一覧を取得してイベントで通知する
///
/// 成功時は `ModelList`（ソート済み）を送り、一覧を返す。失敗はログのみ。
pub fn fetch_models<F>(connect: F, events: &EventSender) -> Option<Vec<String>>
where
    F: FnOnce() -> Result<Box<dyn CompletionClient>>,
{
    events.log("モデル一覧を取得しています...");

    let result = connect().and_then(|client| client.list_models());
    match result {
        Ok(mut models) => {
            models.sort();
            models.dedup();
            events.send(Event::ModelList(models.clone()));
            events.log(format!("モデル一覧を更新しました（{}件）", models.len()));
            Some(models)
        }
        Err(e) => {
            tracing::warn!("model fetch failed: {}", e);
            events.log(format!("モデル一覧の取得に失敗しました: {}", e));
            None
        }
    }
}

/// 別スレッドでモデル一覧を取得する
pub fn spawn_model_fetch<F>(connect: F) -> Result<(EventReceiver, JoinHandle<Option<Vec<String>>>)>
where
    F: FnOnce() -> Result<Box<dyn CompletionClient>> + Send + 'static,
{
    let (tx, rx) = channel();
    let handle = std::thread::Builder::new()
        .name("model-fetch".into())
        .spawn(move || fetch_models(connect, &tx))
        .map_err(|e| PaperAiError::WorkerSpawn(e.to_string()))?;
    Ok((rx, handle))
}
