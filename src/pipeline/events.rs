//! ワーカー → 表示側のイベント
//!
//! 送信側はブロックしない（mpscの無制限チャネル）。受信側は定期的に
//! `drain` して溜まった分をまとめて処理する。

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// 進捗・エラーの1行
    Log(String),
    /// 1ファイル分の抽出結果（整形済みJSON）
    AiResult(String),
    /// 取得したモデルID一覧（ソート済み）
    ModelList(Vec<String>),
    /// ファイル処理開始（1始まり）
    Progress { current: usize, total: usize },
    /// タスク終了（必ず最後に1回）
    TaskDone,
}

#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// 受信側が閉じていても無視する
    pub fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    pub fn log(&self, message: impl Into<String>) {
        self.send(Event::Log(message.into()));
    }
}

#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<Event>,
}

impl EventReceiver {
    /// 今ある分をすべて取り出す（待たない）
    pub fn drain(&self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}
