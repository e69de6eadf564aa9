//! ターミナル表示
//!
//! ワーカーからのイベントを受けて描画するだけで、処理の状態は持たない。

use crate::pipeline::Event;
use indicatif::{ProgressBar, ProgressStyle};

const RESULT_SEPARATOR_WIDTH: usize = 50;

pub struct ConsoleObserver {
    progress: Option<ProgressBar>,
    done: bool,
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            progress: None,
            done: false,
        }
    }

    /// `TaskDone` を受け取ったか
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Log(message) => self.println(&message),
            Event::AiResult(json) => {
                self.println(&format!("{}\n{}", json, "-".repeat(RESULT_SEPARATOR_WIDTH)));
            }
            Event::ModelList(models) => {
                for model in models {
                    self.println(&format!("  {}", model));
                }
            }
            Event::Progress { current, total } => {
                let bar = self
                    .progress
                    .get_or_insert_with(|| new_progress_bar(total as u64));
                bar.set_length(total as u64);
                bar.set_position(current.saturating_sub(1) as u64);
            }
            Event::TaskDone => {
                if let Some(bar) = self.progress.take() {
                    bar.finish_and_clear();
                }
                self.done = true;
            }
        }
    }

    pub fn handle_all(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.handle(event);
        }
    }

    /// プログレスバーを崩さずに1行出力
    fn println(&self, message: &str) {
        match &self.progress {
            Some(bar) => bar.println(message),
            None => println!("{}", message),
        }
    }
}

fn new_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {elapsed}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
