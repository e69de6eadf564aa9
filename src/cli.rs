use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paper-ai")]
#[command(about = "論文PDF一括AI解析・Excel一覧生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダ内のPDFを解析してExcelに出力
    Run {
        /// PDFフォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力Excelファイル（デフォルト: 入力フォルダ/summary_output_YYYYMMDD.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// タイトル・要旨の翻訳を行わない
        #[arg(long)]
        no_translate: bool,

        /// 要約・結論の生成を行わない
        #[arg(long)]
        no_summarize: bool,

        /// APIキー（保存値・環境変数より優先）
        #[arg(long)]
        api_key: Option<String>,

        /// APIのベースURL
        #[arg(long)]
        base_url: Option<String>,

        /// 使用するモデルID
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 利用可能なモデル一覧を取得
    Models {
        /// 一覧にあればこのモデルを保存
        #[arg(long)]
        select: Option<String>,
    },

    /// 設定の確認・変更
    Config {
        /// APIキーを保存（値を省略すると入力を求める）
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        set_api_key: Option<String>,

        /// APIのベースURLを保存
        #[arg(long)]
        set_base_url: Option<String>,

        /// 既定のモデルIDを保存
        #[arg(long)]
        set_model: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::parse_from(["paper-ai", "run", "/data/papers"]);
        match cli.command {
            Commands::Run {
                folder,
                output,
                no_translate,
                no_summarize,
                model,
                ..
            } => {
                assert_eq!(folder, PathBuf::from("/data/papers"));
                assert!(output.is_none());
                assert!(!no_translate);
                assert!(!no_summarize);
                assert!(model.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_set_api_key_without_value() {
        let cli = Cli::parse_from(["paper-ai", "config", "--set-api-key"]);
        match cli.command {
            Commands::Config { set_api_key, .. } => assert_eq!(set_api_key.as_deref(), Some("")),
            _ => panic!("expected config"),
        }

        let cli = Cli::parse_from(["paper-ai", "config", "--set-api-key", "sk-abc"]);
        match cli.command {
            Commands::Config { set_api_key, .. } => {
                assert_eq!(set_api_key.as_deref(), Some("sk-abc"))
            }
            _ => panic!("expected config"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["paper-ai", "models", "-v"]);
        assert!(cli.verbose);
    }
}
