//! 出力フィールド定義（能力グループ）
//!
//! AIに要求する列と、その列を引き出す指示文の組をグループ単位で管理する:
//! - metadata: 書誌情報（常に有効）
//! - translate: タイトル・要旨の翻訳（任意）
//! - summarize: 要約と結論（任意）
//!
//! 列順は `file_path` → metadata → translate → summarize で固定。

/// 全行に付く基本列（AIには要求しない）
pub const BASE_COLUMNS: &[&str] = &["file_path"];

/// 能力グループ: 出力列と指示文の組
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityGroup {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub instructions: &'static str,
}

pub const METADATA: CapabilityGroup = CapabilityGroup {
    name: "metadata",
    columns: &[
        "journal_name",
        "title",
        "authors",
        "publication_year",
        "abstract",
        "doi",
    ],
    instructions: "- `journal_name`: the journal or conference where the paper was published.
- `title`: the original title of the paper.
- `authors`: all authors, separated by \", \" (comma and space).
- `publication_year`: the year of publication (4 digits).
- `abstract`: the original abstract, verbatim.
- `doi`: the DOI of the article.",
};

pub const TRANSLATE: CapabilityGroup = CapabilityGroup {
    name: "translate",
    columns: &["title_translated", "abstract_translated"],
    instructions: "- `title_translated`: the original title translated into Simplified Chinese.
- `abstract_translated`: the abstract translated into plain, concise Simplified Chinese.",
};

pub const SUMMARIZE: CapabilityGroup = CapabilityGroup {
    name: "summarize",
    columns: &["article_summary", "conclusion_opinion"],
    instructions: "- `article_summary`: one sentence (Simplified Chinese) stating the core finding.
- `conclusion_opinion`: the detailed conclusions and main results in clear, well-structured Simplified Chinese, as points or short paragraphs.",
};

/// 任意グループの有効/無効
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityFlags {
    pub translate: bool,
    pub summarize: bool,
}

impl CapabilityFlags {
    pub fn all() -> Self {
        Self {
            translate: true,
            summarize: true,
        }
    }
}

/// 1回の実行で使う列計画
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    /// Excelの列順（基本列を含む）
    pub columns: Vec<&'static str>,
    /// AIに要求するキー（基本列を除く）
    pub requested: Vec<&'static str>,
    /// 有効グループの指示文を空行で連結したもの
    pub instructions: String,
}

/// 有効なグループを固定順で返す（metadataは常に先頭）
pub fn enabled_groups(flags: CapabilityFlags) -> Vec<&'static CapabilityGroup> {
    let mut groups = vec![&METADATA];
    if flags.translate {
        groups.push(&TRANSLATE);
    }
    if flags.summarize {
        groups.push(&SUMMARIZE);
    }
    groups
}

/// フラグから列計画を組み立てる
pub fn resolve(flags: CapabilityFlags) -> FieldPlan {
    let groups = enabled_groups(flags);

    let requested: Vec<&'static str> = groups
        .iter()
        .flat_map(|g| g.columns.iter().copied())
        .collect();

    let mut columns = BASE_COLUMNS.to_vec();
    columns.extend(requested.iter().copied());

    let instructions = groups
        .iter()
        .map(|g| g.instructions)
        .collect::<Vec<_>>()
        .join("\n\n");

    FieldPlan {
        columns,
        requested,
        instructions,
    }
}
