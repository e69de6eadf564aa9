//! Paper AI Common Library
//!
//! バッチ処理本体（CLI）から使う純粋なロジック:
//! 列定義・プロンプト生成・応答パース・結果行

pub mod error;
pub mod export;
pub mod fields;
pub mod parser;
pub mod prompts;
pub mod types;

pub use error::{Error, Result};
pub use fields::{resolve, CapabilityFlags, CapabilityGroup, FieldPlan};
pub use parser::{field_value_to_string, parse_fields, pretty_fields, strip_code_fence, FieldMap};
pub use prompts::{build_prompts, PromptPair, MAX_DOCUMENT_CHARS};
pub use types::{FileRecord, PLACEHOLDER_EXTRACTION_FAILED, PLACEHOLDER_NOT_FOUND};
