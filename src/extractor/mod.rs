//! PDFテキスト抽出
//!
//! パイプラインからは `TextExtractor` トレイト越しに使う。

use crate::error::{PaperAiError, Result};
use std::path::Path;

/// ファイルから本文テキストを取り出す
pub trait TextExtractor: Send {
    /// 抽出できたテキスト（空の場合もある）を返す
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// lopdfによる抽出
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let _span = tracing::debug_span!("extractor.lopdf", path = %path.display()).entered();

        let bytes = std::fs::read(path)?;
        let doc = lopdf::Document::load_mem(&bytes)
            .map_err(|e| PaperAiError::Extraction(format!("{}: {}", path.display(), e)))?;

        let mut pages = Vec::new();
        for (page_num, _) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) => pages.push(text),
                // 読めないページは飛ばして残りを使う
                Err(e) => tracing::debug!("page {} skipped: {}", page_num, e),
            }
        }

        Ok(pages.join("\n").trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Document, Object, Stream};
    use tempfile::NamedTempFile;

    fn build_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", text);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extract_embedded_text() {
        let file = NamedTempFile::with_suffix(".pdf").unwrap();
        std::fs::write(file.path(), build_pdf("Soil Carbon Study")).unwrap();

        let text = LopdfExtractor.extract_text(file.path()).unwrap();
        assert!(text.contains("Soil Carbon Study"), "extracted: {:?}", text);
    }

    #[test]
    fn test_corrupted_pdf_is_extraction_error() {
        let file = NamedTempFile::with_suffix(".pdf").unwrap();
        std::fs::write(file.path(), b"not a valid pdf content").unwrap();

        let result = LopdfExtractor.extract_text(file.path());
        assert!(matches!(result, Err(PaperAiError::Extraction(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = LopdfExtractor.extract_text(Path::new("/nonexistent/file.pdf"));
        assert!(matches!(result, Err(PaperAiError::Io(_))));
    }
}
