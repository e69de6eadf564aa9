use crate::error::{PaperAiError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const PDF_EXTENSION: &str = "pdf";

/// 拡張子がPDFか（大文字小文字を区別しない）
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(PDF_EXTENSION))
        .unwrap_or(false)
}

/// フォルダ直下のPDFファイルを列挙
///
/// 並び順はディレクトリの列挙順のまま（ソートしない）。
/// フォルダ自体が読めない場合はエラー、個々のエントリの読み取り失敗は読み飛ばす。
pub fn list_pdf_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(PaperAiError::FolderNotFound(folder.display().to_string()));
    }
    // 権限エラー等はここで表面化させる
    std::fs::read_dir(folder)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_pdf_path(path) {
            continue;
        }

        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        files.push(absolute);
    }

    Ok(files)
}
