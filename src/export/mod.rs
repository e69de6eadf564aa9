pub mod excel;

pub use excel::write_table;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// 出力先を指定しなかったときのファイル名
pub fn default_output_file_name(date: NaiveDate) -> String {
    format!("summary_output_{}.xlsx", date.format("%Y%m%d"))
}

/// 入力フォルダ直下に日付付きのExcelファイル名を置く
pub fn default_output_path(folder: &Path, date: NaiveDate) -> PathBuf {
    folder.join(default_output_file_name(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(default_output_file_name(date), "summary_output_20240307.xlsx");
        assert_eq!(
            default_output_path(Path::new("/data/papers"), date),
            PathBuf::from("/data/papers/summary_output_20240307.xlsx")
        );
    }
}
