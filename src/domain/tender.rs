// ==========================================
// 平衡市场容量中标导入 - 招标文件请求模型
// ==========================================
// 职责: 产品/市场组合、导出格式、本地源文件句柄
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 默认拉取的产品/市场组合
pub const DEFAULT_COMBOS: [(&str, &str); 6] = [
    ("FCR", "CAPACITY"),
    ("aFRR", "CAPACITY"),
    ("mFRR", "CAPACITY"),
    ("FCR", "ENERGY"),
    ("aFRR", "ENERGY"),
    ("mFRR", "ENERGY"),
];

// ==========================================
// 导出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// 解析导出格式（大小写不敏感，非 csv 一律按 xlsx）
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Xlsx
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

// ==========================================
// TenderRequest - 单个招标文件请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderRequest {
    pub product: String,
    pub market: String,
    pub delivery_date: NaiveDate,
    pub export_format: ExportFormat,
}

impl TenderRequest {
    pub fn new(
        product: impl Into<String>,
        market: impl Into<String>,
        delivery_date: NaiveDate,
        export_format: ExportFormat,
    ) -> Self {
        Self {
            product: product.into(),
            market: market.into(),
            delivery_date,
            export_format,
        }
    }

    /// 生成默认组合的请求列表
    pub fn default_combos(delivery_date: NaiveDate, export_format: ExportFormat) -> Vec<Self> {
        DEFAULT_COMBOS
            .iter()
            .map(|(product, market)| Self::new(*product, *market, delivery_date, export_format))
            .collect()
    }

    /// 组合标签，如 `FCR-CAPACITY`
    pub fn combo_label(&self) -> String {
        format!("{}-{}", self.product, self.market)
    }
}

// ==========================================
// SourceFile - 待提取的本地文件
// ==========================================
// 说明: file_name 为分类与溯源依据，独立于 path 保存
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl SourceFile {
    /// 以路径末段作为文件名
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, file_name }
    }

    /// 小写扩展名（无扩展名时为空串）
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_label() {
        assert_eq!(ExportFormat::from_label("CSV"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_label("xlsx"), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_label("xml"), ExportFormat::Xlsx);
    }

    #[test]
    fn test_default_combos() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let requests = TenderRequest::default_combos(date, ExportFormat::Xlsx);
        assert_eq!(requests.len(), 6);
        assert_eq!(requests[0].combo_label(), "FCR-CAPACITY");
        assert_eq!(requests[5].combo_label(), "mFRR-ENERGY");
    }

    #[test]
    fn test_source_file_from_path() {
        let source = SourceFile::from_path("data/20250301_regelleistung_FCR_CAPACITY.XLSX");
        assert_eq!(source.file_name, "20250301_regelleistung_FCR_CAPACITY.XLSX");
        assert_eq!(source.extension(), "xlsx");
    }
}
