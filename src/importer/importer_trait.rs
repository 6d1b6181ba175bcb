// ==========================================
// 平衡市场容量中标导入 - 导入层 Trait
// ==========================================
// 职责: 定义提取器与导入器接口（不包含实现）
// ==========================================

use crate::domain::award::{CanonicalAwardRecord, RawRecordBatch};
use crate::domain::tender::SourceFile;
use crate::domain::types::ExtractionStrategy;
use crate::importer::error::ImportResult;

// ==========================================
// Extractor Trait
// ==========================================
// 用途: 单个文件 → 原始记录批次
// 实现者: GridExtractor, TabularExtractor
// 约束: 纯函数语义，不持有跨文件状态
pub trait Extractor: Send + Sync {
    /// 提取策略标记
    fn strategy(&self) -> ExtractionStrategy;

    /// 提取原始记录批次
    ///
    /// # 返回
    /// - Ok(RawRecordBatch): 可能为空批次（结构中没有可用数据）
    /// - Err: 文件不可读/格式不适用于本提取器
    fn extract(&self, source: &SourceFile) -> ImportResult<RawRecordBatch>;
}

// ==========================================
// AwardImporter Trait
// ==========================================
// 用途: 分类 → 提取 → 规范化 的完整导入
// 实现者: AwardImporterImpl
pub trait AwardImporter: Send + Sync {
    /// 导入单个文件为规范记录
    ///
    /// # 返回
    /// - Ok(Vec): 规范记录（可能为空，调用方应跳过写入）
    /// - Err: 致命的文件/格式错误
    fn import_file(&self, source: &SourceFile) -> ImportResult<ImportOutcome>;
}

/// 单文件导入结果
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub source_file: String,
    pub strategy: ExtractionStrategy,
    pub raw_rows: usize,
    pub records: Vec<CanonicalAwardRecord>,
}
