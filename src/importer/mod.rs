// ==========================================
// 平衡市场容量中标导入 - 导入层
// ==========================================
// 职责: 源文件 → 规范中标记录
// 支持: 无表头网格电子表格, 带表头电子表格, 分号分隔 CSV
// ==========================================

// 模块声明
pub mod award_importer;
pub mod classifier;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod grid_extractor;
pub mod importer_trait;
pub mod normalizer;
pub mod tabular_extractor;

// 重导出核心类型
pub use award_importer::AwardImporterImpl;
pub use classifier::{FileClassifier, LayoutKind};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{AliasTable, CanonicalField};
pub use grid_extractor::{DirectionRange, DirectionRangeTable, GridExtractor};
pub use normalizer::{NormalizationReport, NormalizedBatch, SchemaNormalizer};
pub use tabular_extractor::TabularExtractor;

// 重导出 Trait 接口
pub use importer_trait::{AwardImporter, Extractor, ImportOutcome};
