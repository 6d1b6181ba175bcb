// ==========================================
// 平衡市场容量中标导入 - 领域模型层
// ==========================================
// 职责: 定义原始批次、规范记录、招标请求等领域类型
// 红线: 不含数据访问逻辑,不含解析逻辑
// ==========================================

pub mod award;
pub mod tender;
pub mod types;

// 重导出核心类型
pub use award::{CanonicalAwardRecord, RawRecordBatch, RawValue, CANONICAL_COLUMNS};
pub use tender::{ExportFormat, SourceFile, TenderRequest, DEFAULT_COMBOS};
pub use types::{Direction, ExtractionStrategy};
