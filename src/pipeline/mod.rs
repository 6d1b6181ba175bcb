// ==========================================
// 平衡市场容量中标导入 - 流水线层
// ==========================================
// 职责: 串联获取 / 导入 / 写入，汇总每个文件的处理结果
// ==========================================

pub mod award_pipeline;
pub mod error;

pub use award_pipeline::{AwardPipeline, BatchReport, FailedFile, PassOutcome};
pub use error::{PipelineError, PipelineResult};
