// ==========================================
// 平衡市场容量中标导入 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑，只追加不修改
// 约束: 所有写入使用参数化 SQL
// ==========================================

pub mod award_sink;
pub mod award_sink_impl;
pub mod error;

// 重导出核心仓储
pub use award_sink::AwardSink;
pub use award_sink_impl::SqliteAwardSink;
pub use error::{RepositoryError, RepositoryResult};
