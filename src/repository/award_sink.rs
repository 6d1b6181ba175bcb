// ==========================================
// 平衡市场容量中标导入 - 中标记录写入 Trait
// ==========================================
// 职责: 定义规范记录的只追加写入接口（不包含业务逻辑）
// 红线: 只有 append，没有 update/delete
// ==========================================

use crate::domain::award::CanonicalAwardRecord;
use crate::repository::error::RepositoryResult;

// ==========================================
// AwardSink Trait
// ==========================================
// 用途: 规范中标记录落库
// 实现者: SqliteAwardSink（使用 rusqlite）
pub trait AwardSink: Send + Sync {
    /// 追加写入（事务化）
    ///
    /// # 参数
    /// - records: 规范记录（调用方保证非空；空切片直接返回 0）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    /// - Err: 记录违反入库不变式或数据库错误（整个事务回滚）
    fn append(&self, records: &[CanonicalAwardRecord]) -> RepositoryResult<usize>;
}
