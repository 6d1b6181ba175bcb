// ==========================================
// 平衡市场容量中标导入 - 流水线错误类型
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 流水线错误类型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("写入失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("后台任务失败: {0}")]
    TaskJoin(String),
}

/// Result 类型别名
pub type PipelineResult<T> = Result<T, PipelineError>;
