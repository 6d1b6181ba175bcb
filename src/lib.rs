// ==========================================
// 平衡市场容量中标导入 - 核心库
// ==========================================
// 职责: 将 regelleistung.net 招标结果文件（Excel / CSV）
//       规范化为统一的容量中标记录并追加写入 SQLite
// 技术栈: Rust + calamine + csv + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 分类 / 提取 / 规范化
pub mod importer;

// 配置层 - 提取参数
pub mod config;

// 数据仓储层 - 中标记录写入
pub mod repository;

// 源文件层 - 文件命名与获取
pub mod source;

// 流水线层 - 单次处理编排
pub mod pipeline;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Direction, ExtractionStrategy};

// 领域实体
pub use domain::{CanonicalAwardRecord, RawRecordBatch, RawValue, SourceFile, TenderRequest};

// 导入
pub use importer::{AwardImporter, AwardImporterImpl, ImportError, SchemaNormalizer};

// 配置
pub use config::{ConfigManager, ExtractionSettings};

// 写入
pub use repository::{AwardSink, SqliteAwardSink};

// 流水线
pub use pipeline::{AwardPipeline, BatchReport, PipelineError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "regelleistung-awards";
