// ==========================================
// 平衡市场容量中标导入 - 配置层
// ==========================================
// 职责: 提取配置管理，运行前一次性解析为快照
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod extraction_settings;
pub mod import_config_trait;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use extraction_settings::ExtractionSettings;
pub use import_config_trait::ExtractionConfigReader;
