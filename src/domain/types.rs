// ==========================================
// 平衡市场容量中标导入 - 领域类型定义
// ==========================================
// 职责: 方向枚举 / 提取策略枚举
// 序列化格式: lowercase (与 capacity_awards 表一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 调节方向 (Direction)
// ==========================================
// 红线: 无法识别时一律落为 Unknown,不报错
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Symmetric, // 对称
    Positive,  // 正向
    Negative,  // 负向
    Unknown,   // 未解析
}

impl Direction {
    /// 入库使用的文本形式
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Symmetric => "symmetric",
            Direction::Positive => "positive",
            Direction::Negative => "negative",
            Direction::Unknown => "unknown",
        }
    }

    /// 解析源文件中的方向标签（大小写不敏感，兼容德语写法）
    ///
    /// # 返回
    /// - 已知标签 → 对应方向
    /// - 空值/未知标签 → Direction::Unknown
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "symmetric" | "symmetrisch" | "sym" => Direction::Symmetric,
            "positive" | "positiv" | "pos" | "up" => Direction::Positive,
            "negative" | "negativ" | "neg" | "down" => Direction::Negative,
            _ => Direction::Unknown,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 提取策略 (Extraction Strategy)
// ==========================================
// 原始批次的来源标记,随 RawRecordBatch 传递
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    Grid,    // 无表头位置网格
    Tabular, // 带表头表格
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Grid => write!(f, "grid"),
            ExtractionStrategy::Tabular => write!(f, "tabular"),
        }
    }
}
