// ==========================================
// 平衡市场容量中标导入 - 中标记录领域模型
// ==========================================
// 职责: 原始批次（提取器输出）与规范记录（入库形态）
// 红线: CanonicalAwardRecord 固定五列，只追加不修改
// ==========================================

use crate::domain::types::{Direction, ExtractionStrategy};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 规范表的列顺序（任何提取策略下都一致）
pub const CANONICAL_COLUMNS: [&str; 5] = [
    "delivery_date",
    "product",
    "direction",
    "awarded_capacity_mw",
    "source_file",
];

// ==========================================
// RawValue - 原始单元格值
// ==========================================
// 用途: 表格/网格单元格在进入规范化之前的形态
// 说明: 文本保留原样，数值与日期保留源文件中的类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl RawValue {
    /// 文本构造，空白文本视为 Empty
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }

    /// 单元格的文本形式
    ///
    /// - 日期时间: `YYYY-MM-DD HH:MM:SS`
    /// - 日期: `YYYY-MM-DD`
    /// - 数值: 最短十进制表示（整数不带小数点）
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            RawValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            RawValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// ==========================================
// RawRecordBatch - 原始记录批次
// ==========================================
// 用途: 提取器输出，列集合随提取器变化（可能是德语列名/历史列名）
// 生命周期: 单次流水线内有效，规范化后丢弃
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecordBatch {
    pub source_file: String,
    pub strategy: ExtractionStrategy,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawRecordBatch {
    /// 创建空批次（保留来源标记）
    pub fn empty(source_file: impl Into<String>, strategy: ExtractionStrategy) -> Self {
        Self {
            source_file: source_file.into(),
            strategy,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 查找列下标（精确匹配）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// 读取某行某列的值，越界返回 Empty
    pub fn value(&self, row: usize, column: usize) -> &RawValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&RawValue::Empty)
    }
}

// ==========================================
// CanonicalAwardRecord - 规范中标记录
// ==========================================
// 红线: awarded_capacity_mw > 0，source_file 非空
// 对齐: capacity_awards 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalAwardRecord {
    pub delivery_date: Option<NaiveDate>, // 交付日（无时间部分，可缺失）
    pub product: String,                  // 产品（缺省 "UNKNOWN"）
    pub direction: Direction,             // 方向（缺省 unknown）
    pub awarded_capacity_mw: f64,         // 中标容量 MW（严格 > 0）
    pub source_file: String,              // 来源文件名
}

impl CanonicalAwardRecord {
    /// 校验入库不变式
    pub fn is_storable(&self) -> bool {
        self.awarded_capacity_mw.is_finite()
            && self.awarded_capacity_mw > 0.0
            && !self.source_file.trim().is_empty()
            && !self.product.trim().is_empty()
    }
}
