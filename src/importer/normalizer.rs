// ==========================================
// 平衡市场容量中标导入 - 规范化器
// ==========================================
// 职责: 任意原始批次 → 固定五列的 CanonicalAwardRecord
// 解析顺序:
// - delivery_date: 规范名/历史别名，均无 → 缺失（此处不丢行）
// - product: 规范名/历史别名，均无或空值 → "UNKNOWN"
// - direction: 规范名/历史别名，均无或无法识别 → unknown
// - awarded_capacity_mw: 按候选列表探测，取第一个存在的列，转换失败 → 缺失
// 过滤顺序: 缺失容量 → 容量 <= 0
// ==========================================

use crate::config::ExtractionSettings;
use crate::domain::award::{CanonicalAwardRecord, RawRecordBatch, RawValue};
use crate::domain::types::Direction;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::{AliasTable, CanonicalField, ResolvedColumn};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

/// 未解析产品的缺省值
pub const UNKNOWN_PRODUCT: &str = "UNKNOWN";

/// 批次缺少来源标记时使用的占位文件名
pub const UNKNOWN_SOURCE_FILE: &str = "unknown_file";

/// 单批次规范化统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub input_rows: usize,
    pub dropped_missing_capacity: usize,
    pub dropped_non_positive_capacity: usize,
    pub emitted: usize,
    pub delivery_date_column: Option<String>,
    pub product_column: Option<String>,
    pub direction_column: Option<String>,
    pub capacity_column: Option<String>,
}

/// 规范化结果
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub records: Vec<CanonicalAwardRecord>,
    pub report: NormalizationReport,
}

/// 一个批次内各字段的解析结果（按列，不按行）
struct FieldColumns {
    delivery_date: Option<ResolvedColumn>,
    product: Option<ResolvedColumn>,
    direction: Option<ResolvedColumn>,
    capacity: Option<ResolvedColumn>,
}

pub struct SchemaNormalizer {
    alias_table: AliasTable,
    cleaner: DataCleaner,
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new(AliasTable::default(), DataCleaner::default())
    }
}

impl SchemaNormalizer {
    pub fn new(alias_table: AliasTable, cleaner: DataCleaner) -> Self {
        Self {
            alias_table,
            cleaner,
        }
    }

    pub fn from_settings(settings: &ExtractionSettings) -> Self {
        Self::new(AliasTable::default(), DataCleaner::from_settings(settings))
    }

    /// 规范化，只返回记录
    pub fn normalize(&self, batch: &RawRecordBatch) -> Vec<CanonicalAwardRecord> {
        self.normalize_with_report(batch).records
    }

    /// 规范化并返回统计
    pub fn normalize_with_report(&self, batch: &RawRecordBatch) -> NormalizedBatch {
        let fields = self.resolve_columns(batch);
        let source_file = if batch.source_file.trim().is_empty() {
            warn!("批次缺少来源文件标记，使用占位文件名");
            UNKNOWN_SOURCE_FILE.to_string()
        } else {
            batch.source_file.clone()
        };

        let mut report = NormalizationReport {
            input_rows: batch.len(),
            delivery_date_column: fields.delivery_date.as_ref().map(|c| c.name.clone()),
            product_column: fields.product.as_ref().map(|c| c.name.clone()),
            direction_column: fields.direction.as_ref().map(|c| c.name.clone()),
            capacity_column: fields.capacity.as_ref().map(|c| c.name.clone()),
            ..Default::default()
        };

        if fields.capacity.is_none() && !batch.is_empty() {
            warn!(
                source_file = %source_file,
                columns = ?batch.columns,
                "找不到任何中标容量列，所有行将被丢弃"
            );
        }

        let mut records = Vec::with_capacity(batch.len());
        for row_idx in 0..batch.len() {
            // === 容量过滤（缺失 → 非正） ===
            let capacity = match fields
                .capacity
                .as_ref()
                .and_then(|c| self.coerce_capacity(batch.value(row_idx, c.index)))
            {
                Some(value) => value,
                None => {
                    report.dropped_missing_capacity += 1;
                    continue;
                }
            };
            if capacity <= 0.0 {
                report.dropped_non_positive_capacity += 1;
                continue;
            }

            records.push(CanonicalAwardRecord {
                delivery_date: fields
                    .delivery_date
                    .as_ref()
                    .and_then(|c| self.coerce_date(batch.value(row_idx, c.index))),
                product: fields
                    .product
                    .as_ref()
                    .map(|c| batch.value(row_idx, c.index).to_text().trim().to_string())
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                direction: fields
                    .direction
                    .as_ref()
                    .map(|c| Direction::from_label(&batch.value(row_idx, c.index).to_text()))
                    .unwrap_or(Direction::Unknown),
                awarded_capacity_mw: capacity,
                source_file: source_file.clone(),
            });
        }

        report.emitted = records.len();
        debug!(report = ?report, "规范化统计");

        if records.is_empty() {
            info!(source_file = %source_file, "没有有效中标记录（规范化后为空）");
        } else {
            info!(
                source_file = %source_file,
                emitted = report.emitted,
                dropped = report.dropped_missing_capacity + report.dropped_non_positive_capacity,
                "规范化完成"
            );
        }

        NormalizedBatch { records, report }
    }

    fn resolve_columns(&self, batch: &RawRecordBatch) -> FieldColumns {
        let columns = &batch.columns;
        FieldColumns {
            delivery_date: self.alias_table.resolve(CanonicalField::DeliveryDate, columns),
            product: self.alias_table.resolve(CanonicalField::Product, columns),
            direction: self.alias_table.resolve(CanonicalField::Direction, columns),
            capacity: self
                .alias_table
                .resolve(CanonicalField::AwardedCapacityMw, columns),
        }
    }

    /// 容量值转换: 数值直接使用，文本按区域格式解析
    fn coerce_capacity(&self, value: &RawValue) -> Option<f64> {
        match value {
            RawValue::Number(n) if n.is_finite() => Some(*n),
            RawValue::Text(s) => self.cleaner.parse_localized_number(s),
            _ => None,
        }
    }

    /// 交付日转换: 日期类型去掉时间部分，文本按日在前解析
    fn coerce_date(&self, value: &RawValue) -> Option<NaiveDate> {
        match value {
            RawValue::Date(d) => Some(*d),
            RawValue::DateTime(dt) => Some(dt.date()),
            RawValue::Text(s) => self.cleaner.parse_day_first_date(s),
            RawValue::Number(_) | RawValue::Empty => None,
        }
    }
}
