// ==========================================
// 平衡市场容量中标导入 - 网格提取器
// ==========================================
// 职责: 从无表头、仅按位置寻址的电子表格中恢复中标记录
// 流程: 日期恢复 → 数值恢复（行优先展平） → 方向分段
// ==========================================
// 注意: 方向分段完全依赖数据提供方的固定版式，不做内容校验。
//       版式变化时需要同步修改 DirectionRangeTable。
// ==========================================

use crate::config::ExtractionSettings;
use crate::domain::award::{RawRecordBatch, RawValue};
use crate::domain::tender::SourceFile;
use crate::domain::types::{Direction, ExtractionStrategy};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{self, CellGrid, SPREADSHEET_EXTENSIONS};
use crate::importer::importer_trait::Extractor;
use chrono::NaiveDate;
use std::ops::Range;
use tracing::{debug, info, instrument, warn};

/// 网格批次的列
pub const GRID_COLUMNS: [&str; 4] = [
    "delivery_date",
    "product",
    "direction",
    "awarded_capacity_mw",
];

// ==========================================
// DirectionRangeTable - 下标区间 → 方向
// ==========================================
// 规则（n 为恢复出的数值个数，整数除法截断）:
// - [0, n/4)   → symmetric
// - [n/4, n/2) → positive
// - [n/2, n)   → negative
// n 不能被 4 整除时，截断使前两段偏短、余数落入 negative 段。
// 该边界沿用历史行为，没有内容依据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionRange {
    pub range: Range<usize>,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionRangeTable {
    value_count: usize,
    ranges: Vec<DirectionRange>,
}

impl DirectionRangeTable {
    /// 按四分位切分构建区间表
    pub fn quarter_split(value_count: usize) -> Self {
        let quarter = value_count / 4;
        let half = value_count / 2;
        Self {
            value_count,
            ranges: vec![
                DirectionRange {
                    range: 0..quarter,
                    direction: Direction::Symmetric,
                },
                DirectionRange {
                    range: quarter..half,
                    direction: Direction::Positive,
                },
                DirectionRange {
                    range: half..value_count,
                    direction: Direction::Negative,
                },
            ],
        }
    }

    pub fn value_count(&self) -> usize {
        self.value_count
    }

    pub fn ranges(&self) -> &[DirectionRange] {
        &self.ranges
    }

    /// 查询下标所属方向（越界返回 None）
    pub fn direction_for(&self, index: usize) -> Option<Direction> {
        self.ranges
            .iter()
            .find(|r| r.range.contains(&index))
            .map(|r| r.direction)
    }
}

// ==========================================
// GridExtractor
// ==========================================
pub struct GridExtractor {
    settings: ExtractionSettings,
    cleaner: DataCleaner,
    year_tokens: Vec<String>,
}

impl GridExtractor {
    pub fn new(settings: ExtractionSettings) -> Self {
        let cleaner = DataCleaner::from_settings(&settings);
        let year_tokens = settings.accepted_year_tokens();
        Self {
            settings,
            cleaner,
            year_tokens,
        }
    }

    /// 从内存网格提取（与文件读取解耦，便于诊断与测试）
    pub fn extract_from_cells(&self, grid: &CellGrid, source_file: &str) -> RawRecordBatch {
        // === 步骤 1: 日期恢复 ===
        let delivery_date = match self.recover_delivery_date(grid) {
            Some(date) => {
                debug!(delivery_date = %date, "网格日期恢复成功");
                date
            }
            None => {
                warn!(
                    source_file = %source_file,
                    fallback = %self.settings.processing_date,
                    "未找到可识别的交付日，回退为处理日期（精度降级）"
                );
                self.settings.processing_date
            }
        };

        // === 步骤 2: 数值恢复 ===
        let values = self.recover_numeric_values(grid);
        if values.is_empty() {
            warn!(source_file = %source_file, "网格中没有可用数值，返回空批次");
            return RawRecordBatch::empty(source_file, ExtractionStrategy::Grid);
        }

        // === 步骤 3: 方向分段 ===
        let table = DirectionRangeTable::quarter_split(values.len());
        let product = RawValue::Text(self.settings.grid_product_token.clone());

        let rows = values
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let direction = table.direction_for(idx).unwrap_or(Direction::Unknown);
                vec![
                    RawValue::Date(delivery_date),
                    product.clone(),
                    RawValue::Text(direction.as_str().to_string()),
                    RawValue::Number(*value),
                ]
            })
            .collect::<Vec<_>>();

        info!(
            source_file = %source_file,
            rows = rows.len(),
            delivery_date = %delivery_date,
            "网格文件提取完成"
        );

        RawRecordBatch {
            source_file: source_file.to_string(),
            strategy: ExtractionStrategy::Grid,
            columns: GRID_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// 行优先扫描，第一个包含受理年份的单元格决定整批交付日
    ///
    /// 日期类型单元格直接取日期；文本只解析首个片段，解析失败则继续扫描。
    pub fn recover_delivery_date(&self, grid: &CellGrid) -> Option<NaiveDate> {
        grid.iter().flatten().find_map(|cell| {
            let text = cell.to_text();
            if !self.year_tokens.iter().any(|y| text.contains(y.as_str())) {
                return None;
            }
            match cell {
                RawValue::Date(d) => Some(*d),
                RawValue::DateTime(dt) => Some(dt.date()),
                _ => self
                    .cleaner
                    .leading_token(&text)
                    .and_then(|token| self.cleaner.parse_grid_date(token)),
            }
        })
    }

    /// 行优先展平并转换为数值，保留遍历顺序（方向分段依赖此顺序）
    pub fn recover_numeric_values(&self, grid: &CellGrid) -> Vec<f64> {
        grid.iter()
            .flatten()
            .filter_map(|cell| match cell {
                RawValue::Number(n) if n.is_finite() => Some(*n),
                RawValue::Text(s) => self.cleaner.parse_plain_number(s),
                _ => None,
            })
            .collect()
    }
}

impl Extractor for GridExtractor {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Grid
    }

    #[instrument(skip(self, source), fields(source_file = %source.file_name))]
    fn extract(&self, source: &SourceFile) -> ImportResult<RawRecordBatch> {
        if !file_parser::is_spreadsheet(source) {
            return Err(ImportError::UnsupportedFormat {
                format: source.extension(),
                strategy: ExtractionStrategy::Grid.to_string(),
                expected: SPREADSHEET_EXTENSIONS.join("/"),
            });
        }

        let grid = file_parser::read_first_sheet(source)?;
        debug!(rows = grid.len(), "电子表格读取完成（无表头）");
        Ok(self.extract_from_cells(&grid, &source.file_name))
    }
}
