// ==========================================
// 平衡市场容量中标导入 - 表格提取器
// ==========================================
// 职责: 从带表头的表格（电子表格/分隔文本）中恢复中标记录
// 流程: 读取 → 定位表头 → 表头标准化 → 交付日列按日在前解析
// 红线: 本层不做过滤（过滤统一在 SchemaNormalizer），便于直接诊断
// ==========================================

use crate::config::ExtractionSettings;
use crate::domain::award::{RawRecordBatch, RawValue};
use crate::domain::tender::SourceFile;
use crate::domain::types::ExtractionStrategy;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{AliasTable, CanonicalField};
use crate::importer::file_parser::{self, CellGrid, DELIMITED_EXTENSIONS, SPREADSHEET_EXTENSIONS};
use crate::importer::importer_trait::Extractor;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

pub struct TabularExtractor {
    settings: ExtractionSettings,
    cleaner: DataCleaner,
    alias_table: AliasTable,
}

impl TabularExtractor {
    pub fn new(settings: ExtractionSettings) -> Self {
        Self::with_alias_table(settings, AliasTable::default())
    }

    pub fn with_alias_table(settings: ExtractionSettings, alias_table: AliasTable) -> Self {
        let cleaner = DataCleaner::from_settings(&settings);
        Self {
            settings,
            cleaner,
            alias_table,
        }
    }

    /// 从内存网格提取
    ///
    /// # 参数
    /// - grid: 按物理行排列的单元格
    /// - header_row: 表头所在行（之前的行全部跳过）
    /// - source_file: 来源文件名
    pub fn extract_from_grid(
        &self,
        grid: &CellGrid,
        header_row: usize,
        source_file: &str,
    ) -> RawRecordBatch {
        let header_cells = match grid.get(header_row) {
            Some(cells) => cells,
            None => {
                warn!(
                    source_file = %source_file,
                    header_row = header_row,
                    total_rows = grid.len(),
                    "文件行数不足，找不到表头，返回空批次"
                );
                return RawRecordBatch::empty(source_file, ExtractionStrategy::Tabular);
            }
        };

        let columns = self.normalize_headers(header_cells);
        debug!(columns = ?columns, "表头标准化完成");

        let date_column = self
            .alias_table
            .resolve(CanonicalField::DeliveryDate, &columns);

        let mut rows = Vec::new();
        for data_row in grid.iter().skip(header_row + 1) {
            let mut row: Vec<RawValue> = (0..columns.len())
                .map(|idx| data_row.get(idx).cloned().unwrap_or(RawValue::Empty))
                .collect();

            // 跳过完全空白的行
            if row.iter().all(RawValue::is_empty) {
                continue;
            }

            if let Some(resolved) = &date_column {
                let parsed = self.parse_date_cell(&row[resolved.index]);
                row[resolved.index] = parsed;
            }

            rows.push(row);
        }

        info!(
            source_file = %source_file,
            rows = rows.len(),
            date_column = ?date_column.as_ref().map(|c| c.name.as_str()),
            "表格文件提取完成"
        );

        RawRecordBatch {
            source_file: source_file.to_string(),
            strategy: ExtractionStrategy::Tabular,
            columns,
            rows,
        }
    }

    /// 表头标准化
    ///
    /// - 空表头 → `unnamed_{列下标}`
    /// - 重复表头 → 第一次出现保留原名，之后依次追加 `.1`、`.2` …
    pub fn normalize_headers(&self, header_cells: &[RawValue]) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        header_cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let mut name = self.cleaner.normalize_header(&cell.to_text());
                if name.is_empty() {
                    name = format!("unnamed_{}", idx);
                }
                let count = seen.entry(name.clone()).or_insert(0);
                let unique = if *count == 0 {
                    name
                } else {
                    format!("{}.{}", name, count)
                };
                *count += 1;
                unique
            })
            .collect()
    }

    /// 交付日单元格 → Date，解析失败 → Empty
    fn parse_date_cell(&self, cell: &RawValue) -> RawValue {
        match cell {
            RawValue::Date(d) => RawValue::Date(*d),
            RawValue::DateTime(dt) => RawValue::Date(dt.date()),
            RawValue::Text(s) => self
                .cleaner
                .parse_day_first_date(s)
                .map(RawValue::Date)
                .unwrap_or(RawValue::Empty),
            RawValue::Number(_) | RawValue::Empty => RawValue::Empty,
        }
    }
}

impl Extractor for TabularExtractor {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Tabular
    }

    #[instrument(skip(self, source), fields(source_file = %source.file_name))]
    fn extract(&self, source: &SourceFile) -> ImportResult<RawRecordBatch> {
        let (grid, header_row) = if file_parser::is_spreadsheet(source) {
            (
                file_parser::read_first_sheet(source)?,
                self.settings.tabular_excel_skip_rows,
            )
        } else if file_parser::is_delimited(source) {
            (
                file_parser::read_delimited(source, self.settings.csv_delimiter)?,
                0,
            )
        } else {
            let expected = SPREADSHEET_EXTENSIONS
                .iter()
                .chain(DELIMITED_EXTENSIONS.iter())
                .copied()
                .collect::<Vec<_>>()
                .join("/");
            return Err(ImportError::UnsupportedFormat {
                format: source.extension(),
                strategy: ExtractionStrategy::Tabular.to_string(),
                expected,
            });
        };

        debug!(rows = grid.len(), header_row = header_row, "文件读取完成");
        Ok(self.extract_from_grid(&grid, header_row, &source.file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn extractor() -> TabularExtractor {
        TabularExtractor::new(ExtractionSettings::for_processing_date(
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        ))
    }

    fn row(cells: &[&str]) -> Vec<RawValue> {
        cells.iter().map(|c| RawValue::text(*c)).collect()
    }

    #[test]
    fn test_extract_with_skipped_rows() {
        let grid = vec![
            row(&["Ergebnisliste aFRR"]),
            row(&[]),
            row(&[" Liefertag ", "Produkt", "Richtung", "Zuschlagsmenge  MW"]),
            row(&["01.03.2025", "aFRR", "positive", "12,5"]),
        ];

        let batch = extractor().extract_from_grid(&grid, 2, "f.xlsx");

        assert_eq!(
            batch.columns,
            vec!["liefertag", "produkt", "richtung", "zuschlagsmenge_mw"]
        );
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.rows[0][0],
            RawValue::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        // 数值保留原文，由规范化阶段按区域格式转换
        assert_eq!(batch.rows[0][3], RawValue::Text("12,5".to_string()));
        assert_eq!(batch.strategy, ExtractionStrategy::Tabular);
    }

    #[test]
    fn test_unparseable_date_becomes_missing() {
        let grid = vec![
            row(&["Delivery Date", "Product"]),
            row(&["not a date", "FCR"]),
        ];
        let batch = extractor().extract_from_grid(&grid, 0, "f.csv");
        assert_eq!(batch.rows[0][0], RawValue::Empty);
        assert_eq!(batch.rows[0][1], RawValue::Text("FCR".to_string()));
    }

    #[test]
    fn test_no_filtering_and_padding() {
        let grid = vec![
            row(&["produkt", "zuschlagsmenge_mw"]),
            row(&["aFRR", "0"]),
            row(&["aFRR"]),
            row(&["", ""]),
        ];
        let batch = extractor().extract_from_grid(&grid, 0, "f.csv");
        // 零值行保留，短行补 Empty，全空行跳过
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.rows[1][1], RawValue::Empty);
    }

    #[test]
    fn test_missing_header_row_is_empty_batch() {
        let grid = vec![row(&["only one line"])];
        let batch = extractor().extract_from_grid(&grid, 2, "f.xlsx");
        assert!(batch.is_empty());
        assert!(batch.columns.is_empty());
    }

    #[test]
    fn test_normalize_headers_empty_and_duplicates() {
        let headers = row(&["Produkt", "", "produkt", "PRODUKT"]);
        let names = extractor().normalize_headers(&headers);
        assert_eq!(names, vec!["produkt", "unnamed_1", "produkt.1", "produkt.2"]);
    }

    #[test]
    fn test_extract_rejects_unknown_extension() {
        let source = SourceFile::from_path("20250301_regelleistung_aFRR_CAPACITY.json");
        let result = extractor().extract(&source);
        assert!(matches!(result, Err(ImportError::UnsupportedFormat { .. })));
    }
}
