// ==========================================
// 平衡市场容量中标导入 - 文件解析器实现
// ==========================================
// 职责: 把文件读成按位置寻址的单元格网格（不解释表头）
// 支持: 电子表格 (.xlsx/.xlsm/.xls/.ods，取第一个工作表) / 分隔文本 (.csv)
// ==========================================

use crate::domain::award::RawValue;
use crate::domain::tender::SourceFile;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::fs::File;

/// 位置网格: 行优先，行长度可以不一致
pub type CellGrid = Vec<Vec<RawValue>>;

/// 可按电子表格读取的扩展名
pub const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// 可按分隔文本读取的扩展名
pub const DELIMITED_EXTENSIONS: [&str; 1] = ["csv"];

pub fn is_spreadsheet(source: &SourceFile) -> bool {
    SPREADSHEET_EXTENSIONS.contains(&source.extension().as_str())
}

pub fn is_delimited(source: &SourceFile) -> bool {
    DELIMITED_EXTENSIONS.contains(&source.extension().as_str())
}

// ==========================================
// 电子表格读取
// ==========================================
// 说明: calamine 的 Range 从第一个非空单元格开始，这里补齐左上角的
//       空行/空列，保证行号与文件中的物理行号一致（表头跳行依赖此点）
pub fn read_first_sheet(source: &SourceFile) -> ImportResult<CellGrid> {
    // 检查文件存在
    if !source.path.exists() {
        return Err(ImportError::FileNotFound(source.path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(&source.path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::EmptyWorkbook(source.file_name.clone()))??;

    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: CellGrid = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![RawValue::Empty; col_offset];
        cells.extend(row.iter().map(raw_value_from_cell));
        grid.push(cells);
    }

    Ok(grid)
}

/// calamine 单元格 → RawValue
pub fn raw_value_from_cell(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Empty,
        Data::String(s) => RawValue::text(s.as_str()),
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Bool(b) => RawValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => RawValue::DateTime(value),
            None => RawValue::Empty,
        },
        Data::DateTimeIso(s) => parse_iso_cell(s),
        Data::DurationIso(s) => RawValue::text(s.as_str()),
    }
}

fn parse_iso_cell(value: &str) -> RawValue {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return RawValue::DateTime(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return RawValue::Date(d);
    }
    RawValue::text(value)
}

// ==========================================
// 分隔文本读取
// ==========================================
// 说明: 不解释表头，所有单元格按文本保留，表头由调用方决定
pub fn read_delimited(source: &SourceFile, delimiter: char) -> ImportResult<CellGrid> {
    // 检查文件存在
    if !source.path.exists() {
        return Err(ImportError::FileNotFound(source.path.display().to_string()));
    }

    let delimiter = u8::try_from(delimiter).map_err(|_| {
        ImportError::CsvParseError(format!("分隔符必须是 ASCII 字符: {:?}", delimiter))
    })?;

    let file = File::open(&source.path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result?;
        grid.push(record.iter().map(RawValue::text).collect());
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_read_delimited_semicolon() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Liefertag;Produkt;Zuschlagsmenge MW").unwrap();
        writeln!(temp_file, "01.03.2025;aFRR;12,5").unwrap();
        writeln!(temp_file, "01.03.2025;aFRR;").unwrap();

        let source = SourceFile::from_path(temp_file.path());
        let grid = read_delimited(&source, ';').unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][2], RawValue::Text("Zuschlagsmenge MW".to_string()));
        assert_eq!(grid[1][2], RawValue::Text("12,5".to_string()));
        assert_eq!(grid[2][2], RawValue::Empty);
    }

    #[test]
    fn test_read_delimited_file_not_found() {
        let source = SourceFile::from_path("non_existent.csv");
        let result = read_delimited(&source, ';');
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_read_first_sheet_rejects_garbage() {
        let mut temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(temp_file, "this is not a zip archive").unwrap();

        let source = SourceFile::from_path(temp_file.path());
        let result = read_first_sheet(&source);
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_raw_value_from_cell() {
        assert_eq!(raw_value_from_cell(&Data::Int(16)), RawValue::Number(16.0));
        assert_eq!(raw_value_from_cell(&Data::Empty), RawValue::Empty);
        assert_eq!(
            raw_value_from_cell(&Data::String("  ".to_string())),
            RawValue::Empty
        );
        assert_eq!(
            raw_value_from_cell(&Data::DateTimeIso("2025-03-01".to_string())),
            RawValue::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
    }
}
