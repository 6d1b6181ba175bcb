// ==========================================
// 平衡市场容量中标导入 - 提取配置快照
// ==========================================
// 职责: 单次运行内一次性解析的配置值（提取器只读取快照，不查库）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::import_config_trait::ExtractionConfigReader;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// 网格布局判定: 产品令牌
    pub grid_product_token: String,

    /// 网格布局判定: 市场令牌
    pub grid_market_token: String,

    /// 网格日期恢复接受的年份
    pub accepted_years: Vec<i32>,

    /// 表格型电子表格表头前跳过的行数
    pub tabular_excel_skip_rows: usize,

    /// 分隔文本字段分隔符
    pub csv_delimiter: char,

    /// 小数分隔符
    pub decimal_separator: char,

    /// 千分位分隔符
    pub thousands_separator: char,

    /// 处理日期（网格日期恢复失败时的回退值）
    pub processing_date: NaiveDate,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self::for_processing_date(Local::now().date_naive())
    }
}

impl ExtractionSettings {
    /// 以指定处理日期生成默认配置
    pub fn for_processing_date(processing_date: NaiveDate) -> Self {
        Self {
            grid_product_token: "FCR".to_string(),
            grid_market_token: "CAPACITY".to_string(),
            accepted_years: adjacent_years(processing_date),
            tabular_excel_skip_rows: 2,
            csv_delimiter: ';',
            decimal_separator: ',',
            thousands_separator: '.',
            processing_date,
        }
    }

    /// 从配置读取器解析完整快照
    pub fn from_reader(
        reader: &dyn ExtractionConfigReader,
        processing_date: NaiveDate,
    ) -> ConfigResult<Self> {
        let settings = Self {
            grid_product_token: reader.get_grid_product_token()?,
            grid_market_token: reader.get_grid_market_token()?,
            accepted_years: reader.get_accepted_years(processing_date)?,
            tabular_excel_skip_rows: reader.get_tabular_excel_skip_rows()?,
            csv_delimiter: reader.get_csv_delimiter()?,
            decimal_separator: reader.get_decimal_separator()?,
            thousands_separator: reader.get_thousands_separator()?,
            processing_date,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// 校验组合约束
    pub fn validate(&self) -> ConfigResult<()> {
        if self.decimal_separator == self.thousands_separator {
            return Err(ConfigError::ConfigValueError {
                key: "decimal_separator".to_string(),
                value: self.decimal_separator.to_string(),
                message: "小数分隔符与千分位分隔符不能相同".to_string(),
            });
        }
        if !self.csv_delimiter.is_ascii() {
            return Err(ConfigError::ConfigValueError {
                key: "csv_delimiter".to_string(),
                value: self.csv_delimiter.to_string(),
                message: "CSV 分隔符必须是 ASCII 字符".to_string(),
            });
        }
        if self.csv_delimiter == self.decimal_separator {
            return Err(ConfigError::ConfigValueError {
                key: "csv_delimiter".to_string(),
                value: self.csv_delimiter.to_string(),
                message: "CSV 分隔符与小数分隔符不能相同".to_string(),
            });
        }
        if self.grid_product_token.is_empty() || self.grid_market_token.is_empty() {
            return Err(ConfigError::ConfigValueError {
                key: "grid_product_token".to_string(),
                value: format!("{}/{}", self.grid_product_token, self.grid_market_token),
                message: "网格判定令牌不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 年份的四位文本形式（用于单元格子串匹配）
    pub fn accepted_year_tokens(&self) -> Vec<String> {
        self.accepted_years
            .iter()
            .map(|y| format!("{:04}", y))
            .collect()
    }
}

/// 处理日期所在年份及前后各一年
pub fn adjacent_years(processing_date: NaiveDate) -> Vec<i32> {
    let year = processing_date.year();
    vec![year - 1, year, year + 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let settings = ExtractionSettings::for_processing_date(date);
        assert_eq!(settings.accepted_years, vec![2024, 2025, 2026]);
        assert_eq!(settings.tabular_excel_skip_rows, 2);
        assert_eq!(settings.csv_delimiter, ';');
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_same_separators() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let mut settings = ExtractionSettings::for_processing_date(date);
        settings.thousands_separator = ',';
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_csv_delimiter() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();

        let mut settings = ExtractionSettings::for_processing_date(date);
        settings.csv_delimiter = '§';
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ConfigValueError { ref key, .. }) if key == "csv_delimiter"
        ));

        let mut settings = ExtractionSettings::for_processing_date(date);
        settings.csv_delimiter = ',';
        assert!(settings.validate().is_err());

        let mut settings = ExtractionSettings::for_processing_date(date);
        settings.csv_delimiter = '\t';
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_accepted_year_tokens() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let settings = ExtractionSettings::for_processing_date(date);
        assert_eq!(settings.accepted_year_tokens(), vec!["2025", "2026", "2027"]);
    }
}
