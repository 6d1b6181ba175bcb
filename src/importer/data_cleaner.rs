// ==========================================
// 平衡市场容量中标导入 - 数据清洗器实现
// ==========================================
// 职责: 表头标准化 / 区域格式数值解析 / 日期解析
// 红线: 解析失败返回 None（缺失），从不报错
// ==========================================

use crate::config::ExtractionSettings;
use chrono::NaiveDate;

/// 表格日期列（日在前）尝试的格式
const DAY_FIRST_DATE_FORMATS: [&str; 5] = ["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y%m%d"];

/// 网格日期恢复尝试的格式
const GRID_DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d", "%Y%m%d"];

#[derive(Debug, Clone)]
pub struct DataCleaner {
    decimal_separator: char,
    thousands_separator: char,
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(',', '.')
    }
}

impl DataCleaner {
    pub fn new(decimal_separator: char, thousands_separator: char) -> Self {
        Self {
            decimal_separator,
            thousands_separator,
        }
    }

    pub fn from_settings(settings: &ExtractionSettings) -> Self {
        Self::new(settings.decimal_separator, settings.thousands_separator)
    }

    /// 表头标准化: TRIM → 小写 → 连续空白折叠为单个下划线
    pub fn normalize_header(&self, header: &str) -> String {
        header
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// 取单元格文本的首个空白分隔片段
    pub fn leading_token<'a>(&self, value: &'a str) -> Option<&'a str> {
        value.split_whitespace().next()
    }

    /// 普通数值解析（点作小数点）
    pub fn parse_plain_number(&self, value: &str) -> Option<f64> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// 区域格式数值解析
    ///
    /// # 规则
    /// - 含小数分隔符: 去掉千分位，小数分隔符换成点（"1.250,5" → 1250.5）
    /// - 仅含千分位字符: 分组合法（首组 1-3 位，其余均 3 位）时按千分位处理
    ///   （"1.250" → 1250），否则按普通小数处理（"12.5" → 12.5）
    /// - 千分位出现在小数分隔符之后视为非法
    pub fn parse_localized_number(&self, value: &str) -> Option<f64> {
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return None;
        }

        let normalized = if let Some(decimal_pos) = compact.rfind(self.decimal_separator) {
            if compact[decimal_pos..].contains(self.thousands_separator) {
                return None;
            }
            compact
                .replace(self.thousands_separator, "")
                .replace(self.decimal_separator, ".")
        } else if compact.contains(self.thousands_separator)
            && self.has_thousands_grouping(&compact)
        {
            compact.replace(self.thousands_separator, "")
        } else {
            compact
        };

        self.parse_plain_number(&normalized)
    }

    /// 日在前的日期解析（只取首个片段，兼容 "01.03.2025 00:00"）
    pub fn parse_day_first_date(&self, value: &str) -> Option<NaiveDate> {
        let token = self.leading_token(value)?;
        parse_with_formats(token, &DAY_FIRST_DATE_FORMATS)
    }

    /// 网格日期解析（优先 ISO 形式）
    pub fn parse_grid_date(&self, token: &str) -> Option<NaiveDate> {
        parse_with_formats(token, &GRID_DATE_FORMATS)
    }

    fn has_thousands_grouping(&self, value: &str) -> bool {
        let unsigned = value.trim_start_matches(['-', '+']);
        let mut groups = unsigned.split(self.thousands_separator);
        let first = match groups.next() {
            Some(g) => g,
            None => return false,
        };
        if first.is_empty() || first.len() > 3 || !first.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        let mut rest = groups.peekable();
        if rest.peek().is_none() {
            return false;
        }
        rest.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
    }
}

fn parse_with_formats(token: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
}
