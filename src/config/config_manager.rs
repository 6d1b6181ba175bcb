// ==========================================
// 平衡市场容量中标导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::extraction_settings::adjacent_years;
use crate::config::import_config_trait::ExtractionConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const GRID_PRODUCT_TOKEN: &str = "grid_product_token";
    pub const GRID_MARKET_TOKEN: &str = "grid_market_token";
    pub const ACCEPTED_YEARS: &str = "accepted_years";
    pub const TABULAR_EXCEL_SKIP_ROWS: &str = "tabular_excel_skip_rows";
    pub const CSV_DELIMITER: &str = "csv_delimiter";
    pub const DECIMAL_SEPARATOR: &str = "decimal_separator";
    pub const THOUSANDS_SEPARATOR: &str = "thousands_separator";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ConfigError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// 写入（覆盖）global scope 的配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(json!(config_map).to_string())
    }

    /// 读取配置值，空白或不存在时返回 None
    fn get_non_blank(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_non_blank(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn get_char_or_default(&self, key: &str, default: char) -> ConfigResult<char> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(value) => parse_single_char(key, &value),
        }
    }
}

// ==========================================
// ExtractionConfigReader Trait 实现
// ==========================================
impl ExtractionConfigReader for ConfigManager {
    fn get_grid_product_token(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::GRID_PRODUCT_TOKEN, "FCR")
    }

    fn get_grid_market_token(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::GRID_MARKET_TOKEN, "CAPACITY")
    }

    fn get_accepted_years(&self, today: NaiveDate) -> ConfigResult<Vec<i32>> {
        match self.get_non_blank(config_keys::ACCEPTED_YEARS)? {
            None => Ok(adjacent_years(today)),
            Some(value) => parse_year_list(config_keys::ACCEPTED_YEARS, &value),
        }
    }

    fn get_tabular_excel_skip_rows(&self) -> ConfigResult<usize> {
        let value = self.get_config_or_default(config_keys::TABULAR_EXCEL_SKIP_ROWS, "2")?;
        value
            .parse::<usize>()
            .map_err(|e| ConfigError::ConfigValueError {
                key: config_keys::TABULAR_EXCEL_SKIP_ROWS.to_string(),
                value: value.clone(),
                message: e.to_string(),
            })
    }

    fn get_csv_delimiter(&self) -> ConfigResult<char> {
        self.get_char_or_default(config_keys::CSV_DELIMITER, ';')
    }

    fn get_decimal_separator(&self) -> ConfigResult<char> {
        self.get_char_or_default(config_keys::DECIMAL_SEPARATOR, ',')
    }

    fn get_thousands_separator(&self) -> ConfigResult<char> {
        self.get_char_or_default(config_keys::THOUSANDS_SEPARATOR, '.')
    }
}

/// 解析单字符配置（分隔符可以是空白字符如 TAB，因此不做 trim）
fn parse_single_char(key: &str, value: &str) -> ConfigResult<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::ConfigValueError {
            key: key.to_string(),
            value: value.to_string(),
            message: "期望单个字符".to_string(),
        }),
    }
}

/// 解析年份列表（逗号分隔，每项四位数字，至少一项）
fn parse_year_list(key: &str, value: &str) -> ConfigResult<Vec<i32>> {
    let years = value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            let parsed = if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse::<i32>().map_err(|e| e.to_string())
            } else {
                Err("年份必须是四位数字".to_string())
            };
            parsed.map_err(|message| ConfigError::ConfigValueError {
                key: key.to_string(),
                value: value.to_string(),
                message,
            })
        })
        .collect::<ConfigResult<Vec<i32>>>()?;

    // 至少一个年份
    if years.is_empty() {
        return Err(ConfigError::ConfigValueError {
            key: key.to_string(),
            value: value.to_string(),
            message: "年份列表不能为空".to_string(),
        });
    }
    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_char() {
        assert_eq!(parse_single_char("k", ";").unwrap(), ';');
        assert_eq!(parse_single_char("k", "\t").unwrap(), '\t');
        assert!(parse_single_char("k", "").is_err());
        assert!(parse_single_char("k", ";;").is_err());
    }

    #[test]
    fn test_parse_year_list() {
        assert_eq!(
            parse_year_list("k", "2024, 2025,2026").unwrap(),
            vec![2024, 2025, 2026]
        );
        assert!(parse_year_list("k", "2024,25").is_err());
        assert!(parse_year_list("k", "20x5").is_err());
    }

    #[test]
    fn test_parse_year_list_rejects_empty() {
        for value in [",", " , ,", ""] {
            assert!(matches!(
                parse_year_list("accepted_years", value),
                Err(ConfigError::ConfigValueError { .. })
            ));
        }
    }
}
