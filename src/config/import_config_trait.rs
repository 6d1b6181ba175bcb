// ==========================================
// 平衡市场容量中标导入 - 提取配置读取 Trait
// ==========================================
// 职责: 定义提取/规范化所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use chrono::NaiveDate;

// ==========================================
// ExtractionConfigReader Trait
// ==========================================
// 用途: 提取模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait ExtractionConfigReader: Send + Sync {
    // ===== 分类配置 =====

    /// 网格布局判定用的产品令牌
    ///
    /// # 默认值
    /// - "FCR"
    fn get_grid_product_token(&self) -> ConfigResult<String>;

    /// 网格布局判定用的市场令牌
    ///
    /// # 默认值
    /// - "CAPACITY"
    fn get_grid_market_token(&self) -> ConfigResult<String>;

    // ===== 网格提取配置 =====

    /// 网格日期恢复接受的年份集合
    ///
    /// # 参数
    /// - today: 处理日期
    ///
    /// # 默认值
    /// - [today.year - 1, today.year, today.year + 1]
    fn get_accepted_years(&self, today: NaiveDate) -> ConfigResult<Vec<i32>>;

    // ===== 表格提取配置 =====

    /// 表格型电子表格在表头前跳过的行数
    ///
    /// # 默认值
    /// - 2
    fn get_tabular_excel_skip_rows(&self) -> ConfigResult<usize>;

    /// 分隔文本的字段分隔符
    ///
    /// # 默认值
    /// - ';'
    fn get_csv_delimiter(&self) -> ConfigResult<char>;

    /// 小数分隔符
    ///
    /// # 默认值
    /// - ','
    fn get_decimal_separator(&self) -> ConfigResult<char>;

    /// 千分位分隔符
    ///
    /// # 默认值
    /// - '.'
    fn get_thousands_separator(&self) -> ConfigResult<char>;
}
