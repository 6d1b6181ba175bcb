// ==========================================
// 平衡市场容量中标导入 - 文件分类器
// ==========================================
// 职责: 仅凭文件名选择提取策略（不读取文件内容）
// 规则: 文件名同时包含产品令牌与市场令牌（区分大小写） → 网格布局
//       否则 → 表格布局
// ==========================================

use crate::config::ExtractionSettings;
use crate::domain::types::ExtractionStrategy;

/// 文件布局分类结果
///
/// 新增布局时此处新增变体，所有 match 调用点会在编译期暴露缺口。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    GridLayout,
    TabularLayout,
}

impl LayoutKind {
    pub fn strategy(&self) -> ExtractionStrategy {
        match self {
            LayoutKind::GridLayout => ExtractionStrategy::Grid,
            LayoutKind::TabularLayout => ExtractionStrategy::Tabular,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileClassifier {
    product_token: String,
    market_token: String,
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new("FCR", "CAPACITY")
    }
}

impl FileClassifier {
    pub fn new(product_token: impl Into<String>, market_token: impl Into<String>) -> Self {
        Self {
            product_token: product_token.into(),
            market_token: market_token.into(),
        }
    }

    pub fn from_settings(settings: &ExtractionSettings) -> Self {
        Self::new(
            settings.grid_product_token.clone(),
            settings.grid_market_token.clone(),
        )
    }

    /// 按文件名分类
    pub fn classify(&self, file_name: &str) -> LayoutKind {
        if file_name.contains(&self.product_token) && file_name.contains(&self.market_token) {
            LayoutKind::GridLayout
        } else {
            LayoutKind::TabularLayout
        }
    }
}
