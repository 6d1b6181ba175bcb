// ==========================================
// 平衡市场容量中标导入 - 招标文件命名与下载地址
// ==========================================
// 职责: 由 TenderRequest 生成本地文件名与下载 URL（纯函数，不做网络访问）
// 注意: 网格布局判定依赖文件名中的产品/市场令牌，命名格式不可随意修改
// ==========================================

use crate::domain::tender::TenderRequest;
use chrono::{Duration, NaiveDate};

/// 招标结果导出接口
pub const TENDER_EXPORT_BASE_URL: &str =
    "https://www.regelleistung.net/apps/cpp-publisher/api/v2/tenders/demands";

/// 文件名中用于识别本系统文件的标记
pub const FILE_NAME_MARKER: &str = "regelleistung";

/// 本地文件名: `{YYYYMMDD}_regelleistung_{product}_{market}.{ext}`
pub fn tender_file_name(request: &TenderRequest) -> String {
    format!(
        "{}_{}_{}_{}.{}",
        request.delivery_date.format("%Y%m%d"),
        FILE_NAME_MARKER,
        request.product,
        request.market,
        request.export_format.extension()
    )
}

/// 下载 URL（查询参数均为受控令牌，无需转义）
pub fn tender_download_url(request: &TenderRequest) -> String {
    format!(
        "{}?productType={}&market={}&exportFormat={}&deliveryDate={}",
        TENDER_EXPORT_BASE_URL,
        request.product,
        request.market,
        request.export_format.extension(),
        request.delivery_date.format("%Y-%m-%d")
    )
}

/// 默认交付日: 处理日期前一天
pub fn default_delivery_date(processing_date: NaiveDate) -> NaiveDate {
    processing_date - Duration::days(1)
}
