// ==========================================
// 平衡市场容量中标导入 - 源文件层
// ==========================================
// 职责: 招标文件命名 / 本地文件获取
// ==========================================

pub mod fetcher;
pub mod naming;

pub use fetcher::{FileFetcher, LocalDirectoryFetcher};
pub use naming::{default_delivery_date, tender_download_url, tender_file_name};
