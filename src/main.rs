// ==========================================
// 平衡市场容量中标导入 - 命令行入口
// ==========================================
// 用法:
//   regelleistung-awards [db_path] [file...]
//
// 未指定文件时，处理 ./data 下最近修改的招标结果文件。
// 处理汇总以 JSON 输出到 stdout。
// ==========================================

use anyhow::Context;
use regelleistung_awards::config::{ConfigManager, ExtractionSettings};
use regelleistung_awards::importer::AwardImporterImpl;
use regelleistung_awards::pipeline::{AwardPipeline, BatchReport};
use regelleistung_awards::repository::SqliteAwardSink;
use regelleistung_awards::source::LocalDirectoryFetcher;
use regelleistung_awards::{logging, APP_NAME, VERSION};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

const DB_PATH_ENV: &str = "REGELLEISTUNG_DB_PATH";
const DEFAULT_DATA_DIR: &str = "data";
const DB_FILE_NAME: &str = "regelleistung.db";

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 REGELLEISTUNG_DB_PATH（非空时）
/// - 用户数据目录/regelleistung-awards/regelleistung.db
/// - 回退: ./regelleistung.db
fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join(APP_NAME);
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);
    let files: Vec<String> = args.collect();

    tracing::info!(version = VERSION, db_path = %db_path, "启动中标导入");

    let config = ConfigManager::new(&db_path).context("无法打开配置库")?;
    let today = chrono::Local::now().date_naive();
    let settings = ExtractionSettings::from_reader(&config, today).context("提取参数无效")?;

    let sink = Arc::new(SqliteAwardSink::new(&db_path).context("无法打开中标库")?);
    let pipeline = AwardPipeline::new(AwardImporterImpl::new(settings), sink.clone());

    let fetcher = LocalDirectoryFetcher::new(DEFAULT_DATA_DIR);
    let sources = if files.is_empty() {
        fetcher.latest_file().into_iter().collect()
    } else {
        fetcher.explicit_files(&files)
    };

    let report: BatchReport = if sources.is_empty() {
        tracing::warn!("没有需要处理的文件");
        BatchReport::default()
    } else {
        pipeline.process_files(&sources)
    };

    let summary = json!({
        "report": report,
        "stored_rows": report.stored_rows(),
        "total_rows": sink.count_all()?,
        "fcr_rows": sink.count_by_product("FCR")?,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !report.failed.is_empty() {
        anyhow::bail!("{} 个文件处理失败", report.failed.len());
    }
    Ok(())
}
