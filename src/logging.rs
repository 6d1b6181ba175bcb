// ==========================================
// 平衡市场容量中标导入 - 日志初始化
// ==========================================
// 输出: 控制台 (stderr) + 追加写入的运行日志文件 (pipeline.log)
// 过滤: RUST_LOG，默认 info
// ==========================================

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// 默认运行日志文件（相对当前工作目录）
pub const LOG_FILE_NAME: &str = "pipeline.log";

/// 初始化日志系统（控制台 + pipeline.log）
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=regelleistung_awards::importer=debug
///
/// # 示例
/// ```no_run
/// use regelleistung_awards::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_log_file(LOG_FILE_NAME);
}

/// 初始化日志系统，运行日志写入指定文件
///
/// 日志文件无法打开时只输出到控制台，并记录一条告警。
pub fn init_with_log_file(log_path: impl AsRef<Path>) {
    let log_path = log_path.as_ref();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_line_number(true);

    match open_log_file(log_path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file_layer(file))
                .init();
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
            tracing::warn!(
                log_file = %log_path.display(),
                error = %e,
                "运行日志文件不可写，仅输出到控制台"
            );
        }
    }
}

/// 以追加方式打开日志文件，必要时创建上级目录
pub fn open_log_file(log_path: &Path) -> io::Result<File> {
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(log_path)
}

/// 文件日志层: 无 ANSI 颜色，带时间戳与来源
pub fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
}

/// 初始化测试环境的日志系统
///
/// debug 级别，输出交给测试框架捕获；重复初始化时静默忽略
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_parent_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join(LOG_FILE_NAME);

        {
            let mut file = open_log_file(&path).unwrap();
            io::Write::write_all(&mut file, b"first\n").unwrap();
        }
        {
            let mut file = open_log_file(&path).unwrap();
            io::Write::write_all(&mut file, b"second\n").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_file_layer_writes_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let file = open_log_file(&path).unwrap();

        let subscriber = tracing_subscriber::registry().with(file_layer(file));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(source_file = "20250301_regelleistung_FCR_CAPACITY.xlsx", "文件处理完成");
        });

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("文件处理完成"));
        assert!(content.contains("20250301_regelleistung_FCR_CAPACITY.xlsx"));
        assert!(content.contains("INFO"));
        // 文件中不应出现 ANSI 转义
        assert!(!content.contains('\u{1b}'));
    }
}
