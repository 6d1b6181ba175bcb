// ==========================================
// 平衡市场容量中标导入 - 源文件获取
// ==========================================
// 职责: 为流水线提供本地文件句柄；文件缺失返回 None（告警），不报错
// 说明: 网络下载属于外部协作方，此处只解析已落地的本地文件
// ==========================================

use crate::domain::tender::{SourceFile, TenderRequest};
use crate::source::naming::{tender_file_name, FILE_NAME_MARKER};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

// ==========================================
// FileFetcher Trait
// ==========================================
// 用途: 按招标请求获取本地文件
// 实现者: LocalDirectoryFetcher
pub trait FileFetcher: Send + Sync {
    /// 获取文件
    ///
    /// # 返回
    /// - Some(SourceFile): 文件可用
    /// - None: 该组合没有数据
    fn fetch(&self, request: &TenderRequest) -> Option<SourceFile>;
}

// ==========================================
// LocalDirectoryFetcher - 本地数据目录
// ==========================================
pub struct LocalDirectoryFetcher {
    data_dir: PathBuf,
}

impl LocalDirectoryFetcher {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 数据目录中最近修改的本系统文件
    ///
    /// 过滤: 普通文件、小写文件名包含 "regelleistung"、
    ///       不以 "~$"（Office 锁文件）或 "."（隐藏文件）开头
    pub fn latest_file(&self) -> Option<SourceFile> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(data_dir = %self.data_dir.display(), error = %e, "数据目录不可读");
                return None;
            }
        };

        let latest = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if !is_candidate_name(&name) {
                    return None;
                }
                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }
                let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                Some((modified, name, entry.path()))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        match latest {
            Some((_, name, path)) => {
                info!(file = %name, "选中最新文件");
                Some(SourceFile::from_path(path))
            }
            None => {
                warn!(data_dir = %self.data_dir.display(), "没有找到可用的招标结果文件");
                None
            }
        }
    }

    /// 显式文件列表，保留存在的路径，缺失的告警
    pub fn explicit_files<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<SourceFile> {
        paths
            .iter()
            .filter_map(|p| {
                let path = p.as_ref();
                if path.is_file() {
                    Some(SourceFile::from_path(path))
                } else {
                    warn!(path = %path.display(), "文件不存在，跳过");
                    None
                }
            })
            .collect()
    }
}

impl FileFetcher for LocalDirectoryFetcher {
    fn fetch(&self, request: &TenderRequest) -> Option<SourceFile> {
        let file_name = tender_file_name(request);
        let path = self.data_dir.join(&file_name);
        if path.is_file() {
            debug!(file = %file_name, "本地文件已存在");
            Some(SourceFile::from_path(path))
        } else {
            warn!(
                combo = %request.combo_label(),
                delivery_date = %request.delivery_date,
                "没有该组合的数据文件"
            );
            None
        }
    }
}

fn is_candidate_name(name: &str) -> bool {
    name.to_lowercase().contains(FILE_NAME_MARKER) && !name.starts_with("~$") && !name.starts_with('.')
}
