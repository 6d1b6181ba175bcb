// ==========================================
// 平衡市场容量中标导入 - 单次处理流水线
// ==========================================
// 流程: 获取 → 导入（分类/提取/规范化） → 追加写入
// 红线:
// - 规范化后为空时不调用写入
// - 单个文件的致命错误不影响其他文件
// - 各文件之间无共享可变状态，可并发处理
// ==========================================

use crate::domain::tender::{ExportFormat, SourceFile, TenderRequest};
use crate::domain::types::ExtractionStrategy;
use crate::importer::{AwardImporter, AwardImporterImpl};
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::repository::AwardSink;
use crate::source::FileFetcher;
use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 单文件处理结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassOutcome {
    pub run_id: String,
    pub source_file: String,
    pub strategy: ExtractionStrategy,
    pub raw_rows: usize,
    pub stored_rows: usize,
}

/// 失败文件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedFile {
    pub source_file: String,
    pub error: String,
}

/// 批量处理汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub processed: Vec<PassOutcome>,
    pub failed: Vec<FailedFile>,
    pub missing: Vec<String>,
}

impl BatchReport {
    pub fn stored_rows(&self) -> usize {
        self.processed.iter().map(|o| o.stored_rows).sum()
    }

    fn record(&mut self, source_file: String, result: PipelineResult<PassOutcome>) {
        match result {
            Ok(outcome) => self.processed.push(outcome),
            Err(e) => {
                error!(source_file = %source_file, error = %e, "文件处理失败");
                self.failed.push(FailedFile {
                    source_file,
                    error: e.to_string(),
                });
            }
        }
    }
}

// ==========================================
// AwardPipeline
// ==========================================
#[derive(Clone)]
pub struct AwardPipeline {
    importer: Arc<AwardImporterImpl>,
    sink: Arc<dyn AwardSink>,
}

impl AwardPipeline {
    pub fn new(importer: AwardImporterImpl, sink: Arc<dyn AwardSink>) -> Self {
        Self {
            importer: Arc::new(importer),
            sink,
        }
    }

    /// 处理单个文件
    #[instrument(skip(self, source), fields(source_file = %source.file_name, run_id = tracing::field::Empty))]
    pub fn process_file(&self, source: &SourceFile) -> PipelineResult<PassOutcome> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());

        let outcome = self.importer.import_file(source)?;

        let stored_rows = if outcome.records.is_empty() {
            info!("没有有效中标记录，跳过写入");
            0
        } else {
            self.sink.append(&outcome.records)?
        };

        info!(
            strategy = %outcome.strategy,
            raw_rows = outcome.raw_rows,
            stored_rows = stored_rows,
            "文件处理完成"
        );

        Ok(PassOutcome {
            run_id,
            source_file: outcome.source_file,
            strategy: outcome.strategy,
            raw_rows: outcome.raw_rows,
            stored_rows,
        })
    }

    /// 顺序处理文件列表（单个失败不中断）
    pub fn process_files(&self, sources: &[SourceFile]) -> BatchReport {
        let mut report = BatchReport::default();
        for source in sources {
            report.record(source.file_name.clone(), self.process_file(source));
        }
        report
    }

    /// 并发处理文件列表（每个文件一个阻塞任务）
    pub async fn run_concurrently(&self, sources: Vec<SourceFile>) -> BatchReport {
        let (names, handles): (Vec<_>, Vec<_>) = sources
            .into_iter()
            .map(|source| {
                let pipeline = self.clone();
                let name = source.file_name.clone();
                let handle =
                    tokio::task::spawn_blocking(move || pipeline.process_file(&source));
                (name, handle)
            })
            .unzip();

        let mut report = BatchReport::default();
        for (name, joined) in names.into_iter().zip(join_all(handles).await) {
            let result = joined.unwrap_or_else(|e| Err(PipelineError::TaskJoin(e.to_string())));
            report.record(name, result);
        }
        report
    }

    /// 获取并处理默认产品/市场组合
    pub fn run_default_combos(
        &self,
        fetcher: &dyn FileFetcher,
        delivery_date: NaiveDate,
        export_format: ExportFormat,
    ) -> BatchReport {
        let mut sources = Vec::new();
        let mut missing = Vec::new();
        for request in TenderRequest::default_combos(delivery_date, export_format) {
            match fetcher.fetch(&request) {
                Some(source) => sources.push(source),
                None => missing.push(request.combo_label()),
            }
        }

        if !missing.is_empty() {
            warn!(missing = ?missing, "部分组合没有数据文件");
        }

        let mut report = self.process_files(&sources);
        report.missing = missing;
        report
    }
}
