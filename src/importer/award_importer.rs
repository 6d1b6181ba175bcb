// ==========================================
// 平衡市场容量中标导入 - 中标导入器实现
// ==========================================
// 流程: 分类 → 提取（网格/表格二选一） → 规范化
// 红线: 网格与表格之间不做静默回退，提取失败直接返回错误
// ==========================================

use crate::config::ExtractionSettings;
use crate::domain::award::RawRecordBatch;
use crate::domain::tender::SourceFile;
use crate::importer::classifier::{FileClassifier, LayoutKind};
use crate::importer::error::ImportResult;
use crate::importer::grid_extractor::GridExtractor;
use crate::importer::importer_trait::{AwardImporter, Extractor, ImportOutcome};
use crate::importer::normalizer::{NormalizationReport, SchemaNormalizer};
use crate::importer::tabular_extractor::TabularExtractor;
use tracing::{debug, info, instrument};

pub struct AwardImporterImpl {
    classifier: FileClassifier,
    grid_extractor: GridExtractor,
    tabular_extractor: TabularExtractor,
    normalizer: SchemaNormalizer,
}

impl AwardImporterImpl {
    pub fn new(settings: ExtractionSettings) -> Self {
        Self {
            classifier: FileClassifier::from_settings(&settings),
            grid_extractor: GridExtractor::new(settings.clone()),
            tabular_extractor: TabularExtractor::new(settings.clone()),
            normalizer: SchemaNormalizer::from_settings(&settings),
        }
    }

    /// 按文件名选择提取器
    pub fn extractor_for(&self, file_name: &str) -> (LayoutKind, &dyn Extractor) {
        let layout = self.classifier.classify(file_name);
        let extractor: &dyn Extractor = match layout {
            LayoutKind::GridLayout => &self.grid_extractor,
            LayoutKind::TabularLayout => &self.tabular_extractor,
        };
        (layout, extractor)
    }

    /// 只提取不规范化（诊断用）
    pub fn extract_raw(&self, source: &SourceFile) -> ImportResult<RawRecordBatch> {
        let (_, extractor) = self.extractor_for(&source.file_name);
        extractor.extract(source)
    }

    /// 导入并返回规范化统计
    #[instrument(skip(self, source), fields(source_file = %source.file_name))]
    pub fn import_with_report(
        &self,
        source: &SourceFile,
    ) -> ImportResult<(ImportOutcome, NormalizationReport)> {
        let (layout, extractor) = self.extractor_for(&source.file_name);
        debug!(layout = ?layout, "文件分类完成");

        // === 步骤 1: 提取 ===
        let batch = extractor.extract(source)?;

        // === 步骤 2: 规范化 ===
        let normalized = self.normalizer.normalize_with_report(&batch);

        info!(
            strategy = %batch.strategy,
            raw_rows = batch.len(),
            records = normalized.records.len(),
            "文件导入完成"
        );

        let outcome = ImportOutcome {
            source_file: batch.source_file.clone(),
            strategy: batch.strategy,
            raw_rows: batch.len(),
            records: normalized.records,
        };
        Ok((outcome, normalized.report))
    }
}

impl AwardImporter for AwardImporterImpl {
    fn import_file(&self, source: &SourceFile) -> ImportResult<ImportOutcome> {
        self.import_with_report(source).map(|(outcome, _)| outcome)
    }
}
