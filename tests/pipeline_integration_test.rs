// ==========================================
// 处理流水线集成测试
// ==========================================
// 测试目标: 导入 + 写入的编排、失败隔离、并发处理、默认组合
// ==========================================


use chrono::NaiveDate;
use regelleistung_awards::domain::{ExportFormat, ExtractionStrategy, SourceFile, TenderRequest};
use regelleistung_awards::importer::AwardImporterImpl;
use regelleistung_awards::pipeline::{AwardPipeline, PipelineError};
use regelleistung_awards::repository::SqliteAwardSink;
use regelleistung_awards::source::{tender_file_name, LocalDirectoryFetcher};
use std::collections::HashSet;
use std::sync::Arc;
use test_helpers::{create_test_db, german_csv, test_settings, write_file, MemoryAwardSink};

fn memory_pipeline() -> (AwardPipeline, Arc<MemoryAwardSink>) {
    regelleistung_awards::logging::init_test();
    let sink = Arc::new(MemoryAwardSink::default());
    let pipeline = AwardPipeline::new(AwardImporterImpl::new(test_settings()), sink.clone());
    (pipeline, sink)
}

#[test]
fn test_process_file_appends_to_sqlite() {
    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let sink = Arc::new(SqliteAwardSink::new(&db_path).expect("Failed to open sink"));
    let pipeline = AwardPipeline::new(AwardImporterImpl::new(test_settings()), sink.clone());

    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "20250301_regelleistung_aFRR_CAPACITY.csv",
        &german_csv(&[
            ["01.03.2025", "aFRR", "positiv", "10,0"],
            ["01.03.2025", "aFRR", "negativ", "0"],
            ["01.03.2025", "aFRR", "negativ", "4"],
        ]),
    );

    let outcome = pipeline.process_file(&SourceFile::from_path(&path)).unwrap();
    assert_eq!(outcome.strategy, ExtractionStrategy::Tabular);
    assert_eq!(outcome.raw_rows, 3);
    assert_eq!(outcome.stored_rows, 2);
    assert!(!outcome.run_id.is_empty());

    assert_eq!(sink.count_all().unwrap(), 2);
    assert_eq!(sink.count_by_product("aFRR").unwrap(), 2);

    // 重复处理同一文件是追加，不去重
    pipeline.process_file(&SourceFile::from_path(&path)).unwrap();
    assert_eq!(sink.count_all().unwrap(), 4);
}

#[test]
fn test_empty_result_does_not_call_sink() {
    let (pipeline, sink) = memory_pipeline();
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "20250301_regelleistung_aFRR_CAPACITY.csv",
        &german_csv(&[["01.03.2025", "aFRR", "positiv", "0"]]),
    );

    let outcome = pipeline.process_file(&SourceFile::from_path(&path)).unwrap();
    assert_eq!(outcome.raw_rows, 1);
    assert_eq!(outcome.stored_rows, 0);
    assert_eq!(sink.calls(), 0);
}

#[test]
fn test_fatal_file_does_not_stop_batch() {
    let (pipeline, sink) = memory_pipeline();
    let dir = tempfile::tempdir().unwrap();
    let bad = write_file(&dir, "20250301_regelleistung_FCR_CAPACITY.csv", "x;y\n1;2\n");
    let good = write_file(
        &dir,
        "20250301_regelleistung_aFRR_CAPACITY.csv",
        &german_csv(&[["01.03.2025", "aFRR", "positiv", "3"]]),
    );

    let report = pipeline.process_files(&[SourceFile::from_path(&bad), SourceFile::from_path(&good)]);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].source_file, "20250301_regelleistung_FCR_CAPACITY.csv");
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.stored_rows(), 1);
    assert_eq!(sink.stored().len(), 1);
}

#[test]
fn test_process_file_propagates_import_error() {
    let (pipeline, _sink) = memory_pipeline();
    let dir = tempfile::tempdir().unwrap();
    let result = pipeline.process_file(&SourceFile::from_path(
        dir.path().join("20250301_regelleistung_aFRR_CAPACITY.csv"),
    ));
    assert!(matches!(result, Err(PipelineError::Import(_))));
}

#[tokio::test]
async fn test_run_concurrently_processes_all_files() {
    let (pipeline, sink) = memory_pipeline();
    let dir = tempfile::tempdir().unwrap();

    let sources: Vec<SourceFile> = ["aFRR", "mFRR", "FCR"]
        .iter()
        .map(|&product| {
            let path = write_file(
                &dir,
                &format!("20250301_regelleistung_{}_ENERGY.csv", product),
                &german_csv(&[["01.03.2025", product, "positiv", "2,5"]]),
            );
            SourceFile::from_path(path)
        })
        .collect();

    let report = pipeline.run_concurrently(sources).await;
    assert_eq!(report.processed.len(), 3);
    assert!(report.failed.is_empty());
    assert_eq!(report.stored_rows(), 3);

    let products: HashSet<String> = sink.stored().into_iter().map(|r| r.product).collect();
    assert_eq!(products.len(), 3);
    assert_eq!(sink.calls(), 3);
}

#[test]
fn test_run_default_combos_reports_missing() {
    let (pipeline, sink) = memory_pipeline();
    let dir = tempfile::tempdir().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    let present = TenderRequest::new("aFRR", "CAPACITY", date, ExportFormat::Csv);
    write_file(
        &dir,
        &tender_file_name(&present),
        &german_csv(&[["01.03.2025", "aFRR", "negativ", "8"]]),
    );

    let fetcher = LocalDirectoryFetcher::new(dir.path());
    let report = pipeline.run_default_combos(&fetcher, date, ExportFormat::Csv);

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.missing.len(), 5);
    assert!(!report.missing.contains(&"aFRR-CAPACITY".to_string()));
    assert_eq!(sink.stored().len(), 1);
}
