// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证提取参数读取、默认值与非法值处理
// ==========================================


use chrono::NaiveDate;
use regelleistung_awards::config::{
    config_keys, ConfigError, ConfigManager, ExtractionConfigReader, ExtractionSettings,
};
use test_helpers::create_test_db;

fn processing_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
}

#[test]
fn test_defaults_without_stored_values() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    assert_eq!(config_manager.get_grid_product_token().unwrap(), "FCR");
    assert_eq!(config_manager.get_grid_market_token().unwrap(), "CAPACITY");
    assert_eq!(
        config_manager.get_accepted_years(processing_date()).unwrap(),
        vec![2024, 2025, 2026]
    );
    assert_eq!(config_manager.get_tabular_excel_skip_rows().unwrap(), 2);
    assert_eq!(config_manager.get_csv_delimiter().unwrap(), ';');
    assert_eq!(config_manager.get_decimal_separator().unwrap(), ',');
    assert_eq!(config_manager.get_thousands_separator().unwrap(), '.');

    let settings = ExtractionSettings::from_reader(&config_manager, processing_date()).unwrap();
    assert_eq!(settings, ExtractionSettings::for_processing_date(processing_date()));
}

#[test]
fn test_stored_values_override_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    config_manager
        .set_config_value(config_keys::CSV_DELIMITER, ",")
        .unwrap();
    config_manager
        .set_config_value(config_keys::DECIMAL_SEPARATOR, ".")
        .unwrap();
    config_manager
        .set_config_value(config_keys::THOUSANDS_SEPARATOR, ",")
        .unwrap();
    config_manager
        .set_config_value(config_keys::ACCEPTED_YEARS, "2030")
        .unwrap();
    config_manager
        .set_config_value(config_keys::TABULAR_EXCEL_SKIP_ROWS, "0")
        .unwrap();

    let settings = ExtractionSettings::from_reader(&config_manager, processing_date()).unwrap();
    assert_eq!(settings.csv_delimiter, ',');
    assert_eq!(settings.decimal_separator, '.');
    assert_eq!(settings.thousands_separator, ',');
    assert_eq!(settings.accepted_years, vec![2030]);
    assert_eq!(settings.tabular_excel_skip_rows, 0);

    // 覆写同一键
    config_manager
        .set_config_value(config_keys::TABULAR_EXCEL_SKIP_ROWS, "3")
        .unwrap();
    assert_eq!(config_manager.get_tabular_excel_skip_rows().unwrap(), 3);

    let snapshot: serde_json::Value =
        serde_json::from_str(&config_manager.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot[config_keys::TABULAR_EXCEL_SKIP_ROWS], "3");
}

#[test]
fn test_malformed_value_is_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    config_manager
        .set_config_value(config_keys::TABULAR_EXCEL_SKIP_ROWS, "two")
        .unwrap();
    assert!(matches!(
        config_manager.get_tabular_excel_skip_rows(),
        Err(ConfigError::ConfigValueError { .. })
    ));

    config_manager
        .set_config_value(config_keys::TABULAR_EXCEL_SKIP_ROWS, "2")
        .unwrap();
    config_manager
        .set_config_value(config_keys::DECIMAL_SEPARATOR, ".")
        .unwrap();
    // 小数分隔符与千分位分隔符冲突
    assert!(matches!(
        ExtractionSettings::from_reader(&config_manager, processing_date()),
        Err(ConfigError::ConfigValueError { .. })
    ));
}

#[test]
fn test_empty_year_list_is_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    // 仅有分隔符的年份列表不能静默关闭网格日期恢复
    config_manager
        .set_config_value(config_keys::ACCEPTED_YEARS, ",")
        .unwrap();
    assert!(matches!(
        config_manager.get_accepted_years(processing_date()),
        Err(ConfigError::ConfigValueError { .. })
    ));
    assert!(ExtractionSettings::from_reader(&config_manager, processing_date()).is_err());
}

#[test]
fn test_csv_delimiter_conflicts_are_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    // 与默认小数分隔符 ',' 冲突
    config_manager
        .set_config_value(config_keys::CSV_DELIMITER, ",")
        .unwrap();
    assert!(matches!(
        ExtractionSettings::from_reader(&config_manager, processing_date()),
        Err(ConfigError::ConfigValueError { .. })
    ));

    // 非 ASCII 分隔符无法交给 CSV 解析器
    config_manager
        .set_config_value(config_keys::CSV_DELIMITER, "¦")
        .unwrap();
    assert!(matches!(
        ExtractionSettings::from_reader(&config_manager, processing_date()),
        Err(ConfigError::ConfigValueError { .. })
    ));
}
