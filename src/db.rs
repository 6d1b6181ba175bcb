// ==========================================
// 平衡市场容量中标导入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等（CREATE TABLE IF NOT EXISTS）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 库表结构
///
/// 说明：
/// - capacity_awards 只追加，CHECK 约束兜底容量 > 0
/// - config_kv 与 scope 组合唯一
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS capacity_awards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    delivery_date TEXT,
    product TEXT NOT NULL,
    direction TEXT NOT NULL,
    awarded_capacity_mw REAL NOT NULL CHECK (awarded_capacity_mw > 0),
    source_file TEXT NOT NULL CHECK (length(source_file) > 0)
);

CREATE INDEX IF NOT EXISTS idx_capacity_awards_product
    ON capacity_awards (product);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接、应用统一配置并确保表结构存在
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
