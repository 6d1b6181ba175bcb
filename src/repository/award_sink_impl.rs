// ==========================================
// 平衡市场容量中标导入 - 中标记录写入 SQLite 实现
// ==========================================
// 职责: capacity_awards 表的追加写入与统计查询（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据写入/读取
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::award::CanonicalAwardRecord;
use crate::domain::types::Direction;
use crate::repository::award_sink::AwardSink;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

// ==========================================
// SqliteAwardSink
// ==========================================
pub struct SqliteAwardSink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAwardSink {
    /// 创建新的 Sink 实例（建表幂等）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中批量插入
    fn insert_records_tx(
        tx: &Transaction,
        records: &[CanonicalAwardRecord],
    ) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO capacity_awards (
                delivery_date, product, direction, awarded_capacity_mw, source_file
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )?;

        let mut count = 0;
        for record in records {
            stmt.execute(params![
                record.delivery_date,
                record.product,
                record.direction.as_str(),
                record.awarded_capacity_mw,
                record.source_file,
            ])?;
            count += 1;
        }
        Ok(count)
    }

    /// 总行数
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM capacity_awards", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 按产品统计行数
    pub fn count_by_product(&self, product: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM capacity_awards WHERE product = ?1",
            params![product],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 按来源文件读取（按写入顺序）
    pub fn list_by_source_file(
        &self,
        source_file: &str,
    ) -> RepositoryResult<Vec<CanonicalAwardRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT delivery_date, product, direction, awarded_capacity_mw, source_file
            FROM capacity_awards
            WHERE source_file = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![source_file], |row| {
            Ok(CanonicalAwardRecord {
                delivery_date: row.get::<_, Option<NaiveDate>>(0)?,
                product: row.get(1)?,
                direction: Direction::from_label(&row.get::<_, String>(2)?),
                awarded_capacity_mw: row.get(3)?,
                source_file: row.get(4)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

impl AwardSink for SqliteAwardSink {
    fn append(&self, records: &[CanonicalAwardRecord]) -> RepositoryResult<usize> {
        if records.is_empty() {
            debug!("没有记录需要写入");
            return Ok(0);
        }

        // 入库前校验不变式，任何一条不合格则整体拒绝
        if let Some((index, record)) = records.iter().enumerate().find(|(_, r)| !r.is_storable())
        {
            return Err(RepositoryError::ValidationError {
                index,
                message: format!(
                    "awarded_capacity_mw={} source_file={:?} product={:?}",
                    record.awarded_capacity_mw, record.source_file, record.product
                ),
            });
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let count = Self::insert_records_tx(&tx, records)?;
        tx.commit()?;

        info!(count = count, "中标记录写入完成");
        Ok(count)
    }
}
