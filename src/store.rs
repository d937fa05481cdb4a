//! SQLite による速度取締レコードの永続化
//!
//! - `speed_controls` テーブルへの追記のみ（更新・削除はしない）
//! - 追記は1トランザクションで行い、失敗時は1件も残らない

use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::radares::{CanonicalRecord, StoredRecord};
use crate::traits::RecordStore;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS speed_controls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    district TEXT NOT NULL,
    created_datetime INTEGER NOT NULL,
    location TEXT NOT NULL
);";

const INSERT_SQL: &str =
    "INSERT INTO speed_controls (district, created_datetime, location) VALUES (?1, ?2, ?3)";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// SQLiteファイルを開く（親ディレクトリとテーブルがなければ作成）
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening store: {:?}", path);
        Self::bootstrap(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(Self { conn })
    }

    /// 保存済みレコードを挿入順で返す
    pub fn records(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, district, created_datetime, location FROM speed_controls ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StoredRecord {
                id: row.get(0)?,
                record: CanonicalRecord {
                    district: row.get(1)?,
                    created_at: row.get(2)?,
                    location: row.get(3)?,
                },
            })
        })?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl RecordStore for SqliteStore {
    fn read_max_created_at(&self) -> Result<Option<i64>, StoreError> {
        let max = self.conn.query_row(
            "SELECT MAX(created_datetime) FROM speed_controls",
            [],
            |row| row.get::<_, Option<i64>>(0),
        )?;
        debug!("Most recent stored created_datetime: {:?}", max);
        Ok(max)
    }

    fn append_all(&mut self, records: &[CanonicalRecord]) -> Result<usize, StoreError> {
        if let Some(incomplete) = records.iter().find(|r| !r.has_location()) {
            return Err(StoreError::InvalidRecord(format!(
                "場所が空です: district={:?} created_at={}",
                incomplete.district, incomplete.created_at
            )));
        }

        let started_at = Instant::now();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_SQL)?;
            for record in records {
                stmt.execute(params![record.district, record.created_at, record.location])?;
            }
        }
        tx.commit()?;

        info!(
            "Appended {} records in {:?}",
            records.len(),
            started_at.elapsed()
        );
        Ok(records.len())
    }
}
