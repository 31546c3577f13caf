mod record;

pub use record::{BackupRecord, CREATED_LABEL_FORMAT};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rusqlite::{Connection, params};

use crate::{Result, SavekeepError};

/// File name of the catalog database inside the backup directory
pub const CATALOG_FILE: &str = "backups.db";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS backups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        path TEXT NOT NULL,
        created_at DATETIME NOT NULL
    )
";

/// Durable mapping of backup records to their copied files.
///
/// There is exactly one writer: the store is not meant to be shared between
/// processes.
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Open (or create) the catalog in `backup_dir`
    pub fn open(backup_dir: &Path) -> Result<Self> {
        fs::create_dir_all(backup_dir)?;

        let db_path = backup_dir.join(CATALOG_FILE);
        let conn = Connection::open(&db_path)?;
        conn.execute_batch(SCHEMA)?;

        tracing::debug!(path = %db_path.display(), "catalog opened");
        Ok(Self { conn })
    }

    /// Append a record, returning its id
    pub fn insert(&self, name: &str, path: &Path, created_at: DateTime<Local>) -> Result<i64> {
        let path_str = path.to_string_lossy();
        self.conn.execute(
            "INSERT INTO backups (name, path, created_at) VALUES (?1, ?2, ?3)",
            params![name, path_str.as_ref(), created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Snapshot of all records, most recent first
    pub fn list_all(&self) -> Result<Vec<BackupRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, path, created_at FROM backups ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(BackupRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                path: PathBuf::from(row.get::<_, String>(2)?),
                created_at: row.get(3)?,
            })
        })?;

        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Delete several backups.
    ///
    /// File removal is best effort: a failure is logged and the record's row
    /// is still removed. Row removals share one transaction; if any of them
    /// fails, none are applied, but files already removed stay removed.
    ///
    /// Returns the number of catalog rows removed.
    pub fn delete_many(&mut self, records: &[BackupRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;

        let mut removed = 0;
        for record in records {
            remove_backup_file(record);
            removed += tx.execute("DELETE FROM backups WHERE id = ?1", params![record.id])?;
        }

        tx.commit()?;
        Ok(removed)
    }

    /// Delete a single backup; fails if its row is already gone
    pub fn delete_one(&mut self, record: &BackupRecord) -> Result<()> {
        remove_backup_file(record);

        let affected = self
            .conn
            .execute("DELETE FROM backups WHERE id = ?1", params![record.id])?;
        if affected == 0 {
            return Err(SavekeepError::RecordNotFound(record.id));
        }
        Ok(())
    }
}

fn remove_backup_file(record: &BackupRecord) {
    if let Err(e) = fs::remove_file(&record.path) {
        tracing::warn!(
            id = record.id,
            path = %record.path.display(),
            error = %e,
            "could not remove backup file, dropping record anyway"
        );
    }
}
