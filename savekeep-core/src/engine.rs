use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::catalog::{BackupRecord, CatalogStore};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::{Result, SavekeepError};

/// Extension of backup files on disk
pub const BACKUP_EXTENSION: &str = "sav";

/// Timestamp format for generated names, sortable as text
pub const DEFAULT_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Business operations over the catalog: create, restore, delete.
///
/// The configuration is owned by the caller and passed into each operation.
/// All calls are synchronous and never retried.
pub struct BackupEngine {
    store: CatalogStore,
    clock: Arc<dyn Clock>,
}

impl BackupEngine {
    /// Open the catalog in the configured backup directory
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = CatalogStore::open(config.require_backup_dir()?)?;
        Ok(Self { store, clock })
    }

    /// All backups, most recent first
    pub fn list_backups(&self) -> Result<Vec<BackupRecord>> {
        self.store.list_all()
    }

    /// Copy the save file into a new backup.
    ///
    /// An empty `name` gets a timestamped default. The name is suffixed with
    /// `_1`, `_2`, ... until its file path is unused.
    pub fn create_backup(&mut self, config: &Config, name: &str) -> Result<BackupRecord> {
        let source = config.require_save_path()?;
        let backup_dir = config.require_backup_dir()?;

        if !source.exists() {
            return Err(SavekeepError::SourceNotFound(source.to_path_buf()));
        }

        let now = self.clock.now();
        let base = match sanitize_name(name) {
            Some(name) => name,
            None => default_backup_name(now),
        };
        let (resolved, path) = resolve_backup_path(backup_dir, &base);

        copy_file(source, &path)?;

        let id = self
            .store
            .insert(&resolved, &path, now)
            .inspect_err(|e| {
                // Copy stays on disk without a record
                tracing::warn!(path = %path.display(), error = %e, "backup copied but not cataloged");
            })?;

        tracing::info!(id, name = %resolved, path = %path.display(), "backup created");
        Ok(BackupRecord {
            id,
            name: resolved,
            path,
            created_at: now,
        })
    }

    /// Overwrite the save file with the backup's content
    pub fn restore_backup(&self, config: &Config, record: &BackupRecord) -> Result<()> {
        let target = config.require_save_path()?;
        copy_file(&record.path, target)?;

        tracing::info!(id = record.id, name = %record.name, "backup restored");
        Ok(())
    }

    /// Delete backups and their records, returning how many records went away
    pub fn delete_backups(&mut self, records: &[BackupRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let removed = self.store.delete_many(records)?;
        tracing::info!(requested = records.len(), removed, "backups deleted");
        Ok(removed)
    }

    /// Delete a single backup; errors if its record is already gone
    pub fn delete_backup(&mut self, record: &BackupRecord) -> Result<()> {
        self.store.delete_one(record)?;
        tracing::info!(id = record.id, name = %record.name, "backup deleted");
        Ok(())
    }
}

/// `Backup_<timestamp>` name used when the user gives none
pub fn default_backup_name(now: DateTime<Local>) -> String {
    format!("Backup_{}", now.format(DEFAULT_NAME_FORMAT))
}

/// Trim the user's name and keep it inside the backup directory
fn sanitize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace(['/', '\\'], "_"))
}

/// First unused `<name>.sav`, `<name>_1.sav`, ... in `dir`
fn resolve_backup_path(dir: &Path, base: &str) -> (String, PathBuf) {
    let mut name = base.to_string();
    let mut counter = 1;
    loop {
        let path = dir.join(format!("{}.{}", name, BACKUP_EXTENSION));
        if !path.exists() {
            return (name, path);
        }
        name = format!("{}_{}", base, counter);
        counter += 1;
    }
}

/// Copy full file content, classifying read and write failures
fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let data = fs::read(from).map_err(|source| SavekeepError::SourceRead {
        path: from.to_path_buf(),
        source,
    })?;
    fs::write(to, data).map_err(|source| SavekeepError::DestWrite {
        path: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        config: Config,
        engine: BackupEngine,
    }

    fn fixture(content: &str) -> Fixture {
        let temp = TempDir::new().unwrap();
        let save_path = temp.path().join("game").join("slot1.dat");
        fs::create_dir_all(save_path.parent().unwrap()).unwrap();
        fs::write(&save_path, content).unwrap();

        let config = Config::new(save_path, temp.path().join("backups"));
        let clock = FixedClock(Local.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        let engine = BackupEngine::open_with_clock(&config, Arc::new(clock)).unwrap();

        Fixture {
            _temp: temp,
            config,
            engine,
        }
    }

    #[test]
    fn test_default_name_scenario() {
        let mut f = fixture("save-v1");

        let record = f.engine.create_backup(&f.config, "").unwrap();

        assert_eq!(record.name, "Backup_2024-01-01_10-00-00");
        assert_eq!(
            record.path,
            f.config.backup_dir.join("Backup_2024-01-01_10-00-00.sav")
        );
        assert_eq!(fs::read_to_string(&record.path).unwrap(), "save-v1");

        let listed = f.engine.list_backups().unwrap();
        assert_eq!(listed, vec![record]);
    }

    #[test]
    fn test_whitespace_name_is_default() {
        let mut f = fixture("x");
        let record = f.engine.create_backup(&f.config, "   ").unwrap();
        assert_eq!(record.name, "Backup_2024-01-01_10-00-00");
    }

    #[test]
    fn test_collisions_get_numbered_suffixes() {
        let mut f = fixture("x");

        let paths: Vec<PathBuf> = (0..4)
            .map(|_| f.engine.create_backup(&f.config, "boss").unwrap().path)
            .collect();

        let dir = &f.config.backup_dir;
        assert_eq!(
            paths,
            vec![
                dir.join("boss.sav"),
                dir.join("boss_1.sav"),
                dir.join("boss_2.sav"),
                dir.join("boss_3.sav"),
            ]
        );

        let mut names: Vec<_> = f
            .engine
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        assert_eq!(names, ["boss", "boss_1", "boss_2", "boss_3"]);
    }

    #[test]
    fn test_collision_with_foreign_file() {
        let mut f = fixture("x");
        fs::write(f.config.backup_dir.join("manual.sav"), "not ours").unwrap();

        let record = f.engine.create_backup(&f.config, "manual").unwrap();
        assert_eq!(record.name, "manual_1");
    }

    #[test]
    fn test_name_cannot_escape_backup_dir() {
        let mut f = fixture("x");
        let record = f.engine.create_backup(&f.config, "../outside").unwrap();

        assert_eq!(record.name, ".._outside");
        assert_eq!(record.path.parent().unwrap(), f.config.backup_dir);
    }

    #[test]
    fn test_missing_source() {
        let mut f = fixture("x");
        fs::remove_file(&f.config.save_path).unwrap();

        let err = f.engine.create_backup(&f.config, "").unwrap_err();
        assert!(matches!(err, SavekeepError::SourceNotFound(_)));
        assert!(f.engine.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_unconfigured_save_path() {
        let mut f = fixture("x");
        let config = Config::new("", f.config.backup_dir.clone());

        let err = f.engine.create_backup(&config, "").unwrap_err();
        assert!(matches!(err, SavekeepError::Configuration(_)));
    }

    #[test]
    fn test_open_requires_backup_dir() {
        let err = BackupEngine::open(&Config::new("/a.sav", "")).err().unwrap();
        assert!(matches!(err, SavekeepError::Configuration(_)));
    }

    #[test]
    fn test_restore_round_trip() {
        let mut f = fixture("original");
        let record = f.engine.create_backup(&f.config, "keep").unwrap();

        fs::write(&f.config.save_path, "changed").unwrap();
        f.engine.restore_backup(&f.config, &record).unwrap();

        assert_eq!(fs::read_to_string(&f.config.save_path).unwrap(), "original");
    }

    #[test]
    fn test_restore_missing_backup_file() {
        let mut f = fixture("original");
        let record = f.engine.create_backup(&f.config, "keep").unwrap();
        fs::remove_file(&record.path).unwrap();

        let err = f.engine.restore_backup(&f.config, &record).unwrap_err();
        assert!(matches!(err, SavekeepError::SourceRead { .. }));
        assert_eq!(fs::read_to_string(&f.config.save_path).unwrap(), "original");
    }

    #[test]
    fn test_restore_unwritable_target() {
        let mut f = fixture("original");
        let record = f.engine.create_backup(&f.config, "keep").unwrap();

        // Target's parent is a regular file
        let blocker = f.config.backup_dir.join("blocker");
        fs::write(&blocker, "x").unwrap();
        let config = Config::new(blocker.join("slot.dat"), f.config.backup_dir.clone());

        let err = f.engine.restore_backup(&config, &record).unwrap_err();
        assert!(matches!(err, SavekeepError::DestWrite { .. }));
    }

    #[test]
    fn test_empty_delete_is_noop() {
        let mut f = fixture("x");
        f.engine.create_backup(&f.config, "a").unwrap();

        assert_eq!(f.engine.delete_backups(&[]).unwrap(), 0);
        assert_eq!(f.engine.list_backups().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_backups() {
        let mut f = fixture("x");
        let a = f.engine.create_backup(&f.config, "a").unwrap();
        let b = f.engine.create_backup(&f.config, "b").unwrap();
        f.engine.create_backup(&f.config, "c").unwrap();

        let removed = f.engine.delete_backups(&[a.clone(), b.clone()]).unwrap();

        assert_eq!(removed, 2);
        assert!(!a.path.exists());
        assert!(!b.path.exists());
        let left = f.engine.list_backups().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "c");
    }

    #[test]
    fn test_deleted_name_is_reused() {
        let mut f = fixture("x");
        let first = f.engine.create_backup(&f.config, "slot").unwrap();
        f.engine.delete_backup(&first).unwrap();

        let again = f.engine.create_backup(&f.config, "slot").unwrap();
        assert_eq!(again.name, "slot");
    }
}
