pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod probe;

pub use catalog::{BackupRecord, CatalogStore};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, default_config_path};
pub use engine::{BackupEngine, default_backup_name};
pub use error::{Result, SavekeepError};
pub use probe::ensure_writable;
