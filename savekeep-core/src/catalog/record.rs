use std::path::PathBuf;

use chrono::{DateTime, Local};

/// Display format for `created_at`
pub const CREATED_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single backup in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Catalog-assigned id
    pub id: i64,
    /// Resolved (collision-free) name
    pub name: String,
    /// Location of the copied content
    pub path: PathBuf,
    /// When the copy was taken
    pub created_at: DateTime<Local>,
}

impl BackupRecord {
    /// Creation time formatted for list display
    pub fn created_label(&self) -> String {
        self.created_at.format(CREATED_LABEL_FORMAT).to_string()
    }
}
