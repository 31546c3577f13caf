use std::path::{Path, PathBuf};
use std::sync::Arc;

use savekeep_core::{
    BackupEngine, BackupRecord, Clock, Config, SavekeepError, SystemClock, ensure_writable,
};

use super::input::TextInput;
use super::selection::SelectionSet;

/// Entries of the main menu, in key order (1-5)
pub const MAIN_MENU_ITEMS: [&str; 5] = [
    "Create Backup",
    "Restore Backup",
    "List Backups",
    "Delete Backups",
    "Settings",
];

/// Number of entries in the settings menu
pub const SETTINGS_ITEM_COUNT: usize = 3;

const SAVE_PATH_PROMPT: &str = "Enter your game's save file path";
const BACKUP_DIR_PROMPT: &str = "Enter your backup directory";
const RETRY_PROMPT: &str = "Invalid path. Try again.";

/// Why the backup list is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPurpose {
    Restore,
    View,
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Opening the catalog
    Initializing,
    MainMenu,
    /// Plain backup listing
    BackupList(ListPurpose),
    /// Naming a new backup
    CreateBackup,
    RestoreConfirmation,
    /// Multi-select listing for bulk delete
    Deleting,
    DeleteConfirmation,
    Settings,
    ChangeSavePath,
    ChangeBackupDir,
    /// First-run setup, step 1
    FirstRunSavePath,
    /// First-run setup, step 2
    FirstRunBackupDir,
    /// Fatal error; only quitting is possible
    Error,
}

impl AppMode {
    /// Whether keystrokes go into the text input
    pub fn is_text_input(self) -> bool {
        matches!(
            self,
            AppMode::CreateBackup
                | AppMode::ChangeSavePath
                | AppMode::ChangeBackupDir
                | AppMode::FirstRunSavePath
                | AppMode::FirstRunBackupDir
        )
    }

    /// Whether the backup listing is on screen
    pub fn shows_listing(self) -> bool {
        matches!(
            self,
            AppMode::BackupList(_)
                | AppMode::RestoreConfirmation
                | AppMode::Deleting
                | AppMode::DeleteConfirmation
        )
    }
}

/// Transient success message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
}

/// Application state
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Mode before the last transition
    pub previous_mode: AppMode,
    /// Active configuration
    pub config: Config,
    /// Where the configuration is persisted
    pub config_path: PathBuf,
    /// Catalog engine (None until initialized)
    engine: Option<BackupEngine>,
    clock: Arc<dyn Clock>,
    /// Backups as last fetched, most recent first
    pub backups: Vec<BackupRecord>,
    /// Cursor in the backup listing
    pub selected_index: usize,
    /// Scroll offset of the backup listing
    pub scroll_offset: usize,
    /// Visible area height (set by UI)
    pub visible_height: usize,
    /// Cursor in the main menu
    pub menu_index: usize,
    /// Cursor in the settings menu
    pub settings_index: usize,
    /// Backups marked for deletion
    pub selection: SelectionSet,
    /// Text field shared by all input screens
    pub input: TextInput,
    /// Inline validation error for the input screen
    pub input_error: Option<String>,
    /// Save path entered during first-run setup, until the backup dir is given
    pending_save_path: Option<String>,
    /// Backup awaiting restore confirmation
    pub pending_restore: Option<BackupRecord>,
    /// Current transient message
    pub notification: Option<Notification>,
    next_notification_id: u64,
    /// Notification ids that still need a clear timer
    scheduled_clears: Vec<u64>,
    /// Fatal error message
    pub error_message: Option<String>,
    /// Whether app should quit
    pub should_quit: bool,
}

impl AppState {
    pub fn new(config_path: PathBuf, config: Option<Config>) -> Self {
        Self::with_clock(config_path, config, Arc::new(SystemClock))
    }

    /// Start from a loaded configuration, or first-run setup if there is none
    pub fn with_clock(config_path: PathBuf, config: Option<Config>, clock: Arc<dyn Clock>) -> Self {
        let first_run = config.is_none();
        let mut state = Self {
            mode: AppMode::Initializing,
            previous_mode: AppMode::Initializing,
            config: config.unwrap_or_else(|| Config::new("", "")),
            config_path,
            engine: None,
            clock,
            backups: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            visible_height: 20,
            menu_index: 0,
            settings_index: 0,
            selection: SelectionSet::new(),
            input: TextInput::default(),
            input_error: None,
            pending_save_path: None,
            pending_restore: None,
            notification: None,
            next_notification_id: 0,
            scheduled_clears: Vec::new(),
            error_message: None,
            should_quit: false,
        };

        if first_run {
            state.input.reset(SAVE_PATH_PROMPT);
            state.mode = AppMode::FirstRunSavePath;
            state.previous_mode = AppMode::FirstRunSavePath;
        }
        state
    }

    fn transition_to(&mut self, mode: AppMode) {
        tracing::debug!(from = ?self.mode, to = ?mode, "transition");
        self.previous_mode = self.mode;
        self.mode = mode;
    }

    /// Enter the fatal error state
    fn fail(&mut self, context: &str, error: SavekeepError) {
        tracing::error!(error = %error, "{}", context);
        self.error_message = Some(format!("{}: {}", context, error));
        self.transition_to(AppMode::Error);
    }

    /// Open the catalog when in `Initializing`
    pub fn initialize(&mut self) {
        if self.mode != AppMode::Initializing {
            return;
        }

        match BackupEngine::open_with_clock(&self.config, self.clock.clone()) {
            Ok(engine) => {
                self.engine = Some(engine);
                self.menu_index = 0;
                self.transition_to(AppMode::MainMenu);
            }
            Err(e) => self.fail("failed to open backup catalog", e),
        }
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // --- Notifications ---

    /// Show a transient message and queue its clear timer
    fn notify(&mut self, message: impl Into<String>) {
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        self.notification = Some(Notification {
            id,
            message: message.into(),
        });
        self.scheduled_clears.push(id);
    }

    /// Drain notification ids waiting for a clear timer
    pub fn take_scheduled_clears(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.scheduled_clears)
    }

    /// Clear the notification if it is still the one the timer was set for
    pub fn clear_notification(&mut self, id: u64) {
        if self.notification.as_ref().is_some_and(|n| n.id == id) {
            self.notification = None;
        }
    }

    // --- Navigation ---

    /// Ensure the given index is visible within the scroll viewport
    fn ensure_visible_for(selected: usize, scroll: &mut usize, visible_height: usize) {
        if selected < *scroll {
            *scroll = selected;
        } else if selected >= *scroll + visible_height {
            *scroll = selected + 1 - visible_height.max(1);
        }
    }

    /// Menu cursor and its length, when a menu is shown
    fn menu_cursor_mut(&mut self) -> Option<(&mut usize, usize)> {
        match self.mode {
            AppMode::MainMenu => Some((&mut self.menu_index, MAIN_MENU_ITEMS.len())),
            AppMode::Settings => Some((&mut self.settings_index, SETTINGS_ITEM_COUNT)),
            _ => None,
        }
    }

    fn listing_navigable(&self) -> bool {
        matches!(self.mode, AppMode::BackupList(_) | AppMode::Deleting)
    }

    fn set_list_cursor(&mut self, index: usize) {
        self.selected_index = index.min(self.backups.len().saturating_sub(1));
        Self::ensure_visible_for(
            self.selected_index,
            &mut self.scroll_offset,
            self.visible_height,
        );
    }

    /// Move cursor up
    pub fn move_up(&mut self) {
        if let Some((cursor, _)) = self.menu_cursor_mut() {
            *cursor = cursor.saturating_sub(1);
        } else if self.listing_navigable() {
            self.set_list_cursor(self.selected_index.saturating_sub(1));
        }
    }

    /// Move cursor down
    pub fn move_down(&mut self) {
        if let Some((cursor, len)) = self.menu_cursor_mut() {
            *cursor = (*cursor + 1).min(len - 1);
        } else if self.listing_navigable() {
            self.set_list_cursor(self.selected_index + 1);
        }
    }

    /// Move cursor up by a page
    pub fn page_up(&mut self) {
        if self.listing_navigable() {
            let page = self.visible_height.saturating_sub(2).max(1);
            self.set_list_cursor(self.selected_index.saturating_sub(page));
        }
    }

    /// Move cursor down by a page
    pub fn page_down(&mut self) {
        if self.listing_navigable() {
            let page = self.visible_height.saturating_sub(2).max(1);
            self.set_list_cursor(self.selected_index + page);
        }
    }

    /// Go to first item
    pub fn go_to_first(&mut self) {
        if let Some((cursor, _)) = self.menu_cursor_mut() {
            *cursor = 0;
        } else if self.listing_navigable() {
            self.set_list_cursor(0);
        }
    }

    /// Go to last item
    pub fn go_to_last(&mut self) {
        if let Some((cursor, len)) = self.menu_cursor_mut() {
            *cursor = len - 1;
        } else if self.listing_navigable() {
            self.set_list_cursor(self.backups.len().saturating_sub(1));
        }
    }

    /// Fetch the listing again; invalidates the selection
    fn refresh_listing(&mut self) -> bool {
        let result = match &self.engine {
            Some(engine) => engine.list_backups(),
            None => Err(catalog_not_open()),
        };

        match result {
            Ok(backups) => {
                self.backups = backups;
                self.selected_index = 0;
                self.scroll_offset = 0;
                self.selection.clear();
                true
            }
            Err(e) => {
                self.fail("failed to list backups", e);
                false
            }
        }
    }

    fn return_to_main_menu(&mut self) {
        self.selection.clear();
        self.pending_restore = None;
        self.transition_to(AppMode::MainMenu);
    }

    // --- Dispatch ---

    /// Pick a numbered entry of the visible menu
    pub fn choose(&mut self, entry: usize) {
        match self.mode {
            AppMode::MainMenu => self.open_main_menu_entry(entry),
            AppMode::Settings => self.open_settings_entry(entry),
            _ => {}
        }
    }

    /// Enter key
    pub fn submit(&mut self) {
        match self.mode {
            AppMode::MainMenu => self.open_main_menu_entry(self.menu_index + 1),
            AppMode::Settings => self.open_settings_entry(self.settings_index + 1),
            AppMode::BackupList(ListPurpose::Restore) => self.request_restore(),
            AppMode::Deleting => self.request_delete(),
            AppMode::CreateBackup => self.submit_create(),
            AppMode::ChangeSavePath => self.submit_save_path(),
            AppMode::ChangeBackupDir => self.submit_backup_dir(),
            AppMode::FirstRunSavePath => self.submit_first_run_save_path(),
            AppMode::FirstRunBackupDir => self.submit_first_run_backup_dir(),
            _ => {}
        }
    }

    /// Leave the current screen without committing anything
    pub fn back(&mut self) {
        match self.mode {
            AppMode::BackupList(_) | AppMode::Deleting | AppMode::Settings => {
                self.return_to_main_menu()
            }
            AppMode::RestoreConfirmation | AppMode::DeleteConfirmation => self.decline(),
            AppMode::CreateBackup | AppMode::ChangeSavePath | AppMode::ChangeBackupDir => {
                self.input_error = None;
                self.transition_to(self.previous_mode);
            }
            AppMode::FirstRunBackupDir => {
                self.input.reset(SAVE_PATH_PROMPT);
                if let Some(save_path) = self.pending_save_path.take() {
                    self.input.set_value(&save_path);
                }
                self.input_error = None;
                self.transition_to(AppMode::FirstRunSavePath);
            }
            _ => {}
        }
    }

    /// Type into the text input
    pub fn input_char(&mut self, ch: char) {
        if self.mode.is_text_input() {
            self.input.insert(ch);
        }
    }

    /// Backspace in the text input
    pub fn input_backspace(&mut self) {
        if self.mode.is_text_input() {
            self.input.backspace();
        }
    }

    fn open_main_menu_entry(&mut self, entry: usize) {
        match entry {
            1 => {
                self.input.reset("My awesome backup");
                self.input_error = None;
                self.transition_to(AppMode::CreateBackup);
            }
            2 => self.open_backup_list(ListPurpose::Restore),
            3 => self.open_backup_list(ListPurpose::View),
            4 => {
                self.selection.clear();
                if self.refresh_listing() {
                    self.transition_to(AppMode::Deleting);
                }
            }
            5 => {
                self.settings_index = 0;
                self.transition_to(AppMode::Settings);
            }
            _ => {}
        }
    }

    fn open_backup_list(&mut self, purpose: ListPurpose) {
        if self.refresh_listing() {
            self.transition_to(AppMode::BackupList(purpose));
        }
    }

    // --- Create ---

    fn submit_create(&mut self) {
        let name = self.input.value().to_string();
        let result = match self.engine.as_mut() {
            Some(engine) => engine.create_backup(&self.config, &name),
            None => Err(catalog_not_open()),
        };

        match result {
            Ok(record) => {
                self.transition_to(AppMode::MainMenu);
                self.notify(format!("Backup '{}' created successfully!", record.name));
            }
            Err(e) => self.fail("failed to create backup", e),
        }
    }

    // --- Restore ---

    /// Hold the highlighted backup and ask for confirmation
    fn request_restore(&mut self) {
        if let Some(record) = self.backups.get(self.selected_index).cloned() {
            self.pending_restore = Some(record);
            self.transition_to(AppMode::RestoreConfirmation);
        }
    }

    /// Confirm the pending restore or delete
    pub fn confirm(&mut self) {
        match self.mode {
            AppMode::RestoreConfirmation => self.confirm_restore(),
            AppMode::DeleteConfirmation => self.confirm_delete(),
            _ => {}
        }
    }

    /// Decline the pending restore or delete
    pub fn decline(&mut self) {
        match self.mode {
            AppMode::RestoreConfirmation => {
                self.pending_restore = None;
                self.transition_to(AppMode::MainMenu);
            }
            AppMode::DeleteConfirmation => self.transition_to(AppMode::Deleting),
            _ => {}
        }
    }

    /// Restore the pending backup, taking an auto-backup first if enabled
    fn confirm_restore(&mut self) {
        let Some(record) = self.pending_restore.take() else {
            self.transition_to(AppMode::MainMenu);
            return;
        };
        let Some(engine) = self.engine.as_mut() else {
            self.fail("failed to restore backup", catalog_not_open());
            return;
        };

        let mut kept_as = None;
        if self.config.auto_backup {
            match engine.create_backup(&self.config, "") {
                Ok(auto) => kept_as = Some(auto.name),
                Err(e) => {
                    self.fail("failed to create auto-backup", e);
                    return;
                }
            }
        }

        if let Err(e) = engine.restore_backup(&self.config, &record) {
            self.fail("failed to restore backup", e);
            return;
        }

        self.transition_to(AppMode::MainMenu);
        match kept_as {
            Some(name) => self.notify(format!(
                "Backup restored successfully! Previous save kept as '{}'",
                name
            )),
            None => self.notify("Backup restored successfully!"),
        }
    }

    // --- Delete ---

    /// Mark/unmark the highlighted backup
    pub fn toggle_mark(&mut self) {
        if self.mode == AppMode::Deleting && self.selected_index < self.backups.len() {
            self.selection.toggle(self.selected_index);
        }
    }

    /// Mark every backup in the listing
    pub fn mark_all(&mut self) {
        if self.mode == AppMode::Deleting {
            self.selection.select_all(self.backups.len());
        }
    }

    /// Unmark every backup
    pub fn unmark_all(&mut self) {
        if self.mode == AppMode::Deleting {
            self.selection.clear();
        }
    }

    fn request_delete(&mut self) {
        if !self.selection.is_empty() {
            self.transition_to(AppMode::DeleteConfirmation);
        }
    }

    /// Backups currently marked for deletion
    pub fn marked_backups(&self) -> Vec<&BackupRecord> {
        self.selection
            .iter()
            .filter_map(|i| self.backups.get(i))
            .collect()
    }

    fn confirm_delete(&mut self) {
        let records: Vec<BackupRecord> = self.marked_backups().into_iter().cloned().collect();
        self.selection.clear();

        let result = match self.engine.as_mut() {
            Some(engine) => engine.delete_backups(&records),
            None => Err(catalog_not_open()),
        };

        match result {
            Ok(removed) => {
                self.transition_to(AppMode::MainMenu);
                self.notify(format!("{} backup(s) deleted successfully!", removed));
            }
            Err(e) => self.fail("failed to delete backups", e),
        }
    }

    // --- Settings ---

    fn open_settings_entry(&mut self, entry: usize) {
        match entry {
            1 => {
                self.input.reset("Enter new save path");
                self.input.set_value(&self.config.save_path.to_string_lossy());
                self.input_error = None;
                self.transition_to(AppMode::ChangeSavePath);
            }
            2 => {
                self.input.reset("Enter new backup directory");
                self.input.set_value(&self.config.backup_dir.to_string_lossy());
                self.input_error = None;
                self.transition_to(AppMode::ChangeBackupDir);
            }
            3 => self.toggle_auto_backup(),
            _ => {}
        }
    }

    fn toggle_auto_backup(&mut self) {
        self.config.auto_backup = !self.config.auto_backup;
        if let Err(e) = self.config.save(&self.config_path) {
            self.fail("failed to update auto-backup setting", e);
            return;
        }
        let status = if self.config.auto_backup { "ON" } else { "OFF" };
        self.notify(format!("Auto-backup before restore: {}", status));
    }

    fn submit_save_path(&mut self) {
        let value = self.input.value().trim().to_string();
        if value.is_empty() {
            self.input_error = Some("Save path cannot be empty".to_string());
            return;
        }

        self.config.save_path = PathBuf::from(value);
        if let Err(e) = self.config.save(&self.config_path) {
            self.fail("failed to save configuration", e);
            return;
        }
        self.transition_to(AppMode::Settings);
        self.notify("Save path updated successfully!");
    }

    /// Switch to a new backup directory and reopen the catalog there
    fn submit_backup_dir(&mut self) {
        let Some(dir) = self.validated_backup_dir() else {
            return;
        };

        let mut config = self.config.clone();
        config.backup_dir = dir;
        match BackupEngine::open_with_clock(&config, self.clock.clone()) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                self.fail("failed to open backup catalog", e);
                return;
            }
        }

        self.config = config;
        if let Err(e) = self.config.save(&self.config_path) {
            self.fail("failed to save configuration", e);
            return;
        }
        self.transition_to(AppMode::Settings);
        self.notify("Backup directory updated successfully!");
    }

    /// Probe the typed backup directory; on failure show the error and re-prompt
    fn validated_backup_dir(&mut self) -> Option<PathBuf> {
        let value = self.input.value().trim().to_string();
        if value.is_empty() {
            self.input_error = Some("Backup directory cannot be empty".to_string());
            return None;
        }

        let dir = PathBuf::from(value);
        if let Err(e) = ensure_writable(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "backup directory rejected");
            self.input_error = Some(e.to_string());
            self.input.reset(RETRY_PROMPT);
            return None;
        }
        Some(dir)
    }

    // --- First run ---

    fn submit_first_run_save_path(&mut self) {
        let value = self.input.value().trim().to_string();
        if value.is_empty() {
            return;
        }

        self.pending_save_path = Some(value);
        self.input.reset(BACKUP_DIR_PROMPT);
        self.input_error = None;
        self.transition_to(AppMode::FirstRunBackupDir);
    }

    fn submit_first_run_backup_dir(&mut self) {
        let Some(dir) = self.validated_backup_dir() else {
            return;
        };
        let Some(save_path) = self.pending_save_path.take() else {
            self.back();
            return;
        };

        self.config.save_path = PathBuf::from(save_path);
        self.config.backup_dir = dir;
        if let Err(e) = self.config.save(&self.config_path) {
            self.fail("failed to save configuration", e);
            return;
        }

        self.input_error = None;
        self.transition_to(AppMode::Initializing);
        self.initialize();
        if self.mode == AppMode::MainMenu {
            self.notify("Configuration saved successfully!");
        }
    }

    /// Save path being collected during first-run setup
    pub fn pending_save_path(&self) -> Option<&Path> {
        self.pending_save_path.as_deref().map(Path::new)
    }
}

fn catalog_not_open() -> SavekeepError {
    SavekeepError::Configuration("backup catalog is not open".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use savekeep_core::FixedClock;
    use std::fs;
    use tempfile::TempDir;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Local.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        ))
    }

    fn ready_state(temp: &TempDir, content: &str) -> AppState {
        let save_path = temp.path().join("slot.dat");
        fs::write(&save_path, content).unwrap();
        let config = Config::new(save_path, temp.path().join("backups"));
        let config_path = temp.path().join("config.json");
        config.save(&config_path).unwrap();

        let mut state = AppState::with_clock(config_path, Some(config), clock());
        assert_eq!(state.mode, AppMode::Initializing);
        state.initialize();
        assert_eq!(state.mode, AppMode::MainMenu);
        state
    }

    fn type_text(state: &mut AppState, text: &str) {
        for ch in text.chars() {
            state.input_char(ch);
        }
    }

    fn create_named(state: &mut AppState, name: &str) {
        state.choose(1);
        type_text(state, name);
        state.submit();
        assert_eq!(state.mode, AppMode::MainMenu);
    }

    fn engine(state: &AppState) -> &BackupEngine {
        state.engine.as_ref().unwrap()
    }

    #[test]
    fn test_first_run_without_config() {
        let temp = TempDir::new().unwrap();
        let state = AppState::new(temp.path().join("config.json"), None);
        assert_eq!(state.mode, AppMode::FirstRunSavePath);
        assert!(state.config.auto_backup);
    }

    #[test]
    fn test_initialize_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let config = Config::new(temp.path().join("slot.dat"), blocker.join("backups"));

        let mut state = AppState::with_clock(temp.path().join("config.json"), Some(config), clock());
        state.initialize();

        assert_eq!(state.mode, AppMode::Error);
        assert!(state.error_message.is_some());
    }

    #[test]
    fn test_create_backup_flow() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "save-v1");

        state.choose(1);
        assert_eq!(state.mode, AppMode::CreateBackup);
        assert_eq!(state.input.value(), "");
        type_text(&mut state, "before boss");
        state.submit();

        assert_eq!(state.mode, AppMode::MainMenu);
        let note = state.notification.clone().unwrap();
        assert!(note.message.contains("before boss"));
        assert_eq!(state.take_scheduled_clears(), vec![note.id]);

        let backups = engine(&state).list_backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0].path).unwrap(), "save-v1");
    }

    #[test]
    fn test_create_unnamed_uses_timestamp() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "save-v1");

        state.choose(1);
        state.submit();

        let backups = engine(&state).list_backups().unwrap();
        assert_eq!(backups[0].name, "Backup_2024-01-01_10-00-00");
    }

    #[test]
    fn test_create_cancel_commits_nothing() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");

        state.choose(1);
        type_text(&mut state, "nope");
        state.back();

        assert_eq!(state.mode, AppMode::MainMenu);
        assert!(engine(&state).list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_create_without_save_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        fs::remove_file(&state.config.save_path).unwrap();

        state.choose(1);
        state.submit();

        assert_eq!(state.mode, AppMode::Error);
        assert!(state.error_message.as_ref().unwrap().contains("not found"));
    }

    #[test]
    fn test_restore_with_auto_backup() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "save-v0");
        create_named(&mut state, "B");
        fs::write(&state.config.save_path, "save-v2").unwrap();
        assert!(state.config.auto_backup);

        state.choose(2);
        assert_eq!(state.mode, AppMode::BackupList(ListPurpose::Restore));
        assert_eq!(state.backups[0].name, "B");
        state.submit();
        assert_eq!(state.mode, AppMode::RestoreConfirmation);
        state.confirm();

        assert_eq!(state.mode, AppMode::MainMenu);
        assert_eq!(fs::read_to_string(&state.config.save_path).unwrap(), "save-v0");

        let backups = engine(&state).list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        let auto = backups.iter().find(|b| b.name != "B").unwrap();
        assert_eq!(auto.name, "Backup_2024-01-01_10-00-00");
        assert_eq!(fs::read_to_string(&auto.path).unwrap(), "save-v2");
    }

    #[test]
    fn test_failed_auto_backup_aborts_restore() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "save-v0");
        create_named(&mut state, "B");
        fs::remove_file(&state.config.save_path).unwrap();

        state.choose(2);
        state.submit();
        state.confirm();

        assert_eq!(state.mode, AppMode::Error);
        assert!(state.error_message.as_ref().unwrap().contains("auto-backup"));
        assert!(!state.config.save_path.exists());
        assert_eq!(engine(&state).list_backups().unwrap().len(), 1);
    }

    #[test]
    fn test_restore_without_auto_backup() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "save-v0");
        state.config.auto_backup = false;
        create_named(&mut state, "B");
        fs::write(&state.config.save_path, "save-v2").unwrap();

        state.choose(2);
        state.submit();
        state.confirm();

        assert_eq!(fs::read_to_string(&state.config.save_path).unwrap(), "save-v0");
        assert_eq!(engine(&state).list_backups().unwrap().len(), 1);
    }

    #[test]
    fn test_restore_decline_mutates_nothing() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "save-v0");
        create_named(&mut state, "B");
        fs::write(&state.config.save_path, "save-v2").unwrap();

        state.choose(2);
        state.submit();
        state.decline();

        assert_eq!(state.mode, AppMode::MainMenu);
        assert!(state.pending_restore.is_none());
        assert_eq!(fs::read_to_string(&state.config.save_path).unwrap(), "save-v2");
        assert_eq!(engine(&state).list_backups().unwrap().len(), 1);
    }

    #[test]
    fn test_restore_list_empty_submit_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");

        state.choose(2);
        state.submit();
        assert_eq!(state.mode, AppMode::BackupList(ListPurpose::Restore));
    }

    #[test]
    fn test_view_list_submit_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        create_named(&mut state, "a");

        state.choose(3);
        state.submit();
        assert_eq!(state.mode, AppMode::BackupList(ListPurpose::View));
        state.back();
        assert_eq!(state.mode, AppMode::MainMenu);
    }

    #[test]
    fn test_entering_delete_clears_selection() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        create_named(&mut state, "a");
        create_named(&mut state, "b");

        state.choose(4);
        state.toggle_mark();
        assert_eq!(state.selection.len(), 1);
        state.back();
        assert_eq!(state.mode, AppMode::MainMenu);

        state.choose(4);
        assert_eq!(state.mode, AppMode::Deleting);
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_delete_submit_without_marks_is_noop() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        create_named(&mut state, "a");

        state.choose(4);
        state.submit();
        assert_eq!(state.mode, AppMode::Deleting);
    }

    #[test]
    fn test_mark_all_and_unmark_all() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        for name in ["a", "b", "c"] {
            create_named(&mut state, name);
        }

        state.choose(4);
        state.mark_all();
        assert_eq!(state.selection.len(), 3);
        state.unmark_all();
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_delete_flow() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        for name in ["a", "b", "c"] {
            create_named(&mut state, name);
        }

        state.choose(4);
        // Listing is newest first: c, b, a
        state.toggle_mark();
        state.move_down();
        state.move_down();
        state.toggle_mark();
        state.submit();
        assert_eq!(state.mode, AppMode::DeleteConfirmation);

        // Declining keeps the marks
        state.decline();
        assert_eq!(state.mode, AppMode::Deleting);
        assert_eq!(state.selection.len(), 2);

        state.submit();
        state.confirm();

        assert_eq!(state.mode, AppMode::MainMenu);
        assert!(state.selection.is_empty());
        let left = engine(&state).list_backups().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "b");
        assert!(
            state
                .notification
                .as_ref()
                .unwrap()
                .message
                .starts_with("2 backup(s)")
        );
    }

    #[test]
    fn test_failed_delete_clears_selection() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        create_named(&mut state, "a");
        create_named(&mut state, "b");

        let db = rusqlite::Connection::open(temp.path().join("backups").join("backups.db")).unwrap();
        db.execute_batch(
            "CREATE TRIGGER keep_rows BEFORE DELETE ON backups
             BEGIN SELECT RAISE(ABORT, 'row is locked'); END;",
        )
        .unwrap();

        state.choose(4);
        state.mark_all();
        state.submit();
        state.confirm();

        assert_eq!(state.mode, AppMode::Error);
        assert!(state.selection.is_empty());
        assert_eq!(engine(&state).list_backups().unwrap().len(), 2);
    }

    #[test]
    fn test_first_run_setup() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.json");
        let save_path = temp.path().join("slot.dat");
        fs::write(&save_path, "x").unwrap();
        let mut state = AppState::with_clock(config_path.clone(), None, clock());

        // Empty submit does nothing
        state.submit();
        assert_eq!(state.mode, AppMode::FirstRunSavePath);

        type_text(&mut state, &save_path.to_string_lossy());
        state.submit();
        assert_eq!(state.mode, AppMode::FirstRunBackupDir);
        assert_eq!(state.pending_save_path(), Some(save_path.as_path()));

        // Not writable: shown, discarded, re-prompted
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        type_text(&mut state, &blocker.join("backups").to_string_lossy());
        state.submit();
        assert_eq!(state.mode, AppMode::FirstRunBackupDir);
        assert!(state.input_error.is_some());
        assert_eq!(state.input.value(), "");
        assert!(!config_path.exists());

        let backup_dir = temp.path().join("backups");
        type_text(&mut state, &backup_dir.to_string_lossy());
        state.submit();

        assert_eq!(state.mode, AppMode::MainMenu);
        assert!(state.pending_save_path().is_none());
        let saved = Config::load(&config_path).unwrap().unwrap();
        assert_eq!(saved.save_path, save_path);
        assert_eq!(saved.backup_dir, backup_dir);
        assert!(saved.auto_backup);
        assert!(state.notification.is_some());
    }

    #[test]
    fn test_first_run_back_restores_save_path() {
        let temp = TempDir::new().unwrap();
        let mut state = AppState::with_clock(temp.path().join("config.json"), None, clock());

        type_text(&mut state, "/games/slot.dat");
        state.submit();
        state.back();

        assert_eq!(state.mode, AppMode::FirstRunSavePath);
        assert_eq!(state.input.value(), "/games/slot.dat");
        assert!(state.pending_save_path().is_none());
    }

    #[test]
    fn test_toggle_auto_backup_persists() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");

        state.choose(5);
        assert_eq!(state.mode, AppMode::Settings);
        state.choose(3);

        assert_eq!(state.mode, AppMode::Settings);
        assert!(!state.config.auto_backup);
        let saved = Config::load(&state.config_path).unwrap().unwrap();
        assert!(!saved.auto_backup);
    }

    #[test]
    fn test_change_save_path() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        state.choose(5);
        state.choose(1);
        assert_eq!(state.mode, AppMode::ChangeSavePath);

        // Prefilled with the current path; clear it
        while !state.input.value().is_empty() {
            state.input_backspace();
        }
        state.submit();
        assert_eq!(state.mode, AppMode::ChangeSavePath);
        assert!(state.input_error.is_some());

        type_text(&mut state, "/games/other.dat");
        state.submit();
        assert_eq!(state.mode, AppMode::Settings);
        let saved = Config::load(&state.config_path).unwrap().unwrap();
        assert_eq!(saved.save_path, PathBuf::from("/games/other.dat"));
    }

    #[test]
    fn test_change_backup_dir_reopens_catalog() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        let new_dir = temp.path().join("elsewhere");

        state.choose(5);
        state.choose(2);
        while !state.input.value().is_empty() {
            state.input_backspace();
        }
        type_text(&mut state, &new_dir.to_string_lossy());
        state.submit();
        assert_eq!(state.mode, AppMode::Settings);

        state.back();
        create_named(&mut state, "moved");
        assert!(new_dir.join("moved.sav").exists());
        assert!(new_dir.join("backups.db").exists());
    }

    #[test]
    fn test_settings_input_cancel_returns_to_settings() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        let original = state.config.clone();

        state.choose(5);
        state.choose(2);
        type_text(&mut state, "junk");
        state.back();

        assert_eq!(state.mode, AppMode::Settings);
        assert_eq!(state.config, original);
    }

    #[test]
    fn test_stale_notification_clear_is_ignored() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        create_named(&mut state, "a");
        create_named(&mut state, "b");

        let ids = state.take_scheduled_clears();
        assert_eq!(ids.len(), 2);

        state.clear_notification(ids[0]);
        assert!(state.notification.is_some());
        state.clear_notification(ids[1]);
        assert!(state.notification.is_none());
    }

    #[test]
    fn test_list_scrolls_with_cursor() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");
        for name in ["a", "b", "c", "d"] {
            create_named(&mut state, name);
        }

        state.choose(3);
        state.visible_height = 2;
        state.move_down();
        state.move_down();
        state.move_down();
        assert_eq!(state.selected_index, 3);
        assert_eq!(state.scroll_offset, 2);

        state.move_down();
        assert_eq!(state.selected_index, 3);

        state.go_to_first();
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_menu_cursor_submit() {
        let temp = TempDir::new().unwrap();
        let mut state = ready_state(&temp, "x");

        state.go_to_last();
        assert_eq!(state.menu_index, 4);
        state.submit();
        assert_eq!(state.mode, AppMode::Settings);

        state.move_down();
        state.move_down();
        state.move_down();
        assert_eq!(state.settings_index, 2);
        state.back();
        assert_eq!(state.mode, AppMode::MainMenu);
    }
}
