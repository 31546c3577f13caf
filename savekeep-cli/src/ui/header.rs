use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppMode, AppState};

use super::layout::truncate_start;
use super::theme::Theme;

/// Header widget showing title, save path, and status
pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        // Title
        let title = "SAVEKEEP";
        let title_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x + 1, area.y, title, title_style);

        // Separator
        buf.set_string(
            area.x + 10,
            area.y,
            "─",
            Style::default().fg(self.theme.border),
        );

        // Status (right-aligned)
        let status = match self.state.mode {
            AppMode::FirstRunSavePath | AppMode::FirstRunBackupDir => "First-time setup".to_string(),
            AppMode::Deleting | AppMode::DeleteConfirmation => format!(
                "{} of {} marked",
                self.state.selection.len(),
                self.state.backups.len()
            ),
            mode if mode.shows_listing() => format!(
                "{} backup{}",
                self.state.backups.len(),
                if self.state.backups.len() == 1 { "" } else { "s" }
            ),
            _ => format!(
                "Auto-backup {}",
                if self.state.config.auto_backup { "ON" } else { "OFF" }
            ),
        };
        let status_width = status.chars().count() as u16;

        // Save path (the one being entered during setup)
        let path = self
            .state
            .pending_save_path()
            .unwrap_or(self.state.config.save_path.as_path())
            .to_string_lossy();
        if !path.is_empty() {
            let max_path_len = area.width.saturating_sub(status_width + 16) as usize;
            buf.set_string(
                area.x + 12,
                area.y,
                truncate_start(&path, max_path_len),
                Style::default().fg(self.theme.fg),
            );
        }

        let status_x = area.x + area.width.saturating_sub(status_width + 2);
        buf.set_string(
            status_x,
            area.y,
            &status,
            Style::default().fg(self.theme.fg_dim),
        );
    }
}
