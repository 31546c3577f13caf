use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppMode, ListPurpose};

use super::theme::Theme;

/// Footer widget showing keyboard hints
pub struct Footer<'a> {
    mode: AppMode,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(mode: AppMode, theme: &'a Theme) -> Self {
        Self { mode, theme }
    }
}

fn hints_for(mode: AppMode) -> Vec<(&'static str, &'static str)> {
    match mode {
        AppMode::Initializing => vec![("Ctrl+C", "Quit")],
        AppMode::MainMenu => vec![
            ("1-5", "Choose"),
            ("↑↓", "Navigate"),
            ("Enter", "Select"),
            ("q", "Quit"),
        ],
        AppMode::Settings => vec![
            ("1-3", "Choose"),
            ("↑↓", "Navigate"),
            ("Enter", "Select"),
            ("Esc", "Back"),
        ],
        AppMode::BackupList(ListPurpose::Restore) => vec![
            ("↑↓", "Navigate"),
            ("Enter", "Restore"),
            ("Esc", "Back"),
        ],
        AppMode::BackupList(ListPurpose::View) => vec![("↑↓", "Navigate"), ("Esc", "Back")],
        AppMode::Deleting => vec![
            ("↑↓", "Navigate"),
            ("Space", "Mark"),
            ("→", "Mark all"),
            ("←", "Unmark all"),
            ("Enter", "Delete"),
            ("Esc", "Back"),
        ],
        AppMode::RestoreConfirmation | AppMode::DeleteConfirmation => {
            vec![("y", "Yes"), ("n", "Cancel")]
        }
        AppMode::CreateBackup | AppMode::ChangeSavePath | AppMode::ChangeBackupDir => {
            vec![("Enter", "Confirm"), ("Esc", "Cancel")]
        }
        AppMode::FirstRunSavePath => vec![("Enter", "Next"), ("Ctrl+C", "Quit")],
        AppMode::FirstRunBackupDir => vec![
            ("Enter", "Finish"),
            ("Esc", "Back"),
            ("Ctrl+C", "Quit"),
        ],
        AppMode::Error => vec![("Ctrl+C", "Quit")],
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let hints = hints_for(self.mode);

        let key_style = Style::default()
            .fg(self.theme.fg)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg_dim);
        let sep_style = Style::default().fg(self.theme.border);

        let mut x = area.x + 1;
        for (i, (key, desc)) in hints.iter().enumerate() {
            // Key
            buf.set_string(x, area.y, *key, key_style);
            x += key.chars().count() as u16 + 1;

            // Description
            buf.set_string(x, area.y, *desc, desc_style);
            x += desc.chars().count() as u16;

            // Separator
            if i < hints.len() - 1 {
                buf.set_string(x, area.y, "  │  ", sep_style);
                x += 5;
            }

            if x >= area.x + area.width - 5 {
                break;
            }
        }
    }
}
