use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use savekeep_core::BackupRecord;

use crate::app::SelectionSet;

use super::theme::Theme;

/// How list rows are decorated
#[derive(Clone, Copy)]
pub enum ListStyle<'a> {
    /// Name and date only
    Plain,
    /// Leading checkbox reflecting the delete selection
    Checkbox(&'a SelectionSet),
}

/// Scrolling list of backups, newest first
pub struct BackupListView<'a> {
    backups: &'a [BackupRecord],
    selected_index: usize,
    scroll_offset: usize,
    style: ListStyle<'a>,
    theme: &'a Theme,
}

impl<'a> BackupListView<'a> {
    pub fn new(
        backups: &'a [BackupRecord],
        selected_index: usize,
        scroll_offset: usize,
        style: ListStyle<'a>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            backups,
            selected_index,
            scroll_offset,
            style,
            theme,
        }
    }
}

impl Widget for BackupListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 30 {
            return;
        }

        if self.backups.is_empty() {
            let msg = "No backups yet";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            buf.set_string(x, y, msg, Style::default().fg(self.theme.fg_dim));
            return;
        }

        let date_width: u16 = 19;

        for (i, record) in self
            .backups
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(area.height as usize)
        {
            let y = area.y + (i - self.scroll_offset) as u16;
            let is_cursor = i == self.selected_index;
            let is_marked = match self.style {
                ListStyle::Checkbox(selection) => selection.contains(i),
                ListStyle::Plain => false,
            };
            let row_style = self.theme.row_style(is_cursor, is_marked);

            // Clear the row
            buf.set_string(area.x, y, " ".repeat(area.width as usize), row_style);

            let mut x = area.x + 1;

            if let ListStyle::Checkbox(_) = self.style {
                let marker = if is_marked { "[x] " } else { "[ ] " };
                let marker_style = if is_cursor {
                    row_style
                } else {
                    row_style.fg(self.theme.purple)
                };
                buf.set_string(x, y, marker, marker_style);
                x += 4;
            }

            // Name, cut before the date column
            let name_width = (area.x + area.width)
                .saturating_sub(x + date_width + 3) as usize;
            buf.set_stringn(x, y, &record.name, name_width, row_style);

            // Date (right-aligned)
            let date_style = if is_cursor {
                row_style
            } else {
                row_style.fg(self.theme.fg_muted)
            };
            buf.set_string(
                area.x + area.width - date_width - 1,
                y,
                record.created_label(),
                date_style,
            );
        }
    }
}
