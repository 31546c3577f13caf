use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};
use savekeep_core::BackupRecord;

use super::layout::{centered_box, truncate_start};
use super::theme::Theme;

fn dialog<'b>(title: &'b str, theme: &Theme, border: ratatui::style::Color) -> Block<'b> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.bg_surface))
        .padding(Padding::uniform(1))
}

fn render_hints(buf: &mut Buffer, x: u16, y: u16, yes: &str, theme: &Theme) {
    let text_style = Style::default().fg(theme.fg);
    let key_style = Style::default()
        .fg(theme.green)
        .add_modifier(Modifier::BOLD);
    let no_x = x + 4 + yes.chars().count() as u16 + 2;

    buf.set_string(x, y, "[y]", key_style);
    buf.set_string(x + 4, y, yes, text_style);
    buf.set_string(no_x, y, "[n]", key_style);
    buf.set_string(no_x + 4, y, "Cancel", text_style);
}

/// Restore confirmation dialog widget
pub struct ConfirmRestoreView<'a> {
    record: &'a BackupRecord,
    auto_backup: bool,
    theme: &'a Theme,
}

impl<'a> ConfirmRestoreView<'a> {
    pub fn new(record: &'a BackupRecord, auto_backup: bool, theme: &'a Theme) -> Self {
        Self {
            record,
            auto_backup,
            theme,
        }
    }
}

impl Widget for ConfirmRestoreView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_box(56, 10, area);
        Clear.render(dialog_area, buf);

        let block = dialog(" Restore? ", self.theme, self.theme.yellow);
        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let text_style = Style::default().fg(self.theme.fg);
        let name_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let dim_style = Style::default().fg(self.theme.fg_dim);
        let max_w = inner.width as usize;

        buf.set_string(inner.x, inner.y, "Overwrite the current save with:", text_style);
        buf.set_string(
            inner.x,
            inner.y + 1,
            truncate_start(&self.record.name, max_w),
            name_style,
        );
        buf.set_string(
            inner.x,
            inner.y + 2,
            format!("from {}", self.record.created_label()),
            dim_style,
        );

        let note = if self.auto_backup {
            "The current save will be backed up first."
        } else {
            "Auto-backup is OFF: the current save will be lost."
        };
        buf.set_stringn(inner.x, inner.y + 4, note, max_w, dim_style);

        let hints_y = inner.y + inner.height.saturating_sub(1);
        render_hints(buf, inner.x, hints_y, "Yes, restore", self.theme);
    }
}

/// Multi-delete confirmation dialog widget
pub struct ConfirmDeleteView<'a> {
    records: &'a [&'a BackupRecord],
    theme: &'a Theme,
}

impl<'a> ConfirmDeleteView<'a> {
    pub fn new(records: &'a [&'a BackupRecord], theme: &'a Theme) -> Self {
        Self { records, theme }
    }
}

impl Widget for ConfirmDeleteView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.records.len();
        let show_count = count.min(5);
        let has_more = count > 5;

        // header + names + "...and N more" + blank + hints, plus borders and padding
        let content_lines = 1 + show_count + usize::from(has_more) + 1 + 1;
        let dialog_area = centered_box(60, content_lines as u16 + 4, area);
        Clear.render(dialog_area, buf);

        let block = dialog(" Delete? ", self.theme, self.theme.red);
        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let text_style = Style::default().fg(self.theme.fg);
        let name_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let dim_style = Style::default().fg(self.theme.fg_dim);

        let mut row = inner.y;
        let max_w = (inner.width as usize).saturating_sub(2);

        let header = format!(
            "Delete {} backup{}:",
            count,
            if count == 1 { "" } else { "s" }
        );
        buf.set_string(inner.x, row, &header, text_style);
        row += 1;

        for record in self.records.iter().take(5) {
            let date = format!("  ({})", record.created_label());
            let avail = max_w.saturating_sub(date.len() + 1);
            let name = truncate_start(&record.name, avail);
            let name_len = name.chars().count() as u16;
            buf.set_string(inner.x + 1, row, &name, name_style);
            buf.set_string(inner.x + 1 + name_len, row, &date, dim_style);
            row += 1;
        }

        if has_more {
            buf.set_string(inner.x, row, format!("  ...and {} more", count - 5), dim_style);
            row += 1;
        }

        let hints_y = (row + 1).max(inner.y + inner.height.saturating_sub(1));
        render_hints(buf, inner.x, hints_y, "Yes, delete", self.theme);
    }
}
