use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use super::layout::centered_box;
use super::theme::Theme;

/// Numbered menu in a centered box
pub struct MenuView<'a> {
    title: &'a str,
    items: Vec<String>,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> MenuView<'a> {
    pub fn new(title: &'a str, items: Vec<String>, selected: usize, theme: &'a Theme) -> Self {
        Self {
            title,
            items,
            selected,
            theme,
        }
    }
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let widest = self
            .items
            .iter()
            .map(|item| item.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let menu_area = centered_box(widest + 12, self.items.len() as u16 + 4, area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.blue))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::horizontal(1));

        let inner = block.inner(menu_area);
        block.render(menu_area, buf);

        let key_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);

        for (i, item) in self.items.iter().enumerate().take(inner.height as usize) {
            let y = inner.y + i as u16;
            let is_cursor = i == self.selected;

            let row_style = if is_cursor {
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
            } else {
                Style::default().bg(self.theme.bg_surface).fg(self.theme.fg)
            };
            buf.set_string(inner.x, y, " ".repeat(inner.width as usize), row_style);

            let number = format!("{}.", i + 1);
            buf.set_string(
                inner.x + 1,
                y,
                &number,
                if is_cursor { row_style } else { key_style },
            );
            buf.set_stringn(
                inner.x + 4,
                y,
                item,
                inner.width.saturating_sub(5) as usize,
                row_style,
            );
        }
    }
}
