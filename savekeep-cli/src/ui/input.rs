use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::TextInput;

use super::layout::centered_box;
use super::theme::Theme;

/// Text prompt with placeholder, cursor, and inline error
pub struct InputView<'a> {
    title: &'a str,
    prompt: &'a str,
    input: &'a TextInput,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> InputView<'a> {
    pub fn new(title: &'a str, prompt: &'a str, input: &'a TextInput, theme: &'a Theme) -> Self {
        Self {
            title,
            prompt,
            input,
            error: None,
            theme,
        }
    }

    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Widget for InputView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_box(64, 9, area);
        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.blue))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);
        if inner.height < 2 || inner.width < 4 {
            return;
        }

        let max_w = inner.width as usize;
        buf.set_stringn(
            inner.x,
            inner.y,
            self.prompt,
            max_w,
            Style::default().fg(self.theme.fg),
        );

        // Field
        let field_y = inner.y + 1;
        let field_style = Style::default().bg(self.theme.bg_highlight).fg(self.theme.fg);
        buf.set_string(inner.x, field_y, " ".repeat(max_w), field_style);

        let value = self.input.value();
        let cursor = self.input.cursor();
        // Scroll so the cursor stays inside the field
        let skip = (cursor + 2).saturating_sub(max_w);
        if value.is_empty() {
            buf.set_stringn(
                inner.x + 1,
                field_y,
                self.input.placeholder(),
                max_w - 1,
                field_style.fg(self.theme.fg_muted),
            );
        } else {
            let visible: String = value.chars().skip(skip).collect();
            buf.set_stringn(inner.x, field_y, &visible, max_w, field_style);
        }

        let cursor_x = inner.x + (cursor - skip) as u16;
        if cursor_x < inner.x + inner.width {
            buf[(cursor_x, field_y)].set_style(Style::default().add_modifier(Modifier::REVERSED));
        }

        if let Some(error) = self.error
            && inner.height > 3
        {
            buf.set_stringn(
                inner.x,
                inner.y + 3,
                error,
                max_w,
                Style::default().fg(self.theme.red),
            );
        }
    }
}
