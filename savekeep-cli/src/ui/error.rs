use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use super::layout::centered_box;
use super::theme::Theme;

/// Fatal error screen
pub struct ErrorView<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> ErrorView<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { message, theme }
    }
}

impl Widget for ErrorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_box(70, 12, area);
        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(" Error ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.red))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let text = vec![
            Line::from(Span::styled(
                "A critical error occurred:",
                Style::default()
                    .fg(self.theme.red)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                self.message,
                Style::default().fg(self.theme.fg),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Press Ctrl+C to exit.",
                Style::default().fg(self.theme.fg_dim),
            )),
        ];

        Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(dialog_area, buf);
    }
}
