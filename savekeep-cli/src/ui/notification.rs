use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::Notification;

use super::theme::Theme;

/// One-line transient success message
pub struct NotificationLine<'a> {
    notification: Option<&'a Notification>,
    theme: &'a Theme,
}

impl<'a> NotificationLine<'a> {
    pub fn new(notification: Option<&'a Notification>, theme: &'a Theme) -> Self {
        Self {
            notification,
            theme,
        }
    }
}

impl Widget for NotificationLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(notification) = self.notification else {
            return;
        };
        if area.width < 4 {
            return;
        }

        let style = Style::default()
            .fg(self.theme.green)
            .add_modifier(Modifier::BOLD);
        let text = format!("✓ {}", notification.message);
        buf.set_stringn(area.x + 1, area.y, &text, area.width as usize - 2, style);
    }
}
