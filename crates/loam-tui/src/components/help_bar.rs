//! One-row footer listing the key bindings for the current mode.

use ratatui::{layout::Rect, text::Span, widgets::Paragraph, Frame};

use crate::theme::style_help;

pub const HELP_MAIN: &str =
    "Tab: Switch Focus | Enter: Open Detail | O: Open URL in browser | Esc: Close Detail/Back | c: Toggle Chat";
pub const HELP_CHAT: &str = "Enter: Send | Esc: Close Chat";

pub fn help_text(chat_visible: bool) -> &'static str {
    if chat_visible {
        HELP_CHAT
    } else {
        HELP_MAIN
    }
}

pub fn draw_help_bar(frame: &mut Frame, area: Rect, chat_visible: bool) {
    frame.render_widget(
        Paragraph::new(Span::styled(help_text(chat_visible), style_help())),
        area,
    );
}
