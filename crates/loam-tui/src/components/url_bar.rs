//! UrlBar: single-line editor for the collection/manifest URL.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input, InputRequest};

use crate::action::{Action, ComponentId};
use crate::component::{is_chat_toggle, is_ctrl_c, Component};
use crate::navigation::Navigation;
use crate::theme::{C_MUTED, C_PRIMARY};
use crate::widgets::pane_chrome::pane_chrome;

const PLACEHOLDER: &str = "Enter a IIIF collection or manifest URL...";

#[derive(Default)]
pub struct UrlBar {
    input: Input,
}

impl UrlBar {
    pub fn new(initial: Option<&str>) -> Self {
        Self {
            input: Input::new(initial.unwrap_or_default().to_string()),
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.input.handle(InputRequest::InsertChar(c));
        }
    }
}

impl Component for UrlBar {
    fn id(&self) -> ComponentId {
        ComponentId::UrlBar
    }

    fn handle_key(&mut self, key: KeyEvent, _nav: &Navigation) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if is_ctrl_c(&key) {
            return vec![Action::Quit];
        }
        if is_chat_toggle(&key) {
            return vec![Action::ToggleChat];
        }
        match key.code {
            KeyCode::Tab => vec![Action::FocusList],
            KeyCode::Enter => vec![Action::Load(self.input.value().to_string())],
            _ => {
                self.input.handle_event(&Event::Key(key));
                vec![]
            }
        }
    }

    fn handle_paste(&mut self, text: &str) -> Vec<Action> {
        self.insert_str(text.trim());
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _nav: &Navigation) {
        let block = pane_chrome("IIIF URL", focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let scroll = self.input.visual_scroll(inner.width.saturating_sub(1) as usize);
        let value = self.input.value();
        let line = if value.is_empty() {
            Line::from(Span::styled(PLACEHOLDER, Style::default().fg(C_MUTED)))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Line::from(Span::styled(visible, Style::default().fg(C_PRIMARY)))
        };
        frame.render_widget(Paragraph::new(line), inner);

        if focused {
            let cursor_x = inner.x + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(inner.x + inner.width - 1), inner.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_then_enter_requests_load() {
        let nav = Navigation::new();
        let mut bar = UrlBar::default();
        for c in "https://x.org".chars() {
            assert!(bar.handle_key(key(KeyCode::Char(c)), &nav).is_empty());
        }
        assert_eq!(
            bar.handle_key(key(KeyCode::Enter), &nav),
            vec![Action::Load("https://x.org".into())]
        );
    }

    #[test]
    fn c_toggles_chat_instead_of_typing() {
        let nav = Navigation::new();
        let mut bar = UrlBar::new(Some("https://x.org/"));
        assert_eq!(bar.handle_key(key(KeyCode::Char('c')), &nav), vec![Action::ToggleChat]);
        assert_eq!(bar.value(), "https://x.org/");
    }

    #[test]
    fn paste_inserts_text_including_c() {
        let mut bar = UrlBar::default();
        bar.handle_paste(" https://x.org/iiif/collection/top\n");
        assert_eq!(bar.value(), "https://x.org/iiif/collection/top");
    }
}
