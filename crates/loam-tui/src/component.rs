//! Component trait: the interface every UI pane implements.
//!
//! - Components own their local widget state (editors, spinners) and render
//!   themselves.
//! - Components receive the [`Navigation`] model read-only for data they
//!   don't own.
//! - Components produce `Vec<Action>`; the controller applies them.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::navigation::Navigation;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event. Only called when this component receives input.
    fn handle_key(&mut self, key: KeyEvent, nav: &Navigation) -> Vec<Action>;

    /// Handle a bracketed paste.
    fn handle_paste(&mut self, _text: &str) -> Vec<Action> {
        Vec::new()
    }

    /// Called each tick (~100ms).
    fn tick(&mut self) {}

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, nav: &Navigation);
}

pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Plain `c`/`C` (no Ctrl/Alt), the chat toggle.
pub fn is_chat_toggle(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_and_toggle_are_disjoint() {
        let ctrl = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        let shifted = KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT);
        assert!(is_ctrl_c(&ctrl));
        assert!(!is_chat_toggle(&ctrl));
        assert!(is_chat_toggle(&plain));
        assert!(is_chat_toggle(&shifted));
        assert!(!is_ctrl_c(&plain));
    }
}
