//! DetailPane: "Record Detail" for the selected manifest. While visible it
//! swallows every key except Esc and Ctrl-C.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::action::{Action, ComponentId};
use crate::component::{is_ctrl_c, Component};
use crate::navigation::Navigation;
use crate::theme::{style_help, C_PRIMARY, C_SECONDARY};
use crate::widgets::pane_chrome::pane_chrome;

/// Only these keys reach the controller while the pane is open.
const DETAIL_HINT: &str = "esc: close · ctrl+c: quit";

#[derive(Default)]
pub struct DetailPane;

impl Component for DetailPane {
    fn id(&self) -> ComponentId {
        ComponentId::DetailPane
    }

    fn handle_key(&mut self, key: KeyEvent, _nav: &Navigation) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if is_ctrl_c(&key) {
            return vec![Action::Quit];
        }
        match key.code {
            KeyCode::Esc => vec![Action::CloseDetail],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, nav: &Navigation) {
        let block = pane_chrome("Record Detail", focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(entry) = nav.selected_entry() else {
            return;
        };
        let label = Style::default().fg(C_SECONDARY);
        let value = Style::default().fg(C_PRIMARY);
        let lines = vec![
            Line::from(vec![
                Span::styled("Title: ", label),
                Span::styled(entry.title.clone(), value),
            ]),
            Line::from(vec![
                Span::styled("URL:   ", label),
                Span::styled(entry.url.clone(), value),
            ]),
            Line::from(vec![
                Span::styled("Kind:  ", label),
                Span::styled(entry.kind.label(), value),
            ]),
            Line::default(),
            Line::from(Span::styled(
                DETAIL_HINT,
                style_help(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Effect;
    use loam_proto::listing::{Entry, EntryKind};
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::Terminal;

    #[test]
    fn only_esc_and_ctrl_c_do_anything() {
        let nav = Navigation::new();
        let mut pane = DetailPane;
        let k = |c, m| KeyEvent::new(c, m);
        assert_eq!(
            pane.handle_key(k(KeyCode::Esc, KeyModifiers::NONE), &nav),
            vec![Action::CloseDetail]
        );
        assert_eq!(
            pane.handle_key(k(KeyCode::Char('c'), KeyModifiers::CONTROL), &nav),
            vec![Action::Quit]
        );
        for code in [KeyCode::Char('o'), KeyCode::Char('c'), KeyCode::Enter, KeyCode::Tab] {
            assert!(pane.handle_key(k(code, KeyModifiers::NONE), &nav).is_empty());
        }
    }

    #[test]
    fn hint_lists_only_working_keys() {
        let mut nav = Navigation::new();
        let Some(Effect::Fetch { request_id, .. }) = nav.submit_url("https://x.org/root") else {
            panic!("expected a fetch");
        };
        assert!(nav.complete_fetch(
            request_id,
            Ok(vec![Entry::new("https://x.org/M", "M", EntryKind::Manifest)])
        ));

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                DetailPane.draw(f, area, true, &nav);
            })
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Record Detail"));
        assert!(screen.contains("https://x.org/M"));
        assert!(screen.contains("esc: close"));
        assert!(screen.contains("ctrl+c: quit"));
        assert!(!screen.contains("open in browser"));
        assert!(!screen.contains("copy URL"));
    }
}
