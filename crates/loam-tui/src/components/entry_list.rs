//! EntryList: the current listing, two rows per entry (title, URL).

use loam_proto::listing::{Entry, EntryKind};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::action::{Action, ComponentId};
use crate::component::{is_chat_toggle, is_ctrl_c, Component};
use crate::navigation::Navigation;
use crate::theme::{
    style_selected, C_ACCENT, C_COLLECTION, C_ERROR, C_MANIFEST, C_MUTED, C_PRIMARY, C_SECONDARY,
};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

/// Screen rows used by one entry.
pub const ROWS_PER_ENTRY: usize = 2;

#[derive(Default)]
pub struct EntryList;

impl EntryList {
    fn render_item(entry: &Entry, selected: bool, width: usize) -> ListItem<'static> {
        let marker = if selected { "▌" } else { " " };
        let kind_color = match entry.kind {
            EntryKind::Collection => C_COLLECTION,
            EntryKind::Manifest => C_MANIFEST,
            EntryKind::Error => C_ERROR,
        };
        let title_style = if selected {
            style_selected()
        } else {
            Style::default().fg(C_PRIMARY)
        };
        let text_width = width.saturating_sub(2);

        let title = Line::from(vec![
            Span::styled(marker, Style::default().fg(C_ACCENT)),
            Span::styled(" ", title_style),
            Span::styled(truncate(&entry.title, text_width), title_style),
        ]);
        let url_text = if entry.url.is_empty() {
            entry.kind.label().to_string()
        } else {
            entry.url.clone()
        };
        let url = Line::from(vec![
            Span::styled(marker, Style::default().fg(C_ACCENT)),
            Span::raw(" "),
            Span::styled(
                truncate(&url_text, text_width),
                Style::default().fg(if selected { kind_color } else { C_SECONDARY }),
            ),
        ]);
        ListItem::new(vec![title, url])
    }
}

/// Cut `text` to `width` columns, ending with "..." when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }
    let budget = width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

impl Component for EntryList {
    fn id(&self) -> ComponentId {
        ComponentId::EntryList
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
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Esc => vec![Action::Back],
            KeyCode::Tab => vec![Action::FocusInput],
            KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectUp(step)],
            KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectDown(step)],
            KeyCode::PageUp => vec![Action::SelectUp(10)],
            KeyCode::PageDown => vec![Action::SelectDown(10)],
            KeyCode::Home | KeyCode::Char('g') => vec![Action::SelectFirst],
            KeyCode::End | KeyCode::Char('G') => vec![Action::SelectLast],
            KeyCode::Enter => vec![Action::Activate],
            KeyCode::Char('o') | KeyCode::Char('O') => vec![Action::OpenInBrowser],
            KeyCode::Char('y') => vec![Action::CopyUrl],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, nav: &Navigation) {
        let depth = nav.depth();
        let depth_text = format!("depth {}", depth);
        let badge = (depth > 0).then(|| Badge {
            text: &depth_text,
            color: C_SECONDARY,
        });
        let block = pane_chrome("Results", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if nav.entries().is_empty() {
            let msg = if nav.is_loading() {
                "  loading…"
            } else {
                "  no results yet, enter a URL above"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let rows = inner.height as usize / ROWS_PER_ENTRY;
        let width = inner.width as usize;
        let items: Vec<ListItem> = nav
            .listing()
            .visible_items(rows)
            .into_iter()
            .map(|(i, entry)| Self::render_item(entry, i == nav.listing().selected, width))
            .collect();
        frame.render_widget(List::new(items), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("A very long manifest title", 10), "A very ...");
        assert_eq!(truncate("abcdef", 3), "...");
        assert_eq!(truncate("日本語のタイトル", 9), "日本語...");
    }

    #[test]
    fn list_keys_map_to_actions() {
        let nav = Navigation::new();
        let mut list = EntryList;
        let k = |c| KeyEvent::new(c, KeyModifiers::NONE);
        assert_eq!(list.handle_key(k(KeyCode::Esc), &nav), vec![Action::Back]);
        assert_eq!(list.handle_key(k(KeyCode::Char('j')), &nav), vec![Action::SelectDown(1)]);
        assert_eq!(list.handle_key(k(KeyCode::Char('G')), &nav), vec![Action::SelectLast]);
        assert_eq!(list.handle_key(k(KeyCode::Char('O')), &nav), vec![Action::OpenInBrowser]);
        assert_eq!(list.handle_key(k(KeyCode::Enter), &nav), vec![Action::Activate]);
        assert!(list.handle_key(k(KeyCode::Char('x')), &nav).is_empty());
    }
}
