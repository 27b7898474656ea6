//! Controller: the single reducer behind the event loop.
//!
//! Keys, pastes, resizes and async completions come in; the navigation model
//! and components are updated; side effects go out as [`Effect`]s for the
//! app's dispatcher to run. Nothing here touches the terminal or network.

use loam_proto::listing::{chat_context, listing_or_error};
use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use crate::action::{Action, Effect};
use crate::component::Component;
use crate::components::chat_panel::ChatPanel;
use crate::components::detail_pane::DetailPane;
use crate::components::entry_list::{EntryList, ROWS_PER_ENTRY};
use crate::components::help_bar::draw_help_bar;
use crate::components::status_box::StatusBox;
use crate::components::url_bar::UrlBar;
use crate::focus::Focus;
use crate::layout::{too_small, Panes, MIN_HEIGHT, MIN_WIDTH, TOO_SMALL_MESSAGE};
use crate::navigation::Navigation;
use crate::theme::{style_title, style_title_focused, C_MUTED};

pub struct Controller {
    nav: Navigation,
    url_bar: UrlBar,
    entry_list: EntryList,
    detail: DetailPane,
    chat: ChatPanel,
    status_box: StatusBox,
    viewport: Rect,
}

impl Controller {
    pub fn new(start_url: Option<&str>) -> Self {
        Self {
            nav: Navigation::new(),
            url_bar: UrlBar::new(start_url),
            entry_list: EntryList,
            detail: DetailPane,
            chat: ChatPanel::default(),
            status_box: StatusBox::default(),
            viewport: Rect::new(0, 0, MIN_WIDTH, MIN_HEIGHT),
        }
    }

    #[cfg(test)]
    pub fn nav(&self) -> &Navigation {
        &self.nav
    }

    #[cfg(test)]
    pub fn chat(&self) -> &ChatPanel {
        &self.chat
    }

    #[cfg(test)]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Effects to run at start-up: load the preloaded URL, if any.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.url_bar.value().trim().is_empty() {
            return Vec::new();
        }
        let url = self.url_bar.value().to_string();
        self.apply(Action::Load(url))
    }

    // ── Inputs ───────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let actions = if self.chat.is_visible() {
            self.chat.handle_key(key, &self.nav)
        } else if self.nav.detail_visible() {
            self.detail.handle_key(key, &self.nav)
        } else {
            match self.nav.focus() {
                Focus::Input => self.url_bar.handle_key(key, &self.nav),
                Focus::List => self.entry_list.handle_key(key, &self.nav),
            }
        };
        self.apply_all(actions)
    }

    pub fn handle_paste(&mut self, text: &str) -> Vec<Effect> {
        let actions = if self.chat.is_visible() {
            self.chat.handle_paste(text)
        } else if self.nav.detail_visible() {
            Vec::new()
        } else {
            match self.nav.focus() {
                Focus::Input => self.url_bar.handle_paste(text),
                Focus::List => self.entry_list.handle_paste(text),
            }
        };
        self.apply_all(actions)
    }

    /// Accept a new terminal size, or keep the previous layout if it is too small.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        if too_small(width, height) {
            debug!("terminal too small: {}x{}", width, height);
            self.nav.set_status(TOO_SMALL_MESSAGE);
            return;
        }
        self.viewport = Rect::new(0, 0, width, height);
    }

    pub fn on_fetched(&mut self, request_id: u64, result: Result<Vec<u8>, String>) {
        let installed = result.is_ok();
        let result = result.map(|bytes| listing_or_error(&bytes));
        if self.nav.complete_fetch(request_id, result) && installed {
            self.refresh_chat_context();
        }
    }

    pub fn on_chat_reply(&mut self, result: Result<String, String>) {
        self.chat.on_reply(result);
    }

    pub fn on_opened(&mut self, result: Result<(), String>) {
        self.nav.on_opened(result);
    }

    pub fn on_copied(&mut self, result: Result<(), String>) {
        self.nav.on_copied(result);
    }

    pub fn tick(&mut self) {
        self.status_box.tick(self.nav.is_loading());
        self.chat.tick();
    }

    /// Whether something is animating and the screen should be redrawn on ticks.
    pub fn is_animating(&self) -> bool {
        self.nav.is_loading() || self.chat.pending() > 0
    }

    // ── Reducer ──────────────────────────────────────────────────────────────

    fn apply_all(&mut self, actions: Vec<Action>) -> Vec<Effect> {
        actions.into_iter().flat_map(|a| self.apply(a)).collect()
    }

    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        let effect = match action {
            Action::Load(text) => self.nav.submit_url(&text),
            Action::Activate => self.nav.activate(),
            Action::Back => {
                if self.nav.back() {
                    self.refresh_chat_context();
                }
                None
            }
            Action::SelectUp(n) => {
                self.nav.select_up(n);
                None
            }
            Action::SelectDown(n) => {
                self.nav.select_down(n);
                None
            }
            Action::SelectFirst => {
                self.nav.select_first();
                None
            }
            Action::SelectLast => {
                self.nav.select_last();
                None
            }
            Action::FocusList => {
                self.nav.focus_list();
                None
            }
            Action::FocusInput => {
                self.nav.focus_input();
                None
            }
            Action::CloseDetail => {
                self.nav.close_detail();
                None
            }
            Action::OpenInBrowser => self.nav.open_in_browser(),
            Action::CopyUrl => self.nav.copy_url(),
            Action::ToggleChat => {
                let status = if self.chat.toggle() {
                    "Opened chat panel."
                } else {
                    "Closed chat panel."
                };
                self.nav.set_status(status);
                None
            }
            Action::CloseChat => {
                self.chat.close();
                self.nav.set_status("Closed chat panel.");
                None
            }
            Action::SubmitChat => self.chat.submit().map(Effect::Chat),
            Action::Quit => Some(Effect::Quit),
        };
        effect.into_iter().collect()
    }

    fn refresh_chat_context(&mut self) {
        self.chat.set_context(chat_context(self.nav.entries()));
    }

    // ── Drawing ──────────────────────────────────────────────────────────────

    pub fn draw(&mut self, frame: &mut Frame) {
        let panes = Panes::compute(self.viewport, self.chat.is_visible()).clipped(frame.area());
        let chat_visible = self.chat.is_visible();
        let detail_visible = self.nav.detail_visible();
        let input_focused = !chat_visible && self.nav.focus().is_focused(self.url_bar.id());
        let list_focused = !chat_visible && self.nav.focus().is_focused(self.entry_list.id());

        let title_style = if input_focused {
            style_title_focused()
        } else {
            style_title()
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("LoamIIIF", title_style),
                Span::styled("  IIIF collection browser", Style::default().fg(C_MUTED)),
            ])),
            panes.title,
        );

        self.url_bar.draw(frame, panes.input, input_focused, &self.nav);
        self.status_box.draw(frame, panes.status, &self.nav);

        if detail_visible {
            self.detail.draw(frame, panes.main, list_focused, &self.nav);
        } else {
            self.nav.ensure_visible(panes.main_rows() / ROWS_PER_ENTRY);
            self.entry_list.draw(frame, panes.main, list_focused, &self.nav);
        }

        if let Some(chat_area) = panes.chat {
            self.chat.draw(frame, chat_area, true, &self.nav);
        }
        draw_help_bar(frame, panes.help, chat_visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_proto::chat::ChatRequest;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;

    const ROOT: &str = r#"{
      "id": "https://x.org/root", "type": "Collection",
      "items": [
        {"id": "https://x.org/A", "type": "Collection", "label": {"en": ["A"]}},
        {"id": "https://x.org/B", "type": "Collection", "label": {"en": ["B"]}},
        {"id": "https://x.org/M", "type": "Manifest", "label": {"en": ["M"]}}
      ]
    }"#;

    const CHILD: &str = r#"{
      "@id": "https://x.org/B", "@type": "sc:Collection",
      "manifests": [{"@id": "https://x.org/B1", "label": "B1"}]
    }"#;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_c() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    fn fetch(effects: &[Effect]) -> (u64, String) {
        match effects {
            [Effect::Fetch { request_id, url }] => (*request_id, url.clone()),
            other => panic!("expected one fetch, got {:?}", other),
        }
    }

    /// Controller with ROOT loaded and the list focused.
    fn browsing() -> Controller {
        let mut c = Controller::new(Some("https://x.org/root"));
        let (id, url) = fetch(&c.start());
        assert_eq!(url, "https://x.org/root");
        c.on_fetched(id, Ok(ROOT.as_bytes().to_vec()));
        assert!(c.handle_key(key(KeyCode::Tab)).is_empty());
        c
    }

    #[test]
    fn enter_in_input_validates_then_loads() {
        let mut c = Controller::new(None);
        assert!(c.handle_key(key(KeyCode::Enter)).is_empty());
        assert_eq!(c.nav().status(), "Please enter a URL");
        c.handle_paste("https://x.org/root");
        let (id, _) = fetch(&c.handle_key(key(KeyCode::Enter)));
        assert_eq!(c.nav().status(), "Fetching data...");
        c.on_fetched(id, Ok(ROOT.as_bytes().to_vec()));
        assert_eq!(c.nav().status(), "Fetched 3 items");
        assert!(c.chat().context().starts_with("Title: A\nURL: https://x.org/A\n\n"));
    }

    #[test]
    fn tab_focuses_list_and_preselects_first() {
        let c = browsing();
        assert_eq!(c.nav().focus(), Focus::List);
        assert_eq!(c.nav().selected_index(), Some(0));
        assert_eq!(c.nav().status(), "Ready");
    }

    #[test]
    fn descend_then_back_restores_selection_and_context() {
        let mut c = browsing();
        c.handle_key(key(KeyCode::Down));
        let (id, url) = fetch(&c.handle_key(key(KeyCode::Enter)));
        assert_eq!(url, "https://x.org/B");
        c.on_fetched(id, Ok(CHILD.as_bytes().to_vec()));
        assert_eq!(c.nav().depth(), 1);
        assert_eq!(c.chat().context(), "Title: B1\nURL: https://x.org/B1\n\n");

        c.handle_key(key(KeyCode::Esc));
        assert_eq!(c.nav().depth(), 0);
        assert_eq!(c.nav().status(), "Went back to previous list.");
        assert_eq!(c.nav().selected_entry().map(|e| e.title.as_str()), Some("B"));
        assert!(c.chat().context().contains("Title: M\n"));
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut c = browsing();
        let (id, _) = fetch(&c.handle_key(key(KeyCode::Enter)));
        c.on_fetched(id + 1, Ok(CHILD.as_bytes().to_vec()));
        assert!(c.nav().is_loading());
        c.on_fetched(id, Err("failed to fetch data: 500 Internal Server Error".into()));
        assert!(!c.nav().is_loading());
        assert_eq!(c.nav().depth(), 0);
        assert_eq!(
            c.nav().status(),
            "Error: failed to fetch data: 500 Internal Server Error"
        );
    }

    #[test]
    fn malformed_body_becomes_error_entry() {
        let mut c = Controller::new(Some("https://x.org/bad"));
        let (id, _) = fetch(&c.start());
        c.on_fetched(id, Ok(b"{".to_vec()));
        assert_eq!(c.nav().entries().len(), 1);
        assert!(c.nav().entries()[0].title.starts_with("Failed to parse IIIF data:"));
        assert_eq!(c.nav().status(), "Fetched 1 items");
    }

    #[test]
    fn detail_swallows_keys_until_esc() {
        let mut c = browsing();
        c.handle_key(key(KeyCode::End));
        c.handle_key(key(KeyCode::Enter));
        assert!(c.nav().detail_visible());
        assert_eq!(c.nav().status(), "Viewing detail: M");
        assert!(c.handle_key(key(KeyCode::Char('o'))).is_empty());
        c.handle_key(key(KeyCode::Up));
        assert_eq!(c.nav().selected_index(), Some(2));
        c.handle_key(key(KeyCode::Esc));
        assert!(!c.nav().detail_visible());
        assert_eq!(c.nav().status(), "Closed detail pane.");
        assert_eq!(c.handle_key(ctrl_c()), vec![Effect::Quit]);
    }

    #[test]
    fn chat_overlay_takes_priority() {
        let mut c = browsing();
        c.handle_key(key(KeyCode::Char('c')));
        assert!(c.chat().is_visible());
        assert_eq!(c.nav().status(), "Opened chat panel.");

        // Keys go to the composer, not the list.
        for ch in "which?".chars() {
            c.handle_key(key(KeyCode::Char(ch)));
        }
        assert_eq!(c.nav().selected_index(), Some(0));
        let effects = c.handle_key(key(KeyCode::Enter));
        let context = chat_context(c.nav().entries());
        assert_eq!(effects, vec![Effect::Chat(ChatRequest::new(context, "which?"))]);

        // Ctrl-C closes the overlay instead of quitting.
        assert!(c.handle_key(ctrl_c()).is_empty());
        assert!(!c.chat().is_visible());
        assert_eq!(c.nav().status(), "Closed chat panel.");

        // A reply arriving after close is still recorded.
        c.on_chat_reply(Ok("M is a manifest.".into()));
        assert_eq!(c.chat().transcript().len(), 2);
    }

    #[test]
    fn ctrl_c_quits_from_input_and_list() {
        let mut c = Controller::new(None);
        assert_eq!(c.handle_key(ctrl_c()), vec![Effect::Quit]);
        let mut c = browsing();
        assert_eq!(c.handle_key(ctrl_c()), vec![Effect::Quit]);
    }

    #[test]
    fn open_in_browser_and_status_reset() {
        let mut c = browsing();
        let effects = c.handle_key(key(KeyCode::Char('O')));
        assert_eq!(effects, vec![Effect::OpenUrl("https://x.org/A".into())]);
        c.on_opened(Ok(()));
        assert_eq!(c.nav().status(), "Opened in browser");
        c.handle_key(key(KeyCode::Char('j')));
        assert_eq!(c.nav().status(), "Ready");
    }

    #[test]
    fn small_terminal_keeps_previous_layout() {
        let mut c = Controller::new(None);
        c.handle_resize(120, 40);
        assert_eq!(c.viewport(), Rect::new(0, 0, 120, 40));
        c.handle_resize(60, 40);
        assert_eq!(c.viewport(), Rect::new(0, 0, 120, 40));
        assert_eq!(c.nav().status(), TOO_SMALL_MESSAGE);
    }

    #[test]
    fn renders_listing_into_a_buffer() {
        let mut c = browsing();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| c.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("LoamIIIF"));
        assert!(screen.contains("Results"));
        assert!(screen.contains("https://x.org/M"));
        assert!(screen.contains("Tab: Switch Focus"));
    }
}
