//! ChatPanel: overlay that asks the chat service about the current listing.
//!
//! Holds the transcript, the composer, the last error and a snapshot of the
//! listing context. The context is refreshed by the controller whenever a
//! listing is installed.

use loam_proto::chat::ChatRequest;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input, InputRequest};
use unicode_width::UnicodeWidthStr;

use crate::action::{Action, ComponentId};
use crate::component::{is_ctrl_c, Component};
use crate::navigation::Navigation;
use crate::theme::{C_ACCENT, C_ASSISTANT, C_ERROR, C_MUTED, C_PRIMARY, C_SPINNER};
use crate::widgets::pane_chrome::{pane_chrome, Badge};
use crate::widgets::spinner::Spinner;

pub const WELCOME: &str =
    "Welcome to LoamIIIF Chat!\nAsk about the listed items. Press 'esc' to close the chat panel.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatLine {
    User(String),
    Assistant(String),
    Error(String),
}

impl ChatLine {
    fn prefix(&self) -> (&'static str, Style) {
        match self {
            Self::User(_) => ("You: ", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)),
            Self::Assistant(_) => (
                "Assistant: ",
                Style::default().fg(C_ASSISTANT).add_modifier(Modifier::BOLD),
            ),
            Self::Error(_) => ("Error: ", Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD)),
        }
    }

    fn text(&self) -> &str {
        match self {
            Self::User(t) | Self::Assistant(t) | Self::Error(t) => t,
        }
    }
}

#[derive(Default)]
pub struct ChatPanel {
    visible: bool,
    composer: Input,
    transcript: Vec<ChatLine>,
    error: Option<String>,
    context: String,
    pending: usize,
    spinner: Spinner,
}

impl ChatPanel {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    #[cfg(test)]
    pub fn transcript(&self) -> &[ChatLine] {
        &self.transcript
    }

    #[cfg(test)]
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn set_context(&mut self, context: String) {
        self.context = context;
    }

    /// Take the composer text as a new question. Empty input is a no-op.
    pub fn submit(&mut self) -> Option<ChatRequest> {
        let text = self.composer.value().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.composer = Input::default();
        self.transcript.push(ChatLine::User(text.clone()));
        self.error = None;
        self.pending += 1;
        Some(ChatRequest::new(self.context.clone(), text))
    }

    /// Record a reply or failure. Works whether or not the panel is visible.
    pub fn on_reply(&mut self, result: Result<String, String>) {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(reply) => {
                let reply = reply.trim();
                if !reply.is_empty() {
                    self.transcript.push(ChatLine::Assistant(reply.to_string()));
                }
            }
            Err(e) => {
                self.transcript.push(ChatLine::Error(e.clone()));
                self.error = Some(e);
            }
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = WELCOME
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(C_MUTED))))
            .collect();
        for entry in &self.transcript {
            lines.push(Line::default());
            let (prefix, style) = entry.prefix();
            let mut text_lines = entry.text().lines();
            let first = text_lines.next().unwrap_or_default().to_string();
            lines.push(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(first, Style::default().fg(C_PRIMARY)),
            ]));
            for rest in text_lines {
                lines.push(Line::from(Span::styled(
                    rest.to_string(),
                    Style::default().fg(C_PRIMARY),
                )));
            }
        }
        lines
    }
}

/// Rows `lines` occupy when wrapped at `width` columns.
fn wrapped_height(lines: &[Line], width: u16) -> usize {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|l| {
            let w: usize = l.spans.iter().map(|s| s.content.width()).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}

impl Component for ChatPanel {
    fn id(&self) -> ComponentId {
        ComponentId::ChatPanel
    }

    fn handle_key(&mut self, key: KeyEvent, _nav: &Navigation) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if is_ctrl_c(&key) {
            return vec![Action::CloseChat];
        }
        match key.code {
            KeyCode::Esc => vec![Action::CloseChat],
            KeyCode::Enter => vec![Action::SubmitChat],
            _ => {
                self.composer.handle_event(&Event::Key(key));
                vec![]
            }
        }
    }

    fn handle_paste(&mut self, text: &str) -> Vec<Action> {
        for c in text.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            if !c.is_control() {
                self.composer.handle(InputRequest::InsertChar(c));
            }
        }
        vec![]
    }

    fn tick(&mut self) {
        if self.pending > 0 {
            self.spinner.tick();
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _nav: &Navigation) {
        let badge_text;
        let badge = if self.pending > 0 {
            badge_text = format!("{} thinking", self.spinner.glyph());
            Some(Badge {
                text: &badge_text,
                color: C_SPINNER,
            })
        } else if self.last_error().is_some() {
            Some(Badge {
                text: "ERR",
                color: C_ERROR,
            })
        } else {
            None
        };
        let block = pane_chrome("Chat Panel", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let lines = self.lines();
        let total = wrapped_height(&lines, rows[0].width);
        let scroll = total.saturating_sub(rows[0].height as usize);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((scroll.min(u16::MAX as usize) as u16, 0)),
            rows[0],
        );

        let prompt = "> ";
        let width = rows[1].width.saturating_sub(prompt.len() as u16 + 1) as usize;
        let scroll = self.composer.visual_scroll(width);
        let visible: String = self.composer.value().chars().skip(scroll).collect();
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(prompt, Style::default().fg(C_ACCENT)),
                Span::styled(visible, Style::default().fg(C_PRIMARY)),
            ])),
            rows[1],
        );
        if focused && rows[1].width > 0 {
            let x = rows[1].x
                + prompt.len() as u16
                + self.composer.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position((x.min(rows[1].x + rows[1].width - 1), rows[1].y));
        }
    }
}
