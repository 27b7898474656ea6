//! StatusBox: the bordered status line, with a spinner while a fetch runs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::navigation::Navigation;
use crate::theme::{style_default, C_ERROR, C_SPINNER};
use crate::widgets::pane_chrome::pane_chrome;
use crate::widgets::spinner::Spinner;

#[derive(Default)]
pub struct StatusBox {
    spinner: Spinner,
}

impl StatusBox {
    pub fn tick(&mut self, loading: bool) {
        if loading {
            self.spinner.tick();
        } else {
            self.spinner.reset();
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, nav: &Navigation) {
        let block = pane_chrome("Status", false, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let status = nav.status();
        let text_style = if status.starts_with("Error:") {
            Style::default().fg(C_ERROR)
        } else {
            style_default()
        };
        let mut spans = Vec::new();
        if nav.is_loading() {
            spans.push(Span::styled(self.spinner.glyph(), Style::default().fg(C_SPINNER)));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(status.to_string(), text_style));
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }
}
