//! Screen geometry: which rectangle each pane gets for a terminal size.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 24;

pub const TOO_SMALL_MESSAGE: &str = "Window too small. Minimum size is 80x24";

pub fn too_small(width: u16, height: u16) -> bool {
    width < MIN_WIDTH || height < MIN_HEIGHT
}

/// Rectangles for every pane. `main` holds either the entry list or the
/// detail pane; `chat` is `None` when the overlay is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub title: Rect,
    pub input: Rect,
    pub status: Rect,
    pub main: Rect,
    pub chat: Option<Rect>,
    pub help: Rect,
}

impl Panes {
    pub fn compute(area: Rect, chat_visible: bool) -> Self {
        let chat_h = if chat_visible { area.height / 3 } else { 0 };

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(chat_h),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            title: outer[0],
            input: outer[1],
            status: outer[2],
            main: outer[3],
            chat: chat_visible.then_some(outer[4]),
            help: outer[5],
        }
    }

    /// Rows available inside the main pane's border.
    pub fn main_rows(&self) -> usize {
        self.main.height.saturating_sub(2) as usize
    }

    /// Clip every pane to `area`. Used while the terminal is smaller than the
    /// last accepted viewport.
    pub fn clipped(self, area: Rect) -> Self {
        Self {
            title: self.title.intersection(area),
            input: self.input.intersection(area),
            status: self.status.intersection(area),
            main: self.main.intersection(area),
            chat: self.chat.map(|r| r.intersection(area)),
            help: self.help.intersection(area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_size_check() {
        assert!(too_small(79, 24));
        assert!(too_small(80, 23));
        assert!(!too_small(80, 24));
        assert!(!too_small(200, 60));
    }

    #[test]
    fn plain_layout_fills_the_screen() {
        let p = Panes::compute(Rect::new(0, 0, 80, 24), false);
        assert_eq!(p.title.height, 1);
        assert_eq!(p.input, Rect::new(0, 1, 80, 3));
        assert_eq!(p.status, Rect::new(0, 4, 80, 3));
        assert_eq!(p.main, Rect::new(0, 7, 80, 16));
        assert_eq!(p.help, Rect::new(0, 23, 80, 1));
        assert!(p.chat.is_none());
        assert_eq!(p.main_rows(), 14);
    }

    #[test]
    fn clipping_keeps_panes_inside_a_shrunk_terminal() {
        let p = Panes::compute(Rect::new(0, 0, 100, 30), false).clipped(Rect::new(0, 0, 60, 20));
        assert_eq!(p.main.width, 60);
        assert_eq!(p.main.y + p.main.height, 20);
        assert_eq!(p.help.height, 0);
    }

    #[test]
    fn chat_takes_a_third_of_the_height() {
        let p = Panes::compute(Rect::new(0, 0, 90, 30), true);
        let chat = p.chat.unwrap();
        assert_eq!(chat.height, 10);
        assert_eq!(chat.y + chat.height, p.help.y);
        assert_eq!(p.main.height, 30 - 1 - 3 - 3 - 10 - 1);
    }
}
