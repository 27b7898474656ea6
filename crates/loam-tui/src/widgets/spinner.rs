//! Braille spinner shown while a fetch or chat reply is outstanding.

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

#[derive(Debug, Default, Clone)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    /// Advance one frame. Call each tick.
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    pub fn glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_all_frames() {
        let mut s = Spinner::default();
        let first = s.glyph();
        for _ in 0..SPINNER_FRAMES.len() {
            s.tick();
        }
        assert_eq!(s.glyph(), first);
        s.tick();
        assert_ne!(s.glyph(), first);
        s.reset();
        assert_eq!(s.glyph(), first);
    }
}
