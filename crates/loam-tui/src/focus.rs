//! Focus: which of the two focusable panes receives plain keystrokes.

use crate::action::ComponentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    List,
}

impl Focus {
    pub fn component(self) -> ComponentId {
        match self {
            Self::Input => ComponentId::UrlBar,
            Self::List => ComponentId::EntryList,
        }
    }

    pub fn is_focused(self, id: ComponentId) -> bool {
        self.component() == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panes_map_to_components() {
        assert_eq!(Focus::default(), Focus::Input);
        assert!(Focus::Input.is_focused(ComponentId::UrlBar));
        assert!(Focus::List.is_focused(ComponentId::EntryList));
        assert!(!Focus::List.is_focused(ComponentId::UrlBar));
    }
}
