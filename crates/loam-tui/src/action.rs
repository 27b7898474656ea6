//! Action and Effect enums: what components ask for, and what the
//! controller asks the outside world to do.

use loam_proto::chat::ChatRequest;

/// Unique identifier for a drawable pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    UrlBar,
    EntryList,
    DetailPane,
    ChatPanel,
}

/// All actions that can flow through the controller.
/// Components produce Actions; the controller applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Loading ──────────────────────────────────────────────────────────────
    /// Validate the text and fetch it.
    Load(String),
    /// Enter the selected entry: descend into a collection or show a manifest.
    Activate,
    Back,

    // ── Navigation ───────────────────────────────────────────────────────────
    SelectUp(usize),
    SelectDown(usize),
    SelectFirst,
    SelectLast,
    FocusList,
    FocusInput,

    // ── Detail ───────────────────────────────────────────────────────────────
    CloseDetail,
    OpenInBrowser,
    CopyUrl,

    // ── Chat ─────────────────────────────────────────────────────────────────
    ToggleChat,
    CloseChat,
    SubmitChat,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}

/// Side effects returned by the controller. The app's dispatcher performs
/// them and feeds results back as messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch { request_id: u64, url: String },
    Chat(ChatRequest),
    OpenUrl(String),
    CopyToClipboard(String),
    Quit,
}
