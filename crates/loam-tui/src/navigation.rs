//! Navigation model: the current listing, the back stack, selection, focus,
//! the detail flag, the in-flight fetch and the status line.
//!
//! Every mutation goes through a method here so the invariants hold at all
//! times:
//! - stack depth == number of completed-or-pending descents not yet undone
//! - detail visible implies list focus and a selected entry
//! - at most one fetch in flight; only its completion clears `loading`

use loam_proto::fetch::parse_resource_url;
use loam_proto::listing::{Entry, EntryKind};
use tracing::{debug, warn};

use crate::action::Effect;
use crate::focus::Focus;
use crate::widgets::scrollable_list::ScrollableList;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_OPENED: &str = "Opened in browser";
pub const STATUS_BUSY: &str = "Still fetching, please wait...";

/// A listing saved on the back stack together with the row that was selected.
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    entries: Vec<Entry>,
    selected: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct InFlight {
    request_id: u64,
    url: String,
    descent: bool,
}

pub struct Navigation {
    listing: ScrollableList<Entry>,
    back_stack: Vec<Snapshot>,
    detail_visible: bool,
    focus: Focus,
    status: String,
    in_flight: Option<InFlight>,
    next_request_id: u64,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self {
            listing: ScrollableList::new(),
            back_stack: Vec::new(),
            detail_visible: false,
            focus: Focus::Input,
            status: STATUS_READY.to_string(),
            in_flight: None,
            next_request_id: 1,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn entries(&self) -> &[Entry] {
        &self.listing.items
    }

    pub fn listing(&self) -> &ScrollableList<Entry> {
        &self.listing
    }

    #[cfg(test)]
    pub fn selected_index(&self) -> Option<usize> {
        (!self.listing.is_empty()).then_some(self.listing.selected)
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.listing.selected_item()
    }

    pub fn depth(&self) -> usize {
        self.back_stack.len()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn detail_visible(&self) -> bool {
        self.detail_visible
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Keep the selected row inside a window of `rows` entries.
    pub fn ensure_visible(&mut self, rows: usize) {
        self.listing.ensure_visible(rows);
    }

    // ── Loading ──────────────────────────────────────────────────────────────

    /// Validate user input and start a fetch for it.
    pub fn submit_url(&mut self, input: &str) -> Option<Effect> {
        match parse_resource_url(input) {
            Ok(url) => self.load(url.as_str()),
            Err(e) => {
                debug!("rejected url {:?}: {}", input, e);
                self.status = e.to_string();
                None
            }
        }
    }

    /// Start fetching an already validated http(s) URL.
    pub fn load(&mut self, url: &str) -> Option<Effect> {
        self.begin_fetch(url, false, "Fetching data...")
    }

    /// Enter the selected collection. The current listing is pushed before
    /// the fetch is issued and popped again if that fetch fails.
    pub fn descend(&mut self) -> Option<Effect> {
        if self.focus != Focus::List {
            return None;
        }
        let entry = self.selected_entry()?.clone();
        if entry.kind != EntryKind::Collection {
            return None;
        }
        if entry.url.is_empty() {
            self.status = "Selected collection has no URL".to_string();
            return None;
        }
        if self.is_loading() {
            self.status = STATUS_BUSY.to_string();
            return None;
        }
        self.back_stack.push(Snapshot {
            entries: self.listing.items.clone(),
            selected: self.listing.selected,
        });
        self.begin_fetch(&entry.url, true, "Fetching nested collection...")
    }

    fn begin_fetch(&mut self, url: &str, descent: bool, status: &str) -> Option<Effect> {
        if self.is_loading() {
            self.status = STATUS_BUSY.to_string();
            return None;
        }
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(InFlight {
            request_id,
            url: url.to_string(),
            descent,
        });
        self.status = status.to_string();
        debug!("fetch #{} {} (descent: {})", request_id, url, descent);
        Some(Effect::Fetch {
            request_id,
            url: url.to_string(),
        })
    }

    /// Apply the completion of fetch `request_id`. Returns `false` when the
    /// completion was stale and ignored.
    pub fn complete_fetch(&mut self, request_id: u64, result: Result<Vec<Entry>, String>) -> bool {
        match &self.in_flight {
            Some(f) if f.request_id == request_id => {}
            _ => {
                debug!("discarding stale completion #{}", request_id);
                return false;
            }
        }
        let Some(flight) = self.in_flight.take() else {
            return false;
        };

        match result {
            Ok(entries) => {
                let n = entries.len();
                self.listing.set_items(entries);
                self.detail_visible = false;
                self.status = format!("Fetched {} items", n);
            }
            Err(msg) => {
                warn!("fetch #{} {} failed: {}", request_id, flight.url, msg);
                if flight.descent {
                    self.back_stack.pop();
                }
                self.status = format!("Error: {}", msg);
            }
        }
        true
    }

    /// Restore the previous listing. Returns `true` if the listing changed.
    pub fn back(&mut self) -> bool {
        if self.is_loading() {
            self.status = STATUS_BUSY.to_string();
            return false;
        }
        match self.back_stack.pop() {
            Some(snapshot) => {
                self.listing.restore(snapshot.entries, snapshot.selected);
                self.detail_visible = false;
                self.status = "Went back to previous list.".to_string();
                true
            }
            None => {
                self.status = "No previous items to go back to.".to_string();
                false
            }
        }
    }

    // ── Detail ───────────────────────────────────────────────────────────────

    pub fn open_detail(&mut self) {
        if self.focus != Focus::List {
            return;
        }
        let Some(entry) = self.selected_entry() else {
            return;
        };
        if entry.kind != EntryKind::Manifest {
            return;
        }
        self.status = format!("Viewing detail: {}", entry.title);
        self.detail_visible = true;
    }

    pub fn close_detail(&mut self) {
        self.detail_visible = false;
        self.status = "Closed detail pane.".to_string();
    }

    /// Enter on a list row: descend into collections, show manifests.
    pub fn activate(&mut self) -> Option<Effect> {
        match self.selected_entry().map(|e| e.kind) {
            Some(EntryKind::Collection) => self.descend(),
            Some(EntryKind::Manifest) => {
                self.open_detail();
                None
            }
            _ => None,
        }
    }

    // ── External shims ───────────────────────────────────────────────────────

    pub fn open_in_browser(&mut self) -> Option<Effect> {
        let url = self
            .selected_entry()
            .filter(|e| e.kind != EntryKind::Error && !e.url.is_empty())
            .map(|e| e.url.clone());
        if url.is_none() {
            self.status = "Failed to open URL".to_string();
        }
        url.map(Effect::OpenUrl)
    }

    pub fn on_opened(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => self.status = STATUS_OPENED.to_string(),
            Err(e) => {
                warn!("open in browser failed: {}", e);
                self.status = "Failed to open URL".to_string();
            }
        }
    }

    pub fn copy_url(&mut self) -> Option<Effect> {
        let url = self
            .selected_entry()
            .filter(|e| !e.url.is_empty())
            .map(|e| e.url.clone());
        if url.is_none() {
            self.status = "Nothing to copy".to_string();
        }
        url.map(Effect::CopyToClipboard)
    }

    pub fn on_copied(&mut self, result: Result<(), String>) {
        self.status = match result {
            Ok(()) => "Copied URL to clipboard".to_string(),
            Err(e) => format!("Failed to copy URL: {}", e),
        };
    }

    // ── Focus & selection ────────────────────────────────────────────────────

    pub fn focus_list(&mut self) {
        self.focus = Focus::List;
        self.listing.select_first();
        self.status = STATUS_READY.to_string();
    }

    pub fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.detail_visible = false;
        self.status = STATUS_READY.to_string();
    }

    pub fn select_up(&mut self, n: usize) {
        self.listing.select_up(n);
        self.reset_opened_status();
    }

    pub fn select_down(&mut self, n: usize) {
        self.listing.select_down(n);
        self.reset_opened_status();
    }

    pub fn select_first(&mut self) {
        self.listing.select_first();
    }

    pub fn select_last(&mut self) {
        self.listing.select_last();
    }

    fn reset_opened_status(&mut self) {
        if self.status == STATUS_OPENED {
            self.status = STATUS_READY.to_string();
        }
    }
}
