//! Listing extraction: flattens a fetched IIIF document into the ordered
//! entries shown in the browser.
//!
//! The extractor is deliberately shallow: child collections become entries
//! and are only fetched when the user descends into them.

use std::fmt::Write as _;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};

use crate::resource::{Resource, ResourceKind};

pub const NO_ENTRIES_MESSAGE: &str = "No valid manifests or child collections found";

/// What an entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Collection,
    Manifest,
    /// Sentinel row carrying a parse failure.
    Error,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Collection => "Collection",
            Self::Manifest => "Manifest",
            Self::Error => "Error",
        }
    }
}

/// One browsable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub url: String,
    pub title: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(url: impl Into<String>, title: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            kind,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(String::new(), message, EntryKind::Error)
    }

    fn from_resource(resource: &Resource, kind: EntryKind) -> Self {
        if let Some(lang) = resource.label.language() {
            trace!("label for {:?} taken from language {:?}", resource.id, lang);
        }
        Self::new(resource.id.clone(), resource.title(), kind)
    }
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Failed to parse IIIF data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{}", NO_ENTRIES_MESSAGE)]
    Empty,
}

/// Decode raw bytes and extract the listing.
pub fn parse_listing(bytes: &[u8]) -> Result<Vec<Entry>, ListingError> {
    let root: Value = serde_json::from_slice(bytes)?;
    let entries = extract_listing(&root);
    if entries.is_empty() {
        return Err(ListingError::Empty);
    }
    Ok(entries)
}

/// Like [`parse_listing`], but failures become a single [`EntryKind::Error`]
/// row so the list always has something to show.
pub fn listing_or_error(bytes: &[u8]) -> Vec<Entry> {
    parse_listing(bytes).unwrap_or_else(|e| vec![Entry::error(e.to_string())])
}

/// Children of an already decoded document, `items` first then `manifests`.
/// May be empty.
pub fn extract_listing(root: &Value) -> Vec<Entry> {
    let resource = Resource::from_value(root);
    let mut entries = Vec::new();

    match resource.kind() {
        ResourceKind::Collection => {
            for item in array_field(root, "items") {
                let child = Resource::from_value(item);
                match child.kind() {
                    ResourceKind::Manifest => {
                        entries.push(Entry::from_resource(&child, EntryKind::Manifest))
                    }
                    ResourceKind::Collection => {
                        entries.push(Entry::from_resource(&child, EntryKind::Collection))
                    }
                    ResourceKind::Other => {
                        debug!(
                            "skipping item {:?} of unsupported type {:?}",
                            child.id, child.raw_type
                        );
                    }
                }
            }

            for manifest in array_field(root, "manifests") {
                if !manifest.is_object() {
                    debug!("skipping non-object manifests element: {}", manifest);
                    continue;
                }
                let child = Resource::from_value(manifest);
                entries.push(Entry::from_resource(&child, EntryKind::Manifest));
            }
        }
        ResourceKind::Manifest => {
            entries.push(Entry::from_resource(&resource, EntryKind::Manifest));
        }
        ResourceKind::Other => {
            debug!("root resource has unsupported type {:?}", resource.raw_type);
        }
    }

    entries
}

fn array_field<'a>(root: &'a Value, key: &str) -> &'a [Value] {
    root.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Context block handed to the chat service: one `Title:`/`URL:` pair per
/// entry, blank line separated.
pub fn chat_context(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = write!(out, "Title: {}\nURL: {}\n\n", entry.title, entry.url);
    }
    out
}
