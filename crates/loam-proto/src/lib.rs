//! Shared building blocks for the loam IIIF browser: the tolerant IIIF
//! decoders, the HTTP fetch shim, the chat service adapter, configuration
//! and platform helpers.

pub mod chat;
pub mod config;
pub mod fetch;
pub mod label;
pub mod listing;
pub mod platform;
pub mod resource;
