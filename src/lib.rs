// src/lib.rs

//! OGame page extraction library
//!
//! Turns raw client pages (HTML, JSON, or JSON wrapping HTML) into typed game
//! state. Pick the extractor of a client version with
//! [`registry::Extractor::new`] and feed it page bytes.

pub mod aggregation;
pub mod classify;
pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod models;
pub mod registry;
pub mod utils;

pub use error::{ExtractError, Partial, Result};
pub use registry::{Extractor, Registry, Version};
