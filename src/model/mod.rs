//! Decoded document graph.
//!
//! This module defines the in-memory graph produced by the HWP 5.0 decoder.
//! The types are format-neutral enough to be filled by a sibling ingester for
//! the XML flavor of the format.

mod common;
mod control;
mod docinfo;
mod document;
mod fill;
mod paragraph;
mod shape;
mod style;
mod table;

pub use common::*;
pub use control::*;
pub use docinfo::*;
pub use document::*;
pub use fill::*;
pub use paragraph::*;
pub use shape::*;
pub use style::*;
pub use table::*;
