//! # hwpdec
//!
//! A record-level decoder for HWP 5.0 binary documents (the Hangul word
//! processor format). It turns the tag-framed record streams inside the OLE
//! container into a typed object graph: the shared resource table, sections,
//! paragraphs with lexed text and character shape runs, and the controls
//! embedded in them (tables, drawing objects, fields, notes and so on).
//!
//! ## Quick Start
//!
//! ```no_run
//! use hwpdec::parse_file;
//!
//! fn main() -> hwpdec::Result<()> {
//!     let document = parse_file("document.hwp")?;
//!
//!     println!("{} paragraphs", document.paragraph_count());
//!     for diagnostic in &document.diagnostics {
//!         eprintln!("{diagnostic}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Decoding is lenient about what the format allows to vary (unknown tags and
//! controls, short or long records) and strict about what breaks the stream.
//! See [`ParseOptions`] for partial-failure handling.

#[macro_use]
mod macros;

pub mod detect;
pub mod diagnostic;
pub mod error;
pub mod hwp5;
pub mod model;
pub mod parse_options;

pub use detect::{detect_format, detect_format_from_bytes, detect_format_from_path, FormatType};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{Error, Result, StructuralError};
pub use hwp5::{decode_streams, DocumentStreams, Hwp5Container, Hwp5Parser};
pub use model::Document;
pub use parse_options::{ErrorMode, ParseOptions};

use std::io::{Read, Seek};
use std::path::Path;

/// Parses a document from a file path with default options.
///
/// # Example
///
/// ```no_run
/// let document = hwpdec::parse_file("example.hwp")?;
/// println!("Sections: {}", document.sections.len());
/// # Ok::<(), hwpdec::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    HwpDecoder::new().decode_file(path)
}

/// Parses a document from a reader with default options.
pub fn parse_reader<R: Read + Seek>(reader: R) -> Result<Document> {
    HwpDecoder::new().decode_reader(reader)
}

/// Parses a document from bytes with default options.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    HwpDecoder::new().decode_bytes(data)
}

/// Extracts plain text from a document file.
///
/// Text of tables, notes and text boxes follows the paragraph that holds them.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    Ok(parse_file(path)?.plain_text())
}

/// Builder for decoding documents with custom options.
///
/// # Example
///
/// ```no_run
/// use hwpdec::HwpDecoder;
///
/// let document = HwpDecoder::new()
///     .lenient()
///     .sequential()
///     .without_resources()
///     .decode_file("broken.hwp")?;
/// # Ok::<(), hwpdec::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HwpDecoder {
    options: ParseOptions,
}

impl HwpDecoder {
    /// Creates a decoder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder with the given options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Drops broken paragraphs and sections instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Decodes sections one after another.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Skips loading `BinData` blobs.
    pub fn without_resources(mut self) -> Self {
        self.options = self.options.without_resources();
        self
    }

    /// Sets the nesting cap for lists and grouped shapes.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.options = self.options.with_max_nesting_depth(depth);
        self
    }

    /// Returns the options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn decode_file(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        detect_format_from_path(path)?.ensure_supported()?;
        Hwp5Parser::open(path)?.parse_with_options(&self.options)
    }

    pub fn decode_reader<R: Read + Seek>(&self, mut reader: R) -> Result<Document> {
        detect_format(&mut reader)?.ensure_supported()?;
        Hwp5Parser::from_reader(reader)?.parse_with_options(&self.options)
    }

    pub fn decode_bytes(&self, data: &[u8]) -> Result<Document> {
        detect_format_from_bytes(data)?.ensure_supported()?;
        Hwp5Parser::from_bytes(data.to_vec())?.parse_with_options(&self.options)
    }

    /// Decodes streams supplied by some other container reader.
    pub fn decode_streams(&self, streams: DocumentStreams) -> Result<Document> {
        decode_streams(streams, &self.options)
    }
}
