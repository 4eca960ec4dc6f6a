//! Non-fatal decode findings.
//!
//! Size mismatches, unknown ids and skipped content never stop decoding. They are
//! collected here (and mirrored to the `log` facade) so a caller can inspect how
//! faithfully a file matched the decoder's layouts.

use serde::Serialize;
use std::fmt;

/// Category of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A record decoder consumed fewer bytes than the record declares.
    SizeMismatch,
    /// A tag id with no decoder; the record was skipped.
    UnknownTag,
    /// A control id with no decoder; the control was kept opaque.
    UnknownControl,
    /// A recognized construct that is intentionally kept opaque.
    Unsupported,
    /// A record appeared where its level or position makes no sense.
    UnexpectedRecord,
    /// Two places in the file disagree (ids, counts, lengths).
    Inconsistent,
    /// An id refers past the end of a resource list.
    DanglingReference,
    /// A paragraph was dropped after a structural error (lenient mode).
    SkippedParagraph,
    /// A whole section was dropped after a structural error (lenient mode).
    SkippedSection,
}

/// A single non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What kind of finding this is.
    pub kind: DiagnosticKind,
    /// Stream the finding belongs to (e.g. `DocInfo`, `BodyText/Section0`).
    pub stream: String,
    /// Byte offset of the record within the stream.
    pub offset: u64,
    /// Human-readable detail.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}: {:?}: {}",
            self.stream, self.offset, self.kind, self.message
        )
    }
}

/// Per-stream diagnostic sink.
///
/// One sink exists per decode call (and per section when sections are decoded in
/// parallel); nothing is shared between documents.
#[derive(Debug, Default)]
pub struct Diagnostics {
    stream: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty sink for the named stream.
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the stream name this sink reports for.
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Records a finding.
    pub fn push(&mut self, kind: DiagnosticKind, offset: u64, message: impl Into<String>) {
        let message = message.into();
        match kind {
            DiagnosticKind::SkippedParagraph
            | DiagnosticKind::SkippedSection
            | DiagnosticKind::DanglingReference => {
                log::warn!("{}@{}: {}", self.stream, offset, message)
            }
            _ => log::debug!("{}@{}: {}", self.stream, offset, message),
        }
        self.entries.push(Diagnostic {
            kind,
            stream: self.stream.clone(),
            offset,
            message,
        });
    }

    /// Returns the findings recorded so far.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Returns true if no findings were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts findings of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Consumes the sink and returns its findings.
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
