//! Document structure.

use super::{Ctrl, DocInfo, Paragraph, SectionDef};
use crate::diagnostic::Diagnostic;
use crate::hwp5::header::{FileHeader, Version};
use bytes::Bytes;
use serde::Serialize;

/// A complete document decoded from HWP 5.0.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// File header (version and property flags)
    pub header: FileHeader,
    /// Shared resource table
    pub doc_info: DocInfo,
    /// Document sections
    pub sections: Vec<Section>,
    /// Embedded binary blobs, in storage order
    pub bin_data: Vec<BinDataBlob>,
    /// Non-fatal findings from every stream, in stream order
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Returns the document format version.
    pub fn version(&self) -> Version {
        self.header.version
    }

    /// Returns the total number of top-level paragraphs in the document.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }

    /// Returns an iterator over all top-level paragraphs in the document.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.sections.iter().flat_map(|s| s.paragraphs.iter())
    }

    /// Returns the section definition of each section that has one.
    pub fn section_defs(&self) -> impl Iterator<Item = &SectionDef> {
        self.sections.iter().filter_map(Section::section_def)
    }

    /// Looks up a blob by its bin data storage id.
    pub fn bin_data_blob(&self, storage_id: u16) -> Option<&BinDataBlob> {
        self.bin_data.iter().find(|b| b.storage_id == storage_id)
    }

    /// Returns the plain text content of the entire document.
    ///
    /// Text of nested paragraph lists (cells, notes, text boxes) follows the
    /// paragraph that owns them.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for paragraph in self.paragraphs() {
            collect_text(paragraph, &mut lines);
        }
        lines.join("\n")
    }
}

fn collect_text(paragraph: &Paragraph, lines: &mut Vec<String>) {
    lines.push(paragraph.plain_text());
    for ctrl in paragraph.controls() {
        for list in ctrl.para_lists() {
            for nested in &list.paragraphs {
                collect_text(nested, lines);
            }
        }
    }
}

/// A section of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Section {
    /// Section index (0-based, matches `BodyText/SectionN`)
    pub index: usize,
    /// Top-level paragraphs in this section
    pub paragraphs: Vec<Paragraph>,
}

impl Section {
    /// Creates a new empty section.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            paragraphs: Vec::new(),
        }
    }

    /// The section definition, carried by the first paragraph.
    pub fn section_def(&self) -> Option<&SectionDef> {
        self.paragraphs.first()?.controls().find_map(|ctrl| match ctrl {
            Ctrl::SectionDef(def) => Some(def),
            _ => None,
        })
    }
}

/// A binary blob from the `BinData` storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinDataBlob {
    /// Storage id from the stream name (`BIN0001.png` has id 1)
    pub storage_id: u16,
    /// Stream name under `BinData/`
    pub name: String,
    /// Inflated contents
    pub data: Bytes,
}

impl BinDataBlob {
    /// Returns the file extension from the stream name.
    pub fn extension(&self) -> &str {
        self.name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
    }
}
