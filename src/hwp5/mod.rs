//! HWP 5.0 binary format decoding.
//!
//! [`Hwp5Container`] pulls the streams out of the OLE file; [`decode_streams`]
//! turns them into a [`Document`]. DocInfo is decoded first and completely, then
//! each section is decoded against it, in parallel when the options allow.

pub mod bits;
pub mod bodytext;
mod container;
pub mod control;
pub mod cursor;
pub mod dispatch;
pub mod docinfo;
pub mod header;
pub mod record;
pub mod shape;

#[cfg(test)]
pub(crate) mod test_support;

pub use container::{inflate, Hwp5Container};
pub use header::{FileHeader, Version};
pub use record::{RawRecord, RecordHeader, RecordNode, TagId};

use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::error::{Error, Result};
use crate::model::{BinDataBlob, DocInfo, Document, Section};
use crate::parse_options::ParseOptions;
use bytes::Bytes;
use dispatch::DecodeContext;
use rayon::prelude::*;
use std::io::{Read, Seek};
use std::path::Path;

/// A blob under the `BinData` storage, as stored.
#[derive(Debug, Clone)]
pub struct BinDataStream {
    /// Stream name, e.g. `BIN0001.png`
    pub name: String,
    /// Raw stream contents, possibly deflated
    pub data: Bytes,
}

/// Everything the decoder reads from a container.
///
/// `doc_info` and `sections` are already inflated.
#[derive(Debug, Clone)]
pub struct DocumentStreams {
    pub header: FileHeader,
    pub doc_info: Bytes,
    pub sections: Vec<Bytes>,
    pub bin_data: Vec<BinDataStream>,
}

/// Decodes a set of streams into a document.
pub fn decode_streams(streams: DocumentStreams, options: &ParseOptions) -> Result<Document> {
    let header = streams.header;
    let version = header.version;

    let mut doc_diags = Diagnostics::new("DocInfo");
    let doc_info = {
        let mut ctx = DecodeContext::new(version, options.max_nesting_depth, &mut doc_diags);
        docinfo::decode_doc_info(streams.doc_info, &mut ctx)?
    };

    let decoded: Vec<(Result<Section>, Diagnostics)> = if options.parallel {
        streams
            .sections
            .into_par_iter()
            .enumerate()
            .map(|(index, data)| decode_section_stream(index, data, version, options))
            .collect()
    } else {
        streams
            .sections
            .into_iter()
            .enumerate()
            .map(|(index, data)| decode_section_stream(index, data, version, options))
            .collect()
    };

    let mut diagnostics = doc_diags.into_entries();
    let mut sections = Vec::with_capacity(decoded.len());
    for (index, (result, mut diags)) in decoded.into_iter().enumerate() {
        match result {
            Ok(section) => sections.push(section),
            Err(err) if options.is_lenient() && err.is_structural() => {
                diags.push(
                    DiagnosticKind::SkippedSection,
                    0,
                    format!("section {index} dropped: {err}"),
                );
            }
            Err(err) => return Err(err),
        }
        diagnostics.extend(diags.into_entries());
    }

    let mut blob_diags = Diagnostics::new("BinData");
    let bin_data = if options.extract_resources {
        load_bin_data(
            streams.bin_data,
            &doc_info,
            header.is_compressed(),
            options,
            &mut blob_diags,
        )?
    } else {
        Vec::new()
    };
    diagnostics.extend(blob_diags.into_entries());

    log::debug!(
        "decoded HWP {}: {} sections, {} blobs, {} diagnostics",
        version,
        sections.len(),
        bin_data.len(),
        diagnostics.len()
    );
    Ok(Document {
        header,
        doc_info,
        sections,
        bin_data,
        diagnostics,
    })
}

fn decode_section_stream(
    index: usize,
    data: Bytes,
    version: Version,
    options: &ParseOptions,
) -> (Result<Section>, Diagnostics) {
    let mut diags = Diagnostics::new(format!("BodyText/Section{index}"));
    let result = {
        let mut ctx = DecodeContext::new(version, options.max_nesting_depth, &mut diags);
        bodytext::decode_section(index, data, &mut ctx, options.error_mode)
    };
    (result, diags)
}

/// Inflates each blob according to its DocInfo item, falling back to the
/// document default for blobs no item describes.
fn load_bin_data(
    streams: Vec<BinDataStream>,
    doc_info: &DocInfo,
    document_compressed: bool,
    options: &ParseOptions,
    diags: &mut Diagnostics,
) -> Result<Vec<BinDataBlob>> {
    let mut blobs = Vec::with_capacity(streams.len());
    for stream in streams {
        let Some(storage_id) = storage_id(&stream.name) else {
            diags.push(
                DiagnosticKind::UnexpectedRecord,
                0,
                format!("bin data stream '{}' has no storage id", stream.name),
            );
            continue;
        };
        let item = doc_info
            .bin_data
            .iter()
            .find(|item| item.storage_id == Some(storage_id));
        if item.is_none() {
            diags.push(
                DiagnosticKind::DanglingReference,
                0,
                format!("no bin data item for '{}'", stream.name),
            );
        }
        let compressed = item.map_or(document_compressed, |item| {
            item.is_compressed(document_compressed)
        });

        let data = if compressed {
            match inflate(&stream.data) {
                Ok(data) => Bytes::from(data),
                Err(err) if options.is_lenient() => {
                    diags.push(
                        DiagnosticKind::Inconsistent,
                        0,
                        format!("'{}' kept as stored: {err}", stream.name),
                    );
                    stream.data
                }
                Err(err) => return Err(err),
            }
        } else {
            stream.data
        };
        blobs.push(BinDataBlob {
            storage_id,
            name: stream.name,
            data,
        });
    }
    Ok(blobs)
}

/// Storage id encoded in a blob name: `BIN000A.png` is 10.
fn storage_id(name: &str) -> Option<u16> {
    let stem = name.strip_prefix("BIN")?;
    let digits = stem.split('.').next()?;
    u16::from_str_radix(digits, 16).ok()
}

/// HWP 5.0 document parser over an OLE container.
pub struct Hwp5Parser {
    container: Hwp5Container,
    header: FileHeader,
}

impl Hwp5Parser {
    /// Opens an HWP 5.0 document from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_container(Hwp5Container::open(path)?)
    }

    /// Opens an HWP 5.0 document from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::with_container(Hwp5Container::from_reader(reader)?)
    }

    /// Opens an HWP 5.0 document from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::with_container(Hwp5Container::from_bytes(data)?)
    }

    fn with_container(container: Hwp5Container) -> Result<Self> {
        let header = container.read_file_header()?;
        Ok(Self { container, header })
    }

    /// Returns the file header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Parses the document with default options.
    pub fn parse(&self) -> Result<Document> {
        self.parse_with_options(&ParseOptions::default())
    }

    /// Parses the document.
    pub fn parse_with_options(&self, options: &ParseOptions) -> Result<Document> {
        if self.header.is_encrypted() {
            return Err(Error::Encrypted);
        }
        if self.header.is_distribution() {
            return Err(Error::DistributionRestricted);
        }
        let streams = self
            .container
            .read_streams(self.header.clone(), options.extract_resources)?;
        decode_streams(streams, options)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{para_header, Payload, RecordWriter};
    use super::*;
    use crate::model::BinDataCompression;

    fn doc_info() -> Bytes {
        let mut writer = RecordWriter::new();
        writer.record(TagId::DocumentProperties, 0, &Payload::new().fill(0, 26).build());
        writer.finish()
    }

    fn section(texts: &[&str]) -> Bytes {
        let mut writer = RecordWriter::new();
        for text in texts {
            writer.paragraph(0, text);
        }
        writer.finish()
    }

    fn streams(sections: Vec<Bytes>) -> DocumentStreams {
        DocumentStreams {
            header: FileHeader::new(Version::new(5, 0, 3, 2)),
            doc_info: doc_info(),
            sections,
            bin_data: Vec::new(),
        }
    }

    #[test]
    fn test_sections_keep_order_in_parallel() {
        let sections = (0..8)
            .map(|i| section(&[&format!("s{i}a"), &format!("s{i}b")]))
            .collect();
        let document = decode_streams(streams(sections), &ParseOptions::default()).unwrap();

        assert_eq!(document.sections.len(), 8);
        assert_eq!(document.sections[5].index, 5);
        assert_eq!(document.sections[5].paragraphs[1].plain_text(), "s5b");
        assert_eq!(document.paragraph_count(), 16);
    }

    #[test]
    fn test_broken_section_strict_and_lenient() {
        let mut broken = RecordWriter::new();
        broken.record(TagId::ParaHeader, 0, &para_header(1, 0));
        // Header claims 0x50 payload bytes that are not there.
        let mut bytes = broken.finish().to_vec();
        bytes.extend_from_slice(&((0x50u32 << 20) | 67).to_le_bytes());
        let sections = vec![section(&["ok"]), Bytes::from(bytes)];

        let options = ParseOptions::default().sequential();
        assert!(decode_streams(streams(sections.clone()), &options)
            .unwrap_err()
            .is_structural());

        let document = decode_streams(streams(sections), &options.lenient()).unwrap();
        assert_eq!(document.sections.len(), 1);
        let skipped: Vec<_> = document
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::SkippedSection)
            .collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].stream, "BodyText/Section1");
    }

    #[test]
    fn test_bin_data_compression_follows_item() {
        use flate2::write::DeflateEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"PNGDATA").unwrap();
        let deflated = encoder.finish().unwrap();

        let mut info = DocInfo::new();
        info.bin_data.push(crate::model::BinDataItem {
            kind: crate::model::BinDataType::Embedding,
            compression: BinDataCompression::NoCompress,
            storage_id: Some(2),
            extension: Some("png".into()),
            ..Default::default()
        });
        let streams = vec![
            BinDataStream {
                name: "BIN0001.png".into(),
                data: Bytes::from(deflated),
            },
            BinDataStream {
                name: "BIN0002.png".into(),
                data: Bytes::from_static(b"RAW"),
            },
        ];
        let mut diags = Diagnostics::new("BinData");
        let blobs = load_bin_data(streams, &info, true, &ParseOptions::default(), &mut diags)
            .unwrap();

        assert_eq!(blobs[0].data.as_ref(), b"PNGDATA");
        assert_eq!(blobs[1].data.as_ref(), b"RAW");
        assert_eq!(blobs[1].extension(), "png");
        // The first blob has no DocInfo item.
        assert_eq!(diags.count(DiagnosticKind::DanglingReference), 1);
    }

    #[test]
    fn test_storage_id() {
        assert_eq!(storage_id("BIN000A.jpg"), Some(10));
        assert_eq!(storage_id("BIN0001.OLE"), Some(1));
        assert_eq!(storage_id("thumbnail.png"), None);
    }
}
