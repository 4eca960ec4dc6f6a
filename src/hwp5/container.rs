//! OLE container access for HWP 5.0 documents.
//!
//! Supplies the raw streams the decoders consume: `FileHeader`, the inflated
//! `DocInfo` and `BodyText/SectionN` streams, and the `BinData` blobs as stored.

use super::{BinDataStream, DocumentStreams, FileHeader};
use crate::error::{Error, Result};
use bytes::Bytes;
use cfb::CompoundFile;
use flate2::read::DeflateDecoder;
use std::cell::RefCell;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// OLE container wrapper for HWP 5.0 documents.
pub struct Hwp5Container {
    cfb: RefCell<CompoundFile<Cursor<Vec<u8>>>>,
}

impl Hwp5Container {
    /// Opens an HWP 5.0 container from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Opens an HWP 5.0 container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Opens an HWP 5.0 container from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cfb = CompoundFile::open(Cursor::new(data))
            .map_err(|e| Error::OleContainer(e.to_string()))?;
        Ok(Self {
            cfb: RefCell::new(cfb),
        })
    }

    /// Reads the FileHeader stream (never compressed).
    pub fn read_file_header(&self) -> Result<FileHeader> {
        let data = self.read_stream_raw("FileHeader")?;
        FileHeader::parse(&data)
    }

    /// Reads a raw stream without decompression.
    pub fn read_stream_raw(&self, name: &str) -> Result<Vec<u8>> {
        let mut cfb = self.cfb.borrow_mut();
        let mut stream = cfb
            .open_stream(name)
            .map_err(|_| Error::MissingComponent(name.to_string()))?;

        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Reads a stream, inflating it if the document is compressed.
    pub fn read_stream(&self, name: &str, compressed: bool) -> Result<Bytes> {
        let raw = self.read_stream_raw(name)?;
        if compressed {
            inflate(&raw).map(Bytes::from)
        } else {
            Ok(Bytes::from(raw))
        }
    }

    /// Lists the `BodyText/SectionN` streams in section order.
    pub fn section_names(&self) -> Result<Vec<String>> {
        let mut indexed: Vec<(usize, String)> = self
            .storage_entries("/BodyText")
            .into_iter()
            .filter_map(|name| {
                let index = name.strip_prefix("Section")?.parse().ok()?;
                Some((index, format!("BodyText/{name}")))
            })
            .collect();

        if indexed.is_empty() {
            return Err(Error::MissingComponent("BodyText".into()));
        }
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, name)| name).collect())
    }

    /// Lists the stream names under the `BinData` storage.
    pub fn bin_data_names(&self) -> Vec<String> {
        let mut names = self.storage_entries("/BinData");
        names.sort();
        names
    }

    /// Reads every stream the decoder needs.
    ///
    /// Blobs are returned as stored; their compression is only known once
    /// DocInfo has been decoded.
    pub fn read_streams(&self, header: FileHeader, with_bin_data: bool) -> Result<DocumentStreams> {
        let compressed = header.is_compressed();
        let doc_info = self.read_stream("DocInfo", compressed)?;
        let sections = self
            .section_names()?
            .iter()
            .map(|name| self.read_stream(name, compressed))
            .collect::<Result<Vec<_>>>()?;

        let mut bin_data = Vec::new();
        if with_bin_data {
            for name in self.bin_data_names() {
                let data = self.read_stream_raw(&format!("BinData/{name}"))?;
                bin_data.push(BinDataStream {
                    name,
                    data: Bytes::from(data),
                });
            }
        }

        log::debug!(
            "container: {} sections, {} bin data streams",
            sections.len(),
            bin_data.len()
        );
        Ok(DocumentStreams {
            header,
            doc_info,
            sections,
            bin_data,
        })
    }

    fn storage_entries(&self, path: &str) -> Vec<String> {
        let cfb = self.cfb.borrow();
        match cfb.read_storage(path) {
            Ok(entries) => entries
                .filter(|entry| entry.is_stream())
                .map(|entry| entry.name().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Inflates a raw-deflate stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;
    Ok(output)
}
