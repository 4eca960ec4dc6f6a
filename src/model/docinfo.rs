//! The shared resource table.
//!
//! Each resource list keeps the index base the file format uses for it, because
//! ids stored in paragraphs and controls encode that base literally: a border
//! fill id of 1 names the first border fill, while a char shape id of 1 names the
//! second char shape.

use super::{
    BorderFill, Bullet, CharShape, ColorRef, FaceName, Language, Numbering, ParaShape,
    ParameterSet, Style, TabDef,
};
use bytes::Bytes;
use serde::Serialize;

/// First valid id of a resource list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IndexBase {
    Zero,
    One,
}

impl IndexBase {
    pub fn first(self) -> u32 {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

/// An append-only list addressed by file ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceList<T> {
    base: IndexBase,
    items: Vec<T>,
}

impl<T> ResourceList<T> {
    pub fn new(base: IndexBase) -> Self {
        Self {
            base,
            items: Vec::new(),
        }
    }

    pub fn base(&self) -> IndexBase {
        self.base
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Looks up an item by its file id.
    pub fn get(&self, id: u32) -> Option<&T> {
        let index = id.checked_sub(self.base.first())?;
        self.items.get(index as usize)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// File id of the item at `index` in storage order.
    pub fn id_of(&self, index: usize) -> u32 {
        index as u32 + self.base.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Iterates `(file id, item)` pairs.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (u32, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(move |(i, item)| (self.id_of(i), item))
    }
}

impl<'a, T> IntoIterator for &'a ResourceList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Start numbers of the document's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StartNumbers {
    pub page: u16,
    pub footnote: u16,
    pub endnote: u16,
    pub picture: u16,
    pub table: u16,
    pub equation: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaretPosition {
    pub list_id: u32,
    pub para_id: u32,
    pub char_pos: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentProperties {
    pub section_count: u16,
    pub start_numbers: StartNumbers,
    pub caret: CaretPosition,
}

/// Declared resource counts, in on-disk order.
///
/// Files written by older versions carry fewer counts; only the counts actually
/// present in the record are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdMappings {
    pub counts: Vec<i32>,
}

impl IdMappings {
    pub const BIN_DATA: usize = 0;
    pub const FACE_NAMES: usize = 1;
    pub const BORDER_FILL: usize = 8;
    pub const CHAR_SHAPE: usize = 9;
    pub const TAB_DEF: usize = 10;
    pub const NUMBERING: usize = 11;
    pub const BULLET: usize = 12;
    pub const PARA_SHAPE: usize = 13;
    pub const STYLE: usize = 14;
    pub const MEMO_SHAPE: usize = 15;
    pub const TRACK_CHANGE: usize = 16;
    pub const TRACK_CHANGE_AUTHOR: usize = 17;
    /// Maximum number of counts a record can carry.
    pub const MAX_COUNTS: usize = 18;

    /// Count at `index`, or 0 if absent; negative counts read as 0.
    pub fn count(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0).max(0) as usize
    }

    pub fn face_names(&self, language: Language) -> usize {
        self.count(Self::FACE_NAMES + language.index())
    }

    pub fn total_face_names(&self) -> usize {
        Language::ALL.iter().map(|&l| self.face_names(l)).sum()
    }
}

code_enum! {
    pub enum BinDataType (default = Link) {
        Link = 0,
        Embedding = 1,
        Storage = 2,
    }
}

code_enum! {
    pub enum BinDataCompression (default = Default) {
        Default = 0,
        Compress = 1,
        NoCompress = 2,
    }
}

code_enum! {
    pub enum BinDataStatus (default = NotAccessed) {
        NotAccessed = 0,
        Success = 1,
        Failed = 2,
        Ignored = 3,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BinDataLink {
    pub absolute_path: String,
    pub relative_path: String,
}

/// Descriptor of one binary blob (image, OLE object, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BinDataItem {
    pub property: u16,
    pub kind: BinDataType,
    pub compression: BinDataCompression,
    pub status: BinDataStatus,
    pub link: Option<BinDataLink>,
    /// Storage id; the blob lives at `BinData/BIN{id:04X}.{extension}`.
    pub storage_id: Option<u16>,
    pub extension: Option<String>,
}

impl BinDataItem {
    /// Name of the blob's stream under the `BinData` storage.
    pub fn stream_name(&self) -> Option<String> {
        let id = self.storage_id?;
        match self.kind {
            BinDataType::Embedding => Some(format!(
                "BIN{:04X}.{}",
                id,
                self.extension.as_deref().unwrap_or("")
            )),
            BinDataType::Storage => Some(format!("BIN{:04X}.OLE", id)),
            BinDataType::Link => None,
        }
    }

    /// Whether the blob is deflate-compressed, given the document default.
    pub fn is_compressed(&self, document_default: bool) -> bool {
        match self.compression {
            BinDataCompression::Default => document_default,
            BinDataCompression::Compress => true,
            BinDataCompression::NoCompress => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoShape {
    pub width: u32,
    pub line_type: u8,
    pub line_width: u8,
    pub line_color: ColorRef,
    pub fill_color: ColorRef,
    pub active_color: ColorRef,
    pub memo_type: Option<u32>,
}

code_enum! {
    pub enum TargetProgram (default = Current) {
        Current = 0,
        Hwp2007 = 1,
        MsWord = 2,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompatibleDocument {
    pub target: TargetProgram,
}

/// Layout compatibility flags per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutCompatibility {
    pub char_level: u32,
    pub paragraph_level: u32,
    pub section_level: u32,
    pub object_level: u32,
    pub field_level: u32,
}

/// A record kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueRecord {
    pub tag_id: u16,
    pub level: u16,
    pub offset: u64,
    pub size: u32,
    pub data: Bytes,
}

/// Face name lists, one per language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceNameTable {
    lists: [ResourceList<FaceName>; 7],
}

impl Default for FaceNameTable {
    fn default() -> Self {
        Self {
            lists: std::array::from_fn(|_| ResourceList::new(IndexBase::Zero)),
        }
    }
}

impl FaceNameTable {
    pub fn list(&self, language: Language) -> &ResourceList<FaceName> {
        &self.lists[language.index()]
    }

    pub(crate) fn list_mut(&mut self, language: Language) -> &mut ResourceList<FaceName> {
        &mut self.lists[language.index()]
    }

    pub fn get(&self, language: Language, id: u32) -> Option<&FaceName> {
        self.list(language).get(id)
    }

    pub fn total(&self) -> usize {
        self.lists.iter().map(ResourceList::len).sum()
    }
}

/// The decoded resource table of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocInfo {
    pub properties: DocumentProperties,
    pub id_mappings: IdMappings,
    pub bin_data: ResourceList<BinDataItem>,
    pub face_names: FaceNameTable,
    pub border_fills: ResourceList<BorderFill>,
    pub char_shapes: ResourceList<CharShape>,
    pub tab_defs: ResourceList<TabDef>,
    pub numberings: ResourceList<Numbering>,
    pub bullets: ResourceList<Bullet>,
    pub para_shapes: ResourceList<ParaShape>,
    pub styles: ResourceList<Style>,
    pub memo_shapes: ResourceList<MemoShape>,
    pub doc_data: Option<ParameterSet>,
    pub compatible_document: Option<CompatibleDocument>,
    pub layout_compatibility: Option<LayoutCompatibility>,
    /// Records kept opaque (unknown tags and unmodeled constructs).
    pub opaque: Vec<OpaqueRecord>,
}

impl Default for DocInfo {
    fn default() -> Self {
        Self {
            properties: DocumentProperties::default(),
            id_mappings: IdMappings::default(),
            bin_data: ResourceList::new(IndexBase::One),
            face_names: FaceNameTable::default(),
            border_fills: ResourceList::new(IndexBase::One),
            char_shapes: ResourceList::new(IndexBase::Zero),
            tab_defs: ResourceList::new(IndexBase::Zero),
            numberings: ResourceList::new(IndexBase::One),
            bullets: ResourceList::new(IndexBase::One),
            para_shapes: ResourceList::new(IndexBase::Zero),
            styles: ResourceList::new(IndexBase::Zero),
            memo_shapes: ResourceList::new(IndexBase::One),
            doc_data: None,
            compatible_document: None,
            layout_compatibility: None,
            opaque: Vec::new(),
        }
    }
}

impl DocInfo {
    pub fn new() -> Self {
        Self::default()
    }
}
