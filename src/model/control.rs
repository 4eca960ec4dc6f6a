//! Controls: objects embedded in paragraph text.

use super::{
    BorderLine, ColorRef, Margins, ObjectCommon, Paragraph, ShapeObject, Table,
};
use bytes::Bytes;
use serde::Serialize;
use std::fmt;

/// Four-character control identifier.
///
/// Stored on disk as a little-endian u32 whose big-endian bytes spell the
/// name, so `tbl ` appears in the file as the bytes ` lbt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CtrlId(pub u32);

impl CtrlId {
    pub const fn new(name: &[u8; 4]) -> Self {
        CtrlId(u32::from_be_bytes(*name))
    }

    /// The four name bytes in reading order.
    pub fn name_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// True for field controls, whose names start with `%`.
    pub fn is_field(self) -> bool {
        self.name_bytes()[0] == b'%'
    }

    /// True for shape component ids, whose names start with `$`.
    pub fn is_shape_component(self) -> bool {
        self.name_bytes()[0] == b'$'
    }

    pub const SECTION_DEF: CtrlId = CtrlId::new(b"secd");
    pub const COLUMN_DEF: CtrlId = CtrlId::new(b"cold");
    pub const TABLE: CtrlId = CtrlId::new(b"tbl ");
    pub const GENERAL_SHAPE: CtrlId = CtrlId::new(b"gso ");
    pub const EQUATION: CtrlId = CtrlId::new(b"eqed");
    pub const FORM: CtrlId = CtrlId::new(b"form");
    pub const HEADER: CtrlId = CtrlId::new(b"head");
    pub const FOOTER: CtrlId = CtrlId::new(b"foot");
    pub const FOOTNOTE: CtrlId = CtrlId::new(b"fn  ");
    pub const ENDNOTE: CtrlId = CtrlId::new(b"en  ");
    pub const AUTO_NUMBER: CtrlId = CtrlId::new(b"atno");
    pub const NEW_NUMBER: CtrlId = CtrlId::new(b"nwno");
    pub const PAGE_NUM_POS: CtrlId = CtrlId::new(b"pgnp");
    pub const PAGE_HIDE: CtrlId = CtrlId::new(b"pghd");
    pub const PAGE_ODD_EVEN: CtrlId = CtrlId::new(b"pgct");
    pub const BOOKMARK: CtrlId = CtrlId::new(b"bokm");
    pub const INDEX_MARK: CtrlId = CtrlId::new(b"idxm");
    pub const OVERLAP: CtrlId = CtrlId::new(b"tcps");
    pub const DUTMAL: CtrlId = CtrlId::new(b"tdut");
    pub const HIDDEN_COMMENT: CtrlId = CtrlId::new(b"tcmt");

    pub const SHAPE_LINE: CtrlId = CtrlId::new(b"$lin");
    pub const SHAPE_RECTANGLE: CtrlId = CtrlId::new(b"$rec");
    pub const SHAPE_ELLIPSE: CtrlId = CtrlId::new(b"$ell");
    pub const SHAPE_ARC: CtrlId = CtrlId::new(b"$arc");
    pub const SHAPE_POLYGON: CtrlId = CtrlId::new(b"$pol");
    pub const SHAPE_CURVE: CtrlId = CtrlId::new(b"$cur");
    pub const SHAPE_CONTAINER: CtrlId = CtrlId::new(b"$con");
    pub const SHAPE_PICTURE: CtrlId = CtrlId::new(b"$pic");
    pub const SHAPE_OLE: CtrlId = CtrlId::new(b"$ole");
    pub const SHAPE_VIDEO: CtrlId = CtrlId::new(b"$vid");
    pub const SHAPE_TEXT_ART: CtrlId = CtrlId::new(b"$tat");
    pub const SHAPE_CONNECT_LINE: CtrlId = CtrlId::new(b"$col");
}

impl fmt::Display for CtrlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.name_bytes() {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02X}")?;
            }
        }
        Ok(())
    }
}

code_enum! {
    pub enum TextDirection (default = Horizontal) {
        Horizontal = 0,
        Vertical = 1,
    }
}

code_enum! {
    pub enum LineWrap (default = Break) {
        Break = 0,
        Squeeze = 1,
        Keep = 2,
    }
}

code_enum! {
    pub enum ListVerticalAlign (default = Top) {
        Top = 0,
        Center = 1,
        Bottom = 2,
    }
}

/// Header of a paragraph list (cell, note, header/footer, caption, text box).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListHeader {
    pub para_count: u16,
    pub property: u32,
    pub text_direction: TextDirection,
    pub line_wrap: LineWrap,
    pub vertical_align: ListVerticalAlign,
}

/// A list header together with the paragraphs it introduces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParaList {
    pub header: ListHeader,
    pub paragraphs: Vec<Paragraph>,
}

impl ParaList {
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

code_enum! {
    /// Numbering glyph style for page numbers, notes and auto numbers.
    pub enum NumberShape (default = Digit) {
        Digit = 0,
        CircledDigit = 1,
        RomanUpper = 2,
        RomanLower = 3,
        LatinUpper = 4,
        LatinLower = 5,
        CircledLatinUpper = 6,
        CircledLatinLower = 7,
        Hangul = 8,
        CircledHangul = 9,
        HangulJamo = 10,
        CircledHangulJamo = 11,
        HangulDigit = 12,
        Ideograph = 13,
        CircledIdeograph = 14,
        DecagonCircle = 15,
        DecagonCircleHanja = 16,
        Symbol = 0x80,
        UserChar = 0x81,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageMargins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
    pub header: u32,
    pub footer: u32,
    pub gutter: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageDef {
    pub width: u32,
    pub height: u32,
    pub margins: PageMargins,
    pub property: u32,
    pub landscape: bool,
    pub gutter_type: u8,
}

/// Footnote or endnote layout of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoteShape {
    pub property: u32,
    pub number_shape: NumberShape,
    pub placement: u8,
    pub numbering: u8,
    pub superscript: bool,
    pub continue_text: bool,
    pub user_symbol: char,
    pub prefix: char,
    pub suffix: char,
    pub start_number: u16,
    pub divider_length: u32,
    pub divider_above: u16,
    pub divider_below: u16,
    pub note_spacing: u16,
    pub divider: BorderLine,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageBorderFill {
    pub property: u32,
    pub relative_to_paper: bool,
    pub include_header: bool,
    pub include_footer: bool,
    pub fill_area: u8,
    pub gaps: Margins,
    /// 1-based border fill id.
    pub border_fill_id: u16,
}

/// Section definition (`secd`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionDef {
    pub property: u32,
    pub hide_header: bool,
    pub hide_footer: bool,
    pub hide_master_page: bool,
    pub hide_border: bool,
    pub hide_fill: bool,
    pub hide_page_number: bool,
    pub text_direction: TextDirection,
    pub column_gap: u16,
    pub vertical_grid: u16,
    pub horizontal_grid: u16,
    pub default_tab_stop: u32,
    pub numbering_para_shape_id: u16,
    pub page_start: u16,
    pub figure_start: u16,
    pub table_start: u16,
    pub equation_start: u16,
    pub language: Option<u16>,
    pub page_def: Option<PageDef>,
    pub footnote_shape: Option<NoteShape>,
    pub endnote_shape: Option<NoteShape>,
    /// Both pages, even pages, odd pages.
    pub page_border_fills: Vec<PageBorderFill>,
}

code_enum! {
    pub enum ColumnKind (default = Normal) {
        Normal = 0,
        Distribute = 1,
        Parallel = 2,
    }
}

code_enum! {
    pub enum ColumnDirection (default = Left) {
        Left = 0,
        Right = 1,
        Both = 2,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnWidth {
    pub width: u16,
    pub gap: u16,
}

/// Column definition (`cold`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub property: u16,
    pub kind: ColumnKind,
    pub count: u8,
    pub direction: ColumnDirection,
    pub same_width: bool,
    /// Gap between columns when all columns have the same width.
    pub gap: u16,
    /// Explicit widths when columns differ.
    pub widths: Vec<ColumnWidth>,
    pub property2: u16,
    pub divider: BorderLine,
}

code_enum! {
    pub enum PageApply (default = Both) {
        Both = 0,
        Even = 1,
        Odd = 2,
    }
}

/// Header or footer (`head` / `foot`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeaderFooter {
    pub apply: PageApply,
    pub list: ParaList,
}

/// Footnote or endnote (`fn  ` / `en  `).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Note {
    pub number: Option<u32>,
    pub prefix: Option<char>,
    pub suffix: Option<char>,
    pub number_shape: Option<NumberShape>,
    pub instance_id: Option<u32>,
    pub list: ParaList,
}

/// Hidden comment (`tcmt`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HiddenComment {
    pub list: ParaList,
}

code_enum! {
    pub enum AutoNumberKind (default = Page) {
        Page = 0,
        Footnote = 1,
        Endnote = 2,
        Figure = 3,
        Table = 4,
        Equation = 5,
    }
}

/// Automatic number (`atno`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AutoNumber {
    pub property: u32,
    pub kind: AutoNumberKind,
    pub shape: NumberShape,
    pub superscript: bool,
    pub number: u16,
    pub user_symbol: char,
    pub prefix: char,
    pub suffix: char,
}

/// New number start (`nwno`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NewNumber {
    pub property: u32,
    pub kind: AutoNumberKind,
    pub number: u16,
}

code_enum! {
    pub enum PageNumberPosition (default = None) {
        None = 0,
        TopLeft = 1,
        TopCenter = 2,
        TopRight = 3,
        BottomLeft = 4,
        BottomCenter = 5,
        BottomRight = 6,
        OutsideTop = 7,
        OutsideBottom = 8,
        InsideTop = 9,
        InsideBottom = 10,
    }
}

/// Page number position (`pgnp`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageNumPos {
    pub property: u32,
    pub shape: NumberShape,
    pub position: PageNumberPosition,
    pub user_symbol: char,
    pub prefix: char,
    pub suffix: char,
    pub dash: char,
}

/// Hide page elements on the current page (`pghd`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageHide {
    pub property: u32,
    pub header: bool,
    pub footer: bool,
    pub master_page: bool,
    pub border: bool,
    pub fill: bool,
    pub page_number: bool,
}

/// Odd/even page adjustment (`pgct`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageOddEven {
    pub property: u32,
    pub apply: PageApply,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bookmark {
    pub name: Option<String>,
    pub params: Option<ParameterSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexMark {
    pub first_key: String,
    pub second_key: String,
    pub reserved: u16,
}

/// Overlapping characters (`tcps`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharOverlap {
    pub text: String,
    pub border_type: u8,
    pub inner_size: i8,
    pub expansion: u8,
    pub char_shape_ids: Vec<u32>,
}

/// Ruby text (`tdut`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dutmal {
    pub main_text: String,
    pub sub_text: String,
    pub position: u32,
    pub size_ratio: u32,
    pub option: u32,
    pub style_id: u32,
    pub alignment: u32,
}

/// Kind of a field control, from its `%xxx` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    Unknown,
    Date,
    DocDate,
    Path,
    Bookmark,
    MailMerge,
    CrossRef,
    Formula,
    ClickHere,
    Summary,
    UserInfo,
    Hyperlink,
    RevisionSign,
    PrivateInfo,
    TableOfContents,
}

impl FieldKind {
    pub fn from_id(id: CtrlId) -> Self {
        match &id.name_bytes() {
            b"%dte" => FieldKind::Date,
            b"%ddt" => FieldKind::DocDate,
            b"%pat" => FieldKind::Path,
            b"%bmk" => FieldKind::Bookmark,
            b"%mmg" => FieldKind::MailMerge,
            b"%xrf" => FieldKind::CrossRef,
            b"%fmu" => FieldKind::Formula,
            b"%clk" => FieldKind::ClickHere,
            b"%smr" => FieldKind::Summary,
            b"%usr" => FieldKind::UserInfo,
            b"%hlk" => FieldKind::Hyperlink,
            b"%sig" => FieldKind::RevisionSign,
            b"%cpr" => FieldKind::PrivateInfo,
            b"%toc" => FieldKind::TableOfContents,
            _ => FieldKind::Unknown,
        }
    }
}

/// Field start (`%xxx`). Click-here fields are `FieldKind::ClickHere`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub id: CtrlId,
    pub kind: FieldKind,
    pub property: u32,
    pub editable_in_form: bool,
    pub extra_property: u8,
    pub command: String,
    pub field_id: u32,
    pub params: Option<ParameterSet>,
}

/// Form object (`form`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormObject {
    pub common: ObjectCommon,
    pub form_type: u32,
    pub properties: String,
}

/// Equation (`eqed`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Equation {
    pub common: ObjectCommon,
    pub property: u32,
    pub script: String,
    /// Base font size in HWPUNIT.
    pub base_size: u32,
    pub color: ColorRef,
    pub baseline: i16,
    pub version: Option<String>,
    pub font_name: Option<String>,
}

/// A control kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpaqueCtrl {
    pub id: CtrlId,
    pub offset: u64,
    pub size: u32,
    pub data: Bytes,
    pub child_records: usize,
}

/// Typed value of a parameter item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParameterValue {
    Null,
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    U8(u8),
    U16(u16),
    U32(u32),
    Set(ParameterSet),
    Array(Vec<ParameterSet>),
    BinData(u16),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterItem {
    pub id: u16,
    pub value: ParameterValue,
}

/// A parameter set from a CTRL_DATA record or the DOC_DATA record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterSet {
    pub id: u16,
    pub items: Vec<ParameterItem>,
}

impl ParameterSet {
    /// First string value in the set, searching nested sets depth-first.
    pub fn first_string(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match &item.value {
            ParameterValue::String(s) => Some(s.as_str()),
            ParameterValue::Set(set) => set.first_string(),
            ParameterValue::Array(sets) => sets.iter().find_map(ParameterSet::first_string),
            _ => None,
        })
    }

    pub fn get(&self, id: u16) -> Option<&ParameterValue> {
        self.items.iter().find(|item| item.id == id).map(|item| &item.value)
    }
}

/// A decoded control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Ctrl {
    SectionDef(SectionDef),
    ColumnDef(ColumnDef),
    Header(HeaderFooter),
    Footer(HeaderFooter),
    Footnote(Note),
    Endnote(Note),
    Table(Table),
    Shape(ShapeObject),
    AutoNumber(AutoNumber),
    NewNumber(NewNumber),
    PageNumPos(PageNumPos),
    PageHide(PageHide),
    PageOddEven(PageOddEven),
    Bookmark(Bookmark),
    IndexMark(IndexMark),
    Overlap(CharOverlap),
    Dutmal(Dutmal),
    HiddenComment(HiddenComment),
    Field(Field),
    Form(FormObject),
    Equation(Equation),
    Opaque(OpaqueCtrl),
}

impl Ctrl {
    /// The control's four-character id.
    pub fn id(&self) -> CtrlId {
        match self {
            Ctrl::SectionDef(_) => CtrlId::SECTION_DEF,
            Ctrl::ColumnDef(_) => CtrlId::COLUMN_DEF,
            Ctrl::Header(_) => CtrlId::HEADER,
            Ctrl::Footer(_) => CtrlId::FOOTER,
            Ctrl::Footnote(_) => CtrlId::FOOTNOTE,
            Ctrl::Endnote(_) => CtrlId::ENDNOTE,
            Ctrl::Table(_) => CtrlId::TABLE,
            Ctrl::Shape(_) => CtrlId::GENERAL_SHAPE,
            Ctrl::AutoNumber(_) => CtrlId::AUTO_NUMBER,
            Ctrl::NewNumber(_) => CtrlId::NEW_NUMBER,
            Ctrl::PageNumPos(_) => CtrlId::PAGE_NUM_POS,
            Ctrl::PageHide(_) => CtrlId::PAGE_HIDE,
            Ctrl::PageOddEven(_) => CtrlId::PAGE_ODD_EVEN,
            Ctrl::Bookmark(_) => CtrlId::BOOKMARK,
            Ctrl::IndexMark(_) => CtrlId::INDEX_MARK,
            Ctrl::Overlap(_) => CtrlId::OVERLAP,
            Ctrl::Dutmal(_) => CtrlId::DUTMAL,
            Ctrl::HiddenComment(_) => CtrlId::HIDDEN_COMMENT,
            Ctrl::Field(field) => field.id,
            Ctrl::Form(_) => CtrlId::FORM,
            Ctrl::Equation(_) => CtrlId::EQUATION,
            Ctrl::Opaque(opaque) => opaque.id,
        }
    }

    /// Paragraph lists owned by this control, in file order.
    pub fn para_lists(&self) -> Vec<&ParaList> {
        match self {
            Ctrl::Header(hf) | Ctrl::Footer(hf) => vec![&hf.list],
            Ctrl::Footnote(note) | Ctrl::Endnote(note) => vec![&note.list],
            Ctrl::HiddenComment(comment) => vec![&comment.list],
            Ctrl::Table(table) => table
                .caption
                .iter()
                .map(|c| &c.list)
                .chain(table.cells.iter().map(|cell| &cell.list))
                .collect(),
            Ctrl::Shape(shape) => shape.para_lists(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_id_reversed_ascii() {
        // "tbl " is stored as the bytes " lbt"
        let stored = [b' ', b'l', b'b', b't'];
        assert_eq!(CtrlId(u32::from_le_bytes(stored)), CtrlId::TABLE);
        assert_eq!(CtrlId::TABLE.to_string(), "tbl ");
    }

    #[test]
    fn test_field_ids() {
        let click = CtrlId::new(b"%clk");
        assert!(click.is_field());
        assert_eq!(FieldKind::from_id(click), FieldKind::ClickHere);
        assert_eq!(FieldKind::from_id(CtrlId::new(b"%zzz")), FieldKind::Unknown);
        assert!(!CtrlId::TABLE.is_field());
    }

    #[test]
    fn test_parameter_set_first_string() {
        let set = ParameterSet {
            id: 0x21B,
            items: vec![
                ParameterItem {
                    id: 1,
                    value: ParameterValue::U32(3),
                },
                ParameterItem {
                    id: 2,
                    value: ParameterValue::Set(ParameterSet {
                        id: 0,
                        items: vec![ParameterItem {
                            id: 0x4000,
                            value: ParameterValue::String("mark".into()),
                        }],
                    }),
                },
            ],
        };
        assert_eq!(set.first_string(), Some("mark"));
        assert_eq!(set.get(1), Some(&ParameterValue::U32(3)));
    }
}
