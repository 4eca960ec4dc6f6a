//! Paragraphs, text runs and control tokens.

use super::Ctrl;
use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Breaks that precede a paragraph.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    #[serde(transparent)]
    pub struct BreakFlags: u8 {
        const SECTION = 0x01;
        const MULTI_COLUMN = 0x02;
        const PAGE = 0x04;
        const COLUMN = 0x08;
    }
}

/// Fixed paragraph attributes from the PARA_HEADER record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParaHeader {
    /// Text length in UTF-16 units.
    pub text_len: u32,
    /// Set on the last paragraph of a paragraph list.
    pub last_in_list: bool,
    /// Bit `n` set if control code `n` occurs in the text.
    pub control_mask: u32,
    /// 0-based para shape id.
    pub para_shape_id: u16,
    /// 0-based style id.
    pub style_id: u8,
    pub breaks: BreakFlags,
    pub char_shape_count: u16,
    pub range_tag_count: u16,
    pub line_seg_count: u16,
    pub instance_id: u32,
    pub merge_flag: Option<u16>,
}

/// How many code units a control occupies in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControlClass {
    /// A single unit.
    Char,
    /// Eight units, no associated control record.
    Inline,
    /// Eight units, paired with a CTRL_HEADER record.
    Extended,
}

impl ControlClass {
    /// Classifies a code unit; `None` for literal text.
    pub fn of(code: u16) -> Option<Self> {
        match code {
            0 | 10 | 13 | 24..=31 => Some(ControlClass::Char),
            4..=9 | 19 | 20 => Some(ControlClass::Inline),
            1..=3 | 11 | 12 | 14..=18 | 21..=23 => Some(ControlClass::Extended),
            _ => None,
        }
    }

    /// Width in code units.
    pub fn width(self) -> u8 {
        match self {
            ControlClass::Char => 1,
            ControlClass::Inline | ControlClass::Extended => 8,
        }
    }
}

/// Meaning of a control code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControlKind {
    Unusable,
    SectionColumnDef,
    FieldStart,
    FieldEnd,
    TitleMark,
    Tab,
    LineBreak,
    Object,
    ParaBreak,
    HiddenComment,
    HeaderFooter,
    Note,
    AutoNumber,
    PageControl,
    Bookmark,
    Overlap,
    Hyphen,
    NonBreakingSpace,
    FixedWidthSpace,
    Reserved,
}

impl ControlKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => ControlKind::Unusable,
            2 => ControlKind::SectionColumnDef,
            3 => ControlKind::FieldStart,
            4 => ControlKind::FieldEnd,
            8 => ControlKind::TitleMark,
            9 => ControlKind::Tab,
            10 => ControlKind::LineBreak,
            11 => ControlKind::Object,
            13 => ControlKind::ParaBreak,
            15 => ControlKind::HiddenComment,
            16 => ControlKind::HeaderFooter,
            17 => ControlKind::Note,
            18 => ControlKind::AutoNumber,
            21 => ControlKind::PageControl,
            22 => ControlKind::Bookmark,
            23 => ControlKind::Overlap,
            24 => ControlKind::Hyphen,
            30 => ControlKind::NonBreakingSpace,
            31 => ControlKind::FixedWidthSpace,
            _ => ControlKind::Reserved,
        }
    }
}

/// A run of literal text, located by its half-open unit range in the
/// paragraph's original text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub start: u32,
    pub end: u32,
    pub char_shape_id: Option<u32>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            char_shape_id: None,
        }
    }

    /// Length in UTF-16 units.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A control embedded in paragraph text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlToken {
    pub code: u16,
    pub kind: ControlKind,
    /// Unit offset of the introducer.
    pub position: u32,
    /// 1 or 8.
    pub width: u8,
    /// The six units between introducer and terminator; empty for 1-unit controls.
    pub payload: Vec<u16>,
    /// Decoded control for extended tokens.
    pub ctrl: Option<Box<Ctrl>>,
}

impl ControlToken {
    /// Control id carried by the first two payload units of an 8-unit token.
    pub fn ctrl_id(&self) -> Option<u32> {
        match self.payload.as_slice() {
            [low, high, ..] => Some(*low as u32 | (*high as u32) << 16),
            _ => None,
        }
    }

    pub fn class(&self) -> Option<ControlClass> {
        ControlClass::of(self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Token {
    Text(TextRun),
    Control(ControlToken),
}

impl Token {
    /// Width of the token in UTF-16 units.
    pub fn width(&self) -> u32 {
        match self {
            Token::Text(run) => run.len(),
            Token::Control(control) => control.width as u32,
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Token::Text(run) => Some(run),
            Token::Control(_) => None,
        }
    }
}

/// Position where a character shape takes effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CharShapeRange {
    pub start: u32,
    pub shape_id: u32,
}

/// Layout cache of one rendered line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineSeg {
    pub text_start: u32,
    pub vertical_pos: i32,
    pub line_height: i32,
    pub text_height: i32,
    pub baseline_gap: i32,
    pub line_spacing: i32,
    pub column_start: i32,
    pub segment_width: i32,
    pub flags: u32,
}

/// A tagged span such as a highlight or a tracked change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeTag {
    pub start: u32,
    pub end: u32,
    pub tag: u32,
}

impl RangeTag {
    pub fn kind(&self) -> u8 {
        (self.tag >> 24) as u8
    }

    pub fn data(&self) -> u32 {
        self.tag & 0x00FF_FFFF
    }
}

/// A decoded paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paragraph {
    pub header: ParaHeader,
    pub tokens: Vec<Token>,
    pub char_shapes: Vec<CharShapeRange>,
    pub line_segs: Vec<LineSeg>,
    pub range_tags: Vec<RangeTag>,
    /// Controls without a matching extended token in the text.
    pub detached_controls: Vec<Ctrl>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn para_shape_id(&self) -> u16 {
        self.header.para_shape_id
    }

    pub fn style_id(&self) -> u8 {
        self.header.style_id
    }

    /// Iterates the literal text runs.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.tokens.iter().filter_map(Token::as_text)
    }

    /// Iterates every decoded control, attached or detached.
    pub fn controls(&self) -> impl Iterator<Item = &Ctrl> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Control(control) => control.ctrl.as_deref(),
                Token::Text(_) => None,
            })
            .chain(self.detached_controls.iter())
    }

    /// Returns the plain text content of this paragraph.
    pub fn plain_text(&self) -> String {
        let mut result = String::new();
        for token in &self.tokens {
            match token {
                Token::Text(run) => result.push_str(&run.text),
                Token::Control(control) => match control.kind {
                    ControlKind::LineBreak => result.push('\n'),
                    ControlKind::Tab => result.push('\t'),
                    ControlKind::NonBreakingSpace | ControlKind::FixedWidthSpace => {
                        result.push(' ')
                    }
                    ControlKind::Hyphen => result.push('-'),
                    _ => {}
                },
            }
        }
        result
    }

    /// Returns true if this paragraph has no literal text.
    pub fn is_empty(&self) -> bool {
        self.text_runs().all(TextRun::is_empty)
    }
}
