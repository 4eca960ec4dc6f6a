//! Splits paragraph text into literal runs and control tokens.
//!
//! Units above 0x1F are literal text. Below that, a code is either a one-unit
//! control or the introducer of an eight-unit control whose last unit repeats
//! the introducer. Runs keep their unit range in the original text so the char
//! shape positions can be laid over them afterwards.

use crate::error::{Result, StructuralError};
use crate::model::{ControlClass, ControlKind, ControlToken, TextRun, Token};

/// Width of an inline or extended control.
const BOUNDED_WIDTH: usize = 8;

/// Lexes a paragraph's UTF-16 units into tokens.
///
/// The token widths always add up to `units.len()`.
pub fn lex(units: &[u16]) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut run_start = 0;
    let mut pos = 0;

    while pos < units.len() {
        let code = units[pos];
        let Some(class) = ControlClass::of(code) else {
            pos += 1;
            continue;
        };

        push_text(&mut tokens, units, run_start, pos);
        let width = match class {
            ControlClass::Char => 1,
            ControlClass::Inline | ControlClass::Extended => BOUNDED_WIDTH,
        };
        let payload = if width == 1 {
            Vec::new()
        } else {
            read_bounded(units, pos, code)?.to_vec()
        };

        tokens.push(Token::Control(ControlToken {
            code,
            kind: ControlKind::from_code(code),
            position: pos as u32,
            width: width as u8,
            payload,
            ctrl: None,
        }));
        pos += width;
        run_start = pos;
    }

    push_text(&mut tokens, units, run_start, units.len());
    Ok(tokens)
}

/// Returns the six payload units of the eight-unit control at `pos`.
fn read_bounded(units: &[u16], pos: usize, code: u16) -> Result<&[u16]> {
    let end = pos + BOUNDED_WIDTH;
    if end > units.len() {
        return Err(StructuralError::TruncatedControl {
            position: pos,
            introducer: code,
        }
        .into());
    }
    let terminator = units[end - 1];
    if terminator != code {
        return Err(StructuralError::MalformedControl {
            position: pos,
            introducer: code,
            found: terminator,
        }
        .into());
    }
    Ok(&units[pos + 1..end - 1])
}

fn push_text(tokens: &mut Vec<Token>, units: &[u16], start: usize, end: usize) {
    if start < end {
        tokens.push(Token::Text(TextRun::new(
            String::from_utf16_lossy(&units[start..end]),
            start as u32,
            end as u32,
        )));
    }
}
