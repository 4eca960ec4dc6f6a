//! Lays char shape positions over the lexed text runs.

use crate::model::{CharShapeRange, TextRun, Token};

/// Assigns char shape ids to text runs, splitting runs at interior positions.
///
/// `ranges` must be sorted by start. For each range the first run ending after
/// its start is split if the start falls strictly inside it; that run and every
/// later run take the range's id, so later ranges overwrite earlier ones. A start
/// past the last run changes nothing.
pub fn apply_char_shapes(tokens: &mut Vec<Token>, ranges: &[CharShapeRange]) {
    for range in ranges {
        let Some(index) = tokens
            .iter()
            .position(|token| matches!(token, Token::Text(run) if run.end > range.start))
        else {
            continue;
        };

        let interior = matches!(&tokens[index], Token::Text(run) if run.start < range.start);
        let first = if interior {
            split_run(tokens, index, range.start);
            index + 1
        } else {
            index
        };

        for token in &mut tokens[first..] {
            if let Token::Text(run) = token {
                run.char_shape_id = Some(range.shape_id);
            }
        }
    }
}

/// Splits the run at `tokens[index]` so that the right half starts at unit `at`.
fn split_run(tokens: &mut Vec<Token>, index: usize, at: u32) {
    let Token::Text(run) = &mut tokens[index] else {
        return;
    };
    let units: Vec<u16> = run.text.encode_utf16().collect();
    let cut = ((at - run.start) as usize).min(units.len());

    let right = TextRun {
        text: String::from_utf16_lossy(&units[cut..]),
        start: at,
        end: run.end,
        char_shape_id: run.char_shape_id,
    };
    run.text = String::from_utf16_lossy(&units[..cut]);
    run.end = at;
    tokens.insert(index + 1, Token::Text(right));
}
