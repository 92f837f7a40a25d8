//! Rendering of matched ranges for display.

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthChar;

const ELLIPSIS: char = '…';

/// How matched ranges are marked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Style {
    /// Bold and coloured via ANSI escapes
    Ansi(Color),
    /// Wrapped in square brackets, for plain-text output
    Brackets,
    /// No markup
    None,
}

impl Style {
    /// ANSI style with a named colour, falling back to yellow.
    pub fn ansi(color: Option<&str>) -> Self {
        let color = color
            .and_then(|c| c.parse::<Color>().ok())
            .unwrap_or(Color::Yellow);
        Style::Ansi(color)
    }
}

/// Render `text` with each `[start, end)` char range marked up.
///
/// Ranges must be sorted and disjoint; out-of-bounds parts are ignored.
pub fn render(text: &str, ranges: &[(usize, usize)], style: &Style) -> String {
    if ranges.is_empty() || *style == Style::None {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 8);
    let mut cursor = 0;

    for &(start, end) in ranges {
        let start = start.clamp(cursor, chars.len());
        let end = end.clamp(start, chars.len());
        if start == end {
            continue;
        }
        out.extend(&chars[cursor..start]);
        let segment: String = chars[start..end].iter().collect();
        match style {
            Style::Ansi(color) => out.push_str(&segment.color(*color).bold().to_string()),
            Style::Brackets => {
                out.push('[');
                out.push_str(&segment);
                out.push(']');
            }
            Style::None => out.push_str(&segment),
        }
        cursor = end;
    }
    out.extend(&chars[cursor..]);
    out
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Shorten `text` to at most `max_width` display columns, keeping the
/// first matched range in view.
///
/// Dropped text on either side is replaced by `…`. Returns the shortened
/// text and the ranges rebased onto it (clipped to what remains visible).
pub fn truncate_around(
    text: &str,
    ranges: &[(usize, usize)],
    max_width: usize,
) -> (String, Vec<(usize, usize)>) {
    let chars: Vec<char> = text.chars().collect();
    let total: usize = chars.iter().map(|&c| char_width(c)).sum();
    if total <= max_width || max_width < 3 {
        return (text.to_string(), ranges.to_vec());
    }

    let focus = ranges.first().map_or(0, |r| r.0.min(chars.len() - 1));
    let focus_width = char_width(chars[focus]);

    // Drop leading text until the focus sits in the first half.
    let half = max_width / 2;
    let mut start = 0;
    let mut prefix: usize = chars[..focus].iter().map(|&c| char_width(c)).sum();
    while start < focus && prefix + focus_width + usize::from(start > 0) > half {
        prefix -= char_width(chars[start]);
        start += 1;
    }

    let lead = usize::from(start > 0);
    let mut end = start;
    let mut used = lead;
    while end < chars.len() {
        let w = char_width(chars[end]);
        let trailing = usize::from(end + 1 < chars.len());
        if used + w + trailing > max_width {
            break;
        }
        used += w;
        end += 1;
    }

    let mut out = String::new();
    if lead == 1 {
        out.push(ELLIPSIS);
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push(ELLIPSIS);
    }

    let rebased = ranges
        .iter()
        .filter_map(|&(s, e)| {
            let s = s.max(start);
            let e = e.min(end);
            (s < e).then_some((s - start + lead, e - start + lead))
        })
        .collect();

    (out, rebased)
}
