//! Shared rendering utilities and helpers.
//!
//! Low-level pieces used by several components: cursor positioning, search
//! match highlighting, and width handling for mixed Latin/Hangul text.
//!
//! # Example
//!
//! ```rust
//! use yakguk::ui::helpers::{display_width, match_ranges};
//!
//! assert_eq!(match_ranges("Seoul Pharmacy", "PHARM"), vec![(6, 11)]);
//! assert_eq!(display_width("온누리약국"), 10);
//! ```

use crate::ui::theme::Theme;

/// Positions the cursor at a 1-indexed row and column.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Writes `text` centered across a full row, starting with `style`.
///
/// The text is truncated to `cols` and both sides are padded with spaces so
/// the row is fully overwritten.
pub fn print_centered(row: usize, text: &str, style: &str, cols: usize) {
    let text = truncate_to_width(text, cols);
    let len = display_width(&text);
    let left = cols.saturating_sub(len) / 2;

    position_cursor(row, 1);
    print!("{style}{}{text}{}", " ".repeat(left), " ".repeat(cols.saturating_sub(left + len)));
    print!("{}", Theme::reset());
}

/// Character ranges of `text` containing `query`, case-insensitively.
///
/// Ranges are `(start, end)` in character indices, end exclusive, and do not
/// overlap. An empty query matches nothing.
#[must_use]
pub fn match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return vec![];
    }

    // one lowercase char per source char keeps indices aligned
    let haystack: Vec<char> = text
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect();

    let mut ranges = Vec::new();
    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        if haystack[start..start + needle.len()] == needle[..] {
            ranges.push((start, start + needle.len()));
            start += needle.len();
        } else {
            start += 1;
        }
    }
    ranges
}

/// Terminal columns taken by a character.
///
/// Combining marks, Hangul medial/final jamo, zero-width joiners and
/// variation selectors take none. Hangul, CJK, fullwidth forms and
/// emoji-presentation pictographs take two.
#[must_use]
pub fn char_width(c: char) -> usize {
    match u32::from(c) {
        0x0300..=0x036F
        | 0x0483..=0x0489
        | 0x0591..=0x05BD
        | 0x1160..=0x11FF
        | 0x1AB0..=0x1AFF
        | 0x1DC0..=0x1DFF
        | 0x200B..=0x200F
        | 0x2060..=0x2064
        | 0x20D0..=0x20FF
        | 0xFE00..=0xFE0F
        | 0xFE20..=0xFE2F
        | 0xFEFF
        | 0xE0100..=0xE01EF => 0,
        0x1100..=0x115F
        | 0x231A..=0x231B
        | 0x23E9..=0x23EC
        | 0x25FD..=0x25FE
        | 0x2614..=0x2615
        | 0x26AA..=0x26AB
        | 0x26BD..=0x26BE
        | 0x26CE
        | 0x26D4
        | 0x26F2..=0x26F5
        | 0x26FA..=0x26FD
        | 0x2705
        | 0x270A..=0x270B
        | 0x274C
        | 0x2753..=0x2755
        | 0x2795..=0x2797
        | 0x2B1B..=0x2B1C
        | 0x2B50
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA960..=0xA97F
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x1F680..=0x1F6FF
        | 0x1F900..=0x1F9FF
        | 0x20000..=0x2FFFD
        | 0x30000..=0x3FFFD => 2,
        _ => 1,
    }
}

#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Cuts `text` to at most `width` columns, marking the cut with `…`.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = char_width(c);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Prints `text` with the given character ranges highlighted.
///
/// Selected cards skip match highlighting so the selection colors stay
/// intact. Ranges past the end of the text are clamped.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
