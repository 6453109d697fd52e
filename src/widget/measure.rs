//! Intrinsic text measurement: grapheme-cluster segmentation plus
//! East-Asian-width-aware cell widths (spec §4.3 step 2, §4.4 "text nodes
//! report an intrinsic width/height").

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The number of terminal cells a single line of text occupies. Zero-width
/// combining marks contribute 0; most CJK and many emoji graphemes
/// contribute 2. Measurement is grapheme-cluster based so combining
/// sequences and ZWJ emoji sequences are measured as one unit, matching how
/// a terminal actually advances the cursor.
#[must_use]
pub fn line_width(line: &str) -> usize {
    line.graphemes(true).map(grapheme_width).sum()
}

/// Width of a single grapheme cluster. Uses the cluster's first scalar's
/// East Asian width class as the common case, but widens the whole cluster
/// to 2 if any contained scalar is itself wide (covers most emoji ZWJ
/// sequences without a full emoji-presentation table).
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.chars().all(|c| c == '\u{200d}' || is_variation_selector(c) || unicode_width::UnicodeWidthChar::width(c) == Some(0)) {
        return if grapheme.is_empty() { 0 } else { grapheme.width().max(0) };
    }
    grapheme.chars().any(|c| unicode_width::UnicodeWidthChar::width(c) == Some(2)).then_some(2).unwrap_or_else(|| grapheme.width())
}

fn is_variation_selector(c: char) -> bool {
    matches!(c, '\u{fe0e}' | '\u{fe0f}')
}

/// Split `text` into wrapped lines no wider than `max_width` cells, breaking
/// at grapheme boundaries and preferring the last whitespace run before the
/// limit (spec §4.4 text wrapping). A single grapheme wider than
/// `max_width` is placed alone on its own line rather than dropped.
#[must_use]
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return text.lines().map(str::to_owned).collect();
    }
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        out.extend(wrap_paragraph(paragraph, max_width));
    }
    out
}

fn wrap_paragraph(paragraph: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;
    let mut last_break: Option<(usize, usize)> = None; // (byte offset in `current`, width at that point)

    for grapheme in paragraph.graphemes(true) {
        let w = grapheme_width(grapheme);
        if current_width + w > max_width && !current.is_empty() {
            if let Some((offset, _)) = last_break {
                let (line, rest) = current.split_at(offset);
                lines.push(line.trim_end().to_string());
                current = rest.trim_start().to_string();
                current_width = line_width(&current);
            } else {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            last_break = None;
        }
        if grapheme.chars().all(char::is_whitespace) {
            last_break = Some((current.len(), current_width));
        }
        current.push_str(grapheme);
        current_width += w;
    }
    lines.push(current);
    lines
}
