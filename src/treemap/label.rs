use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const COLUMN_WIDTH_FACTOR: f32 = 0.6;
const ELLIPSIS: &str = "…";

pub const MAX_LABEL_LINES: usize = 2;

fn columns_per_line(width_px: f32, font_size: f32) -> usize {
    if !(width_px > 0.0 && font_size > 0.0) {
        return 0;
    }
    (width_px / (font_size * COLUMN_WIDTH_FACTOR)).floor() as usize
}

/// Greedy word wrap into at most [`MAX_LABEL_LINES`] lines. Words wider than
/// a line are split between grapheme clusters. When text is left over, the
/// last line ends in an ellipsis.
pub fn wrap_label(text: &str, width_px: f32, font_size: f32) -> Vec<String> {
    let max_columns = columns_per_line(width_px, font_size);
    if max_columns == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut truncated = false;

    let words = text
        .split_whitespace()
        .flat_map(|word| split_long_word(word, max_columns));
    for word in words {
        if current.is_empty() {
            current = word;
            continue;
        }

        if current.width() + 1 + word.width() <= max_columns {
            current.push(' ');
            current.push_str(&word);
            continue;
        }

        lines.push(std::mem::take(&mut current));
        if lines.len() == MAX_LABEL_LINES {
            truncated = true;
            break;
        }
        current = word;
    }

    if !current.is_empty() && lines.len() < MAX_LABEL_LINES {
        lines.push(current);
    }

    if truncated && let Some(last) = lines.last_mut() {
        let budget = max_columns.saturating_sub(ELLIPSIS.width());
        let mut shortened = take_columns(last, budget).trim_end().to_owned();
        shortened.push_str(ELLIPSIS);
        *last = shortened;
    }

    lines
}

fn take_columns(text: &str, columns: usize) -> &str {
    let mut used = 0;
    let mut end = 0;
    for (offset, grapheme) in text.grapheme_indices(true) {
        used += grapheme.width();
        if used > columns {
            break;
        }
        end = offset + grapheme.len();
    }
    &text[..end]
}

// A single grapheme wider than the line still gets a chunk of its own.
fn split_long_word(word: &str, max_columns: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for grapheme in word.graphemes(true) {
        if !chunk.is_empty() && chunk.width() + grapheme.width() > max_columns {
            chunks.push(std::mem::take(&mut chunk));
        }
        chunk.push_str(grapheme);
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_label_fits_on_one_line() {
        assert_eq!(wrap_label("Energy", 120.0, 10.0), vec!["Energy"]);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        // 60px at 10px font -> 10 columns per line.
        assert_eq!(
            wrap_label("Oil and gas wells", 60.0, 10.0),
            vec!["Oil and", "gas wells"]
        );
    }

    #[test]
    fn overflow_gets_an_ellipsis() {
        let lines = wrap_label("Property and casualty insurance carriers", 60.0, 10.0);
        assert_eq!(lines.len(), MAX_LABEL_LINES);
        assert_eq!(lines[0], "Property");
        assert!(lines[1].ends_with(ELLIPSIS));
        assert!(lines[1].width() <= 10);
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(
            wrap_label("Semiconductors", 30.0, 10.0),
            vec!["Semic", "ondu…"]
        );
    }

    #[test]
    fn combining_accents_stay_with_their_letter() {
        // 24px -> 4 columns; the decomposed é is one column wide.
        assert_eq!(
            wrap_label("Cafe\u{301}s", 24.0, 10.0),
            vec!["Cafe\u{301}", "s"]
        );
    }

    #[test]
    fn emoji_sequences_are_never_cut() {
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}\u{200D}\u{1F466}";
        let lines = wrap_label(&format!("{family} Family"), 18.0, 10.0);
        assert_eq!(lines, vec![family.to_owned(), "Fa…".to_owned()]);
    }

    #[test]
    fn wide_glyphs_use_two_columns() {
        // 30px -> 5 columns, so only two CJK glyphs fit per line.
        let lines = wrap_label("東京都市圏", 30.0, 10.0);
        assert_eq!(lines, vec!["東京", "都市…"]);
        assert!(lines.iter().all(|line| line.width() <= 5));
    }

    #[test]
    fn no_room_means_no_lines() {
        assert!(wrap_label("Anything", 3.0, 10.0).is_empty());
        assert!(wrap_label("", 300.0, 10.0).is_empty());
    }
}
