//! Helvetica advance widths and greedy word wrapping.

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Advance widths (1/1000 em) for printable ASCII, starting at the space.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015,                                             // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // 'N'..'Z'
    278, 278, 278, 469, 556, 333,                                                   // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // 'n'..'z'
    334, 260, 334, 584,                                                             // '{'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..127).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Width of `text` in millimetres at `size` points.
///
/// Bold text is measured with the regular widths.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * size * PT_TO_MM
}

/// Split `text` into lines no wider than `max_width` mm.
///
/// Breaks on whitespace; a single word wider than the line is split between
/// characters. Explicit newlines always break. Returns at least one line.
pub fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };

            if text_width(&candidate, size) <= max_width {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }

            if text_width(word, size) <= max_width {
                line = word.to_string();
            } else {
                let mut pieces = split_long_word(word, max_width, size);
                line = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn split_long_word(word: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if text_width(&current, size) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    pieces.push(current);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_size() {
        let w10 = text_width("Invoice", 10.0);
        let w20 = text_width("Invoice", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-4);
        // "i" is narrower than "m"
        assert!(text_width("i", 10.0) < text_width("m", 10.0));
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("Soap", 50.0, 10.0), vec!["Soap"]);
        assert_eq!(wrap_text("", 50.0, 10.0), vec![""]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "Shop No. 4, Ground Floor, Laxmi Complex, Near Bus Stand, Station Road, Nagpur 440001";
        let lines = wrap_text(text, 60.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 60.0, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = wrap_text(&"W".repeat(80), 30.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "W".repeat(80));
    }
}
