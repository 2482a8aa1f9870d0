use console::measure_text_width;

/// Display width of `s` in terminal columns, ignoring ANSI escapes.
pub fn display_width(s: &str) -> usize {
    measure_text_width(s)
}

/// Wraps one line to `max_width` columns, breaking at spaces where possible.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut remaining = line;

    while display_width(remaining) > max_width {
        let mut break_at = None;
        let mut hard_end = 0;
        let mut width = 0;
        for (pos, ch) in remaining.char_indices() {
            let ch_width = display_width(ch.encode_utf8(&mut [0u8; 4]));
            if width + ch_width > max_width {
                break;
            }
            if ch == ' ' && pos > 0 {
                break_at = Some(pos);
            }
            width += ch_width;
            hard_end = pos + ch.len_utf8();
        }

        match break_at {
            Some(pos) => {
                lines.push(remaining[..pos].to_string());
                remaining = remaining[pos + 1..].trim_start();
            }
            None => {
                // A single wide glyph can exceed a one-column budget
                let end = if hard_end == 0 {
                    remaining.chars().next().map_or(remaining.len(), char::len_utf8)
                } else {
                    hard_end
                };
                lines.push(remaining[..end].to_string());
                remaining = &remaining[end..];
            }
        }
    }

    lines.push(remaining.to_string());
    lines
}

/// Wraps multi-line text, keeping explicit line breaks.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap_line(line.trim_end_matches('\r'), max_width))
        .collect()
}
