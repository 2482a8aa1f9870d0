use crate::controller::Notice;
use crate::transcript::{Author, ChatMessage, Transcript};
use crate::utils::text::{display_width, wrap_text};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const THINKING_LABEL: &str = "AI is thinking...";

const MIN_BUBBLE_WIDTH: usize = 16;

pub fn terminal_width() -> usize {
    let term = console::Term::stdout();
    (term.size().1 as usize).max(MIN_BUBBLE_WIDTH + 4)
}

fn author_label(author: Author) -> &'static str {
    match author {
        Author::User => "You",
        Author::Assistant => "Gemini",
    }
}

/// Lays out one message as an unstyled bubble, at most 80% of
/// `terminal_width` wide. User bubbles hug the right edge, assistant bubbles
/// the left.
pub fn bubble_lines(message: &ChatMessage, terminal_width: usize) -> Vec<String> {
    let max_box = (terminal_width * 4 / 5).max(MIN_BUBBLE_WIDTH);
    let inner_max = max_box - 4;

    let mut body = if message.is_loading {
        vec![THINKING_LABEL.to_string()]
    } else {
        wrap_text(&message.text, inner_max)
    };
    if !message.is_loading {
        body.push(message.timestamp.format("%H:%M").to_string());
    }

    let label = author_label(message.author);
    let inner = body
        .iter()
        .map(|line| display_width(line))
        .chain(std::iter::once(display_width(label) + 1))
        .max()
        .unwrap_or(0)
        .min(inner_max);
    let box_width = inner + 4;

    let indent = match message.author {
        Author::User => " ".repeat(terminal_width.saturating_sub(box_width)),
        Author::Assistant => String::new(),
    };

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(format!(
        "{}╭─{}{}╮",
        indent,
        label,
        "─".repeat(box_width.saturating_sub(3 + display_width(label)))
    ));
    let time_row = body.len() - 1;
    for (i, line) in body.iter().enumerate() {
        let pad = inner.saturating_sub(display_width(line));
        // Right-align the timestamp row inside the bubble
        let row = if i == time_row && !message.is_loading {
            format!("{}{}", " ".repeat(pad), line)
        } else {
            format!("{}{}", line, " ".repeat(pad))
        };
        lines.push(format!("{}│ {} │", indent, row));
    }
    lines.push(format!("{}╰{}╯", indent, "─".repeat(box_width - 2)));
    lines
}

pub fn display_message(message: &ChatMessage) {
    let width = terminal_width();
    println!();
    for line in bubble_lines(message, width) {
        let styled = match (message.author, message.is_loading) {
            (_, true) => style(line).dim(),
            (Author::User, false) => style(line).cyan(),
            (Author::Assistant, false) => style(line).white(),
        };
        println!("{}", styled);
    }
}

pub fn display_transcript(transcript: &Transcript) {
    for message in transcript.messages() {
        display_message(message);
    }
}

pub fn display_header(model: &str) {
    println!(
        "\n{} {}",
        style("✦").bold().magenta(),
        style("Gemini AI Assistant").bold().magenta()
    );
    println!("{}", style(format!("Model: {}", model)).dim());
    println!(
        "{}",
        style("Enter sends, Alt+Enter adds a line, /help lists commands, Ctrl+D exits.").dim()
    );
}

/// Reports a failed turn on stderr, outside the transcript.
pub fn display_notification(notice: &Notice) {
    eprintln!(
        "{} {}",
        style(format!("✖ {}:", notice.title)).bold().red(),
        style(&notice.message).red()
    );
}

/// Renders a reply as markdown, used outside the bubble layout.
pub fn display_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

/// Animated placeholder shown while a turn is outstanding.
pub struct ThinkingIndicator {
    bar: ProgressBar,
}

impl ThinkingIndicator {
    pub fn start() -> Self {
        let bar = ProgressBar::new_spinner();
        let spinner = ProgressStyle::with_template("{spinner:.dim} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["●∙∙", "∙●∙", "∙∙●", "∙●∙", "●∙∙"]);
        bar.set_style(spinner);
        bar.set_message(THINKING_LABEL);
        bar.enable_steady_tick(Duration::from_millis(150));
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(author: Author, text: &str, is_loading: bool) -> ChatMessage {
        let mut transcript = Transcript::new();
        if is_loading {
            transcript.begin_loading();
        } else {
            transcript.push(author, text);
        }
        transcript.last().unwrap().clone()
    }

    #[test]
    fn user_bubble_is_right_aligned() {
        let lines = bubble_lines(&message(Author::User, "Hi", false), 60);
        for line in &lines {
            assert_eq!(display_width(line), 60, "line {line:?}");
        }
        assert!(lines[0].starts_with(' '));
        assert!(lines[1].contains("Hi"));
    }

    #[test]
    fn assistant_bubble_is_left_aligned_and_bounded() {
        let text = "word ".repeat(40);
        let lines = bubble_lines(&message(Author::Assistant, &text, false), 50);
        assert!(lines[0].starts_with('╭'));
        assert!(lines.len() > 4);
        assert!(lines.iter().all(|line| display_width(line) <= 40));
    }

    #[test]
    fn bubble_shows_time_of_day() {
        let msg = message(Author::Assistant, "Hello there!", false);
        let lines = bubble_lines(&msg, 80);
        let stamp = msg.timestamp.format("%H:%M").to_string();
        assert!(lines[lines.len() - 2].trim_end_matches(" │").ends_with(&stamp));
    }

    #[test]
    fn placeholder_has_no_text_or_time() {
        let lines = bubble_lines(&message(Author::Assistant, "", true), 80);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(THINKING_LABEL));
    }

    #[test]
    fn line_breaks_survive_layout() {
        let lines = bubble_lines(&message(Author::Assistant, "first\nsecond", false), 80);
        assert!(lines[1].contains("first"));
        assert!(lines[2].contains("second"));
    }
}
