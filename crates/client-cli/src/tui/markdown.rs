//! Markdown styling for assistant messages
//!
//! Line-oriented pass over the text: fenced code blocks, headings and
//! bullets at the line level, inline `code` and **bold** within a line.
//! Anything it does not recognize passes through unstyled.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub fn render(content: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for raw in content.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
            lines.push(Line::from(Span::styled(
                raw.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }

        if in_code_block {
            lines.push(Line::from(Span::styled(
                raw.to_string(),
                Style::default().fg(Color::Yellow),
            )));
            continue;
        }

        if trimmed.starts_with('#') {
            let text = trimmed.trim_start_matches('#').trim_start().to_string();
            lines.push(Line::from(Span::styled(
                text,
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )));
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            let mut spans = vec![Span::raw("• ".to_string())];
            spans.extend(inline_spans(rest));
            lines.push(Line::from(spans));
            continue;
        }

        lines.push(Line::from(inline_spans(raw)));
    }

    lines
}

/// Split one line into styled spans, toggling on backticks and `**`.
fn inline_spans(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut buf = String::new();
    let mut code = false;
    let mut bold = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '`' {
            flush(&mut spans, &mut buf, code, bold);
            code = !code;
            continue;
        }
        if ch == '*' && chars.peek() == Some(&'*') && !code {
            chars.next();
            flush(&mut spans, &mut buf, code, bold);
            bold = !bold;
            continue;
        }
        buf.push(ch);
    }
    flush(&mut spans, &mut buf, code, bold);

    if spans.is_empty() {
        spans.push(Span::raw(String::new()));
    }
    spans
}

fn flush(spans: &mut Vec<Span<'static>>, buf: &mut String, code: bool, bold: bool) {
    if buf.is_empty() {
        return;
    }
    let text = std::mem::take(buf);
    let mut style = Style::default();
    if code {
        style = style.fg(Color::Yellow);
    }
    if bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    spans.push(Span::styled(text, style));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let lines = render("just words");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].content, "just words");
        assert_eq!(lines[0].spans[0].style, Style::default());
    }

    #[test]
    fn test_bold_span_is_styled() {
        let lines = render("an **important** point");
        let spans = &lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "important");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_inline_code_is_styled() {
        let lines = render("run `lipi login` first");
        let spans = &lines[0].spans;
        assert_eq!(spans[1].content, "lipi login");
        assert_eq!(spans[1].style.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_code_fence_toggles_block_styling() {
        let lines = render("before\n```\nlet x = 1;\n```\nafter");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2].spans[0].style.fg, Some(Color::Yellow));
        assert_eq!(lines[4].spans[0].style, Style::default());
    }

    #[test]
    fn test_heading_and_bullet() {
        let lines = render("## Summary\n- first point");
        assert_eq!(lines[0].spans[0].content, "Summary");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(lines[1].spans[0].content, "• ");
        assert_eq!(lines[1].spans[1].content, "first point");
    }

    #[test]
    fn test_asterisks_inside_code_are_literal() {
        let lines = render("`a ** b`");
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "a ** b");
        assert_eq!(spans[0].style.fg, Some(Color::Yellow));
    }
}
