use lazy_static::lazy_static;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

lazy_static! {
    static ref NUMBERED_ITEM: Regex = Regex::new(r"^(\d+)\.\s+(.*)$").unwrap();
    static ref INLINE: Regex = Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|`([^`]+)`").unwrap();
}

fn heading_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Renders tutor replies for the transcript. Understands **bold**, *italic*,
/// `code`, bullet and numbered lists and `#` headings; everything else is
/// passed through line by line.
pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    content.lines().map(render_line).collect()
}

fn render_line(line: &str) -> Line<'static> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::from("");
    }

    let heading = trimmed
        .strip_prefix("### ")
        .or_else(|| trimmed.strip_prefix("## "))
        .or_else(|| trimmed.strip_prefix("# "));
    if let Some(heading) = heading {
        return Line::from(Span::styled(heading.to_string(), heading_style()));
    }

    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        let mut spans = vec![Span::from("  • ")];
        spans.extend(parse_inline(item));
        return Line::from(spans);
    }

    if let Some(caps) = NUMBERED_ITEM.captures(trimmed) {
        let mut spans = vec![Span::from(format!("  {}. ", &caps[1]))];
        spans.extend(parse_inline(&caps[2]));
        return Line::from(spans);
    }

    Line::from(parse_inline(line))
}

fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::from(text[last..whole.start()].to_string()));
        }
        let (content, modifier) = if let Some(bold) = caps.get(1) {
            (bold.as_str(), Modifier::BOLD)
        } else if let Some(italic) = caps.get(2) {
            (italic.as_str(), Modifier::ITALIC)
        } else if let Some(code) = caps.get(3) {
            (code.as_str(), Modifier::DIM)
        } else {
            continue;
        };
        spans.push(Span::styled(
            content.to_string(),
            Style::default().add_modifier(modifier),
        ));
        last = whole.end();
    }

    if last < text.len() || spans.is_empty() {
        spans.push(Span::from(text[last..].to_string()));
    }
    spans
}
