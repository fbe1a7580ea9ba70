use crate::models::{ChatView, Sender, Turn, TutorConfig};
use crate::ui::layout::calculate_chat_chunks;
use crate::ui::popups::draw_upload_prompt;
use crate::ui::scratchpad::draw_scratchpad;
use crate::ui::key_hint;
use crate::utils::markdown::render_markdown;
use crate::utils::{calculate_max_scroll, calculate_wrapped_cursor_position, estimate_text_height};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn indented(line: Line<'static>) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = vec![Span::from("  ")];
    spans.extend(line.spans);
    Line::from(spans)
}

fn push_turn(lines: &mut Vec<Line<'static>>, turn: &Turn) {
    match turn.sender {
        Sender::User => {
            let mut header = vec![Span::styled(
                "You:",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )];
            if turn.is_correct_answer == Some(true) {
                header.push(Span::styled(
                    " ✓",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            lines.push(Line::from(header));
            for line in turn.text.lines() {
                lines.push(Line::from(format!("  {}", line)));
            }
        }
        Sender::Assistant => {
            lines.push(Line::from(Span::styled(
                "Kellz Math:",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.extend(render_markdown(&turn.text).into_iter().map(indented));
        }
    }

    if turn.image.is_some() {
        lines.push(Line::from(Span::styled(
            "  [image attached]",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    if turn.requests_work {
        let mut spans = vec![Span::styled(
            "  Show your work: ",
            Style::default().fg(Color::Yellow),
        )];
        spans.extend(key_hint("Ctrl+U", " Upload Picture  "));
        spans.extend(key_hint("Ctrl+D", " Use Digital Scratchpad"));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
}

/// Transcript rendering: sender headers, markdown bodies, attachment and
/// work-request markers.
pub fn transcript_lines(turns: &[Turn]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for turn in turns {
        push_turn(&mut lines, turn);
    }
    lines
}

fn action_buttons(view: &ChatView) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, action) in view.active_actions().iter().enumerate() {
        let style = if view.selected_action == Some(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if view.busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Magenta)
        };
        spans.push(Span::styled(format!("[ {} ]", action.label), style));
        spans.push(Span::from("  "));
    }
    Line::from(spans)
}

pub fn draw_chat(f: &mut Frame, view: &mut ChatView, config: &TutorConfig) {
    let has_actions = !view.active_actions().is_empty();
    let layout = calculate_chat_chunks(f.area(), has_actions);

    let header = Paragraph::new(format!(
        "Kellz Math  |  {}  |  {}  |  {}",
        config.difficulty,
        config.rigor,
        config.mode.label()
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let mut lines = transcript_lines(&view.turns);
    if view.busy {
        lines.push(Line::from(Span::styled(
            "Kellz Math is thinking...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let visible_height = layout.transcript_area.height.saturating_sub(2) as usize;
    let text_width = layout.transcript_area.width.saturating_sub(2) as usize;
    let content = Text::from(lines);
    let content_height = estimate_text_height(&content, text_width);
    // word wrapping breaks earlier than the estimate assumes
    let max_scroll = calculate_max_scroll(content_height + content_height / 4, visible_height);
    view.max_scroll = max_scroll;
    view.scroll_y = if view.follow_tail {
        max_scroll
    } else {
        view.scroll_y.min(max_scroll)
    };

    let transcript = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((view.scroll_y, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Conversation ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(transcript, layout.transcript_area);

    if has_actions {
        let actions = Paragraph::new(action_buttons(view)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Actions (Tab) "),
        );
        f.render_widget(actions, layout.actions_area);
    }

    let input_text = if view.input_buffer.is_empty() {
        Text::from(Span::styled(
            if view.busy {
                "Please wait..."
            } else {
                "Type your message..."
            },
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(view.input_buffer.as_str())
    };
    let input_width = layout.input_area.width.saturating_sub(2) as usize;
    let (cursor_line, cursor_col) =
        calculate_wrapped_cursor_position(&view.input_buffer, view.cursor_position, input_width);
    let input_scroll = cursor_line as u16;
    let input = Paragraph::new(input_text)
        .wrap(Wrap { trim: false })
        .scroll((input_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Message ")
                .border_style(if view.busy {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::Yellow)
                }),
        );
    f.render_widget(input, layout.input_area);

    let popup_open = view.upload.is_some() || view.scratchpad.is_some();
    if !view.busy && !popup_open && view.selected_action.is_none() {
        let cursor_x = layout.input_area.x + 1 + cursor_col as u16;
        let cursor_y = layout.input_area.y + 1;
        f.set_cursor_position((cursor_x, cursor_y));
    }

    let mut keys = key_hint("Enter", " Send  ");
    keys.extend(key_hint("Tab", " Actions  "));
    keys.extend(key_hint("↑/↓", " Scroll  "));
    keys.extend(key_hint("Esc", " Quit"));
    let mut ctrl = key_hint("Ctrl+U", " Upload  ");
    ctrl.extend(key_hint("Ctrl+D", " Scratchpad  "));
    ctrl.extend(key_hint("Ctrl+C", " Exit App"));
    let help = Paragraph::new(vec![Line::from(keys), Line::from(ctrl)])
        .alignment(Alignment::Center);
    f.render_widget(help, layout.help_area);

    if let Some(prompt) = &view.upload {
        draw_upload_prompt(f, prompt);
    }
    if let Some(pad) = &view.scratchpad {
        draw_scratchpad(f, pad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionId, ImageData};

    fn turn(sender: Sender, text: &str) -> Turn {
        Turn {
            id: 1,
            sender,
            text: text.to_string(),
            image: None,
            actions: Vec::new(),
            requests_work: false,
            is_correct_answer: None,
        }
    }

    fn rendered(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_headers_and_indentation() {
        let lines = transcript_lines(&[
            turn(Sender::Assistant, "Hi! What problem?"),
            turn(Sender::User, "2x = 4"),
        ]);
        let text = rendered(&lines);
        assert_eq!(text[0], "Kellz Math:");
        assert_eq!(text[1], "  Hi! What problem?");
        assert_eq!(text[3], "You:");
        assert_eq!(text[4], "  2x = 4");
    }

    #[test]
    fn test_correct_answer_is_checked() {
        let mut answer = turn(Sender::User, "4");
        answer.is_correct_answer = Some(true);
        let mut wrong = turn(Sender::User, "5");
        wrong.is_correct_answer = Some(false);
        let text = rendered(&transcript_lines(&[answer, wrong]));
        assert_eq!(text[0], "You: ✓");
        assert_eq!(text[3], "You:");
    }

    #[test]
    fn test_work_request_and_image_markers() {
        let mut analysis = turn(Sender::Assistant, "Check your signs.");
        analysis.requests_work = true;
        let mut upload = turn(Sender::User, "Image uploaded: work.png");
        upload.image = Some(ImageData::new("AAAA"));
        let text = rendered(&transcript_lines(&[analysis, upload])).join("\n");
        assert!(text.contains("Upload Picture"));
        assert!(text.contains("Use Digital Scratchpad"));
        assert!(text.contains("[image attached]"));
    }

    #[test]
    fn test_action_buttons_highlight_selection() {
        let mut view = ChatView::new();
        let mut step = turn(Sender::Assistant, "Step one");
        step.actions = vec![ActionId::NextStep.into(), ActionId::CreateLearningPath.into()];
        view.turns.push(step);
        view.selected_action = Some(1);

        let line = action_buttons(&view);
        assert_eq!(line.to_string(), "[ Next Step ]  [ Create Learning Path ]  ");
        assert_eq!(line.spans[2].style.bg, Some(Color::Yellow));
        assert_eq!(line.spans[0].style.bg, None);
    }
}
