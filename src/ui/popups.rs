use crate::models::UploadPrompt;
use crate::ui::key_hint;
use crate::utils::calculate_wrapped_cursor_position;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit Kellz Math")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("End this session? The conversation is not saved.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Quit)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Keep Learning)"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

/// Path prompt for attaching a picture of the student's work.
pub fn draw_upload_prompt(f: &mut Frame, prompt: &UploadPrompt) {
    let area = centered_rect(70, 40, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let input = Paragraph::new(prompt.path_buffer.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Upload Picture: image path ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(input, chunks[0]);

    let width = chunks[0].width.saturating_sub(2) as usize;
    let (_, cursor_col) =
        calculate_wrapped_cursor_position(&prompt.path_buffer, prompt.cursor_position, usize::MAX);
    let cursor_x = chunks[0].x + 1 + cursor_col.min(width) as u16;
    f.set_cursor_position((cursor_x, chunks[0].y + 1));

    let status = match &prompt.error {
        Some(error) => Paragraph::new(Span::styled(
            format!("Could not load image: {}", error),
            Style::default().fg(Color::Red),
        )),
        None => Paragraph::new(Span::styled(
            "PNG, JPEG or WebP. A leading ~ expands to your home directory.",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(
        status
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)),
        chunks[1],
    );

    let mut help = key_hint("Enter", " Upload  ");
    help.extend(key_hint("Esc", " Cancel"));
    let help = Paragraph::new(Line::from(help)).alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
}
