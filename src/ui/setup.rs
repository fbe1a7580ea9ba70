use crate::models::Mode;
use crate::setup::{SetupStep, SetupWizard};
use crate::ui::key_hint;
use crate::ui::layout::calculate_setup_chunks;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn step_heading(wizard: &SetupWizard) -> (String, &'static str) {
    match wizard.step() {
        SetupStep::Difficulty => (
            "Step 1 of 3".to_string(),
            "Choose a Difficulty Level",
        ),
        SetupStep::Rigor => (
            format!(
                "Step 2 of 3  |  Selected: {}",
                wizard.difficulty().map(|d| d.as_str()).unwrap_or("-")
            ),
            "Now, pick a level of rigor.",
        ),
        SetupStep::Mode => (
            format!(
                "Step 3 of 3  |  Level: {}  |  Rigor: {}",
                wizard.difficulty().map(|d| d.as_str()).unwrap_or("-"),
                wizard.rigor().map(|r| r.as_str()).unwrap_or("-")
            ),
            "How would you like to start?",
        ),
    }
}

/// `model_label` names the provider and model the session will talk to.
pub fn draw_setup(f: &mut Frame, wizard: &SetupWizard, model_label: &str) {
    let layout = calculate_setup_chunks(f.area());

    let title = Paragraph::new("Welcome to Kellz Math!")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let (progress, question) = step_heading(wizard);
    let items: Vec<ListItem> = wizard
        .choices()
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let text = format!("[{}] {}", i + 1, label);
            let style = if i == wizard.selected() {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(text).style(style)
        })
        .collect();
    let choices = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", question))
            .title_bottom(Line::from(format!(" {} ", progress)).right_aligned())
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(choices, layout.choices_area);

    let detail_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout.detail_area);

    let detail = match wizard.step() {
        SetupStep::Mode => Mode::ALL
            .get(wizard.selected())
            .map(|m| m.description())
            .unwrap_or(""),
        SetupStep::Difficulty => "Pick the level that matches your class.",
        SetupStep::Rigor => "Rigor sets how much detail each explanation carries.",
    };
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" About "));
    f.render_widget(detail, detail_chunks[0]);

    let status = Paragraph::new(vec![Line::from("Tutor model:"), Line::from(model_label)])
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" AI Status "));
    f.render_widget(status, detail_chunks[1]);

    let mut help = key_hint("↑/↓", " Navigate  ");
    help.extend(key_hint("1-4", " Pick  "));
    help.extend(key_hint("Enter", " Confirm  "));
    help.extend(key_hint("Ctrl+C", " Exit"));
    f.render_widget(
        Paragraph::new(Line::from(help)).alignment(Alignment::Center),
        layout.help_area,
    );
}
