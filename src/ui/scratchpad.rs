use crate::scratchpad::Scratchpad;
use crate::ui::key_hint;
use crate::ui::popups::centered_rect;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const INK: &str = "█";
const PAPER: &str = "·";

/// One line per grid row. The cursor cell shows `+` with the pen up and a
/// highlighted block with the pen down.
pub fn scratchpad_lines(pad: &Scratchpad) -> Vec<Line<'static>> {
    let (cx, cy) = pad.cursor();
    (0..pad.height())
        .map(|y| {
            let spans: Vec<Span<'static>> = (0..pad.width())
                .map(|x| {
                    let inked = pad.is_inked(x, y);
                    if (x, y) == (cx, cy) {
                        let style = Style::default().fg(Color::Red);
                        if pad.is_pen_down() {
                            Span::styled(INK, style)
                        } else {
                            Span::styled("+", style)
                        }
                    } else if inked {
                        Span::styled(INK, Style::default().fg(Color::White))
                    } else {
                        Span::styled(PAPER, Style::default().fg(Color::DarkGray))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

pub fn draw_scratchpad(f: &mut Frame, pad: &Scratchpad) {
    let area = centered_rect(90, 80, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let pen = if pad.is_pen_down() { "down" } else { "up" };
    let grid = Paragraph::new(scratchpad_lines(pad)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Digital Scratchpad (pen {}) ", pen))
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(grid, chunks[0]);

    let mut help = key_hint("Arrows", " Move  ");
    help.extend(key_hint("Space", " Pen up/down  "));
    help.extend(key_hint("c", " Clear  "));
    help.extend(key_hint("Enter", " Submit Work  "));
    help.extend(key_hint("Esc", " Cancel"));
    f.render_widget(
        Paragraph::new(Line::from(help)).alignment(Alignment::Center),
        chunks[1],
    );
}
