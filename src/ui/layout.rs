use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct ChatLayout {
    pub header_area: Rect,
    pub transcript_area: Rect,
    pub actions_area: Rect,
    pub input_area: Rect,
    pub help_area: Rect,
}

pub struct SetupLayout {
    pub header_area: Rect,
    pub choices_area: Rect,
    pub detail_area: Rect,
    pub help_area: Rect,
}

/// The actions row collapses when the latest reply offers nothing to click.
pub fn calculate_chat_chunks(area: Rect, has_actions: bool) -> ChatLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(if has_actions { 3 } else { 0 }),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    ChatLayout {
        header_area: chunks[0],
        transcript_area: chunks[1],
        actions_area: chunks[2],
        input_area: chunks[3],
        help_area: chunks[4],
    }
}

pub fn calculate_setup_chunks(area: Rect) -> SetupLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(area);

    SetupLayout {
        header_area: chunks[0],
        choices_area: chunks[1],
        detail_area: chunks[2],
        help_area: chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_layout_with_actions() {
        let layout = calculate_chat_chunks(Rect::new(0, 0, 100, 40), true);
        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.actions_area.height, 3);
        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.help_area.height, 2);
        // 38 rows inside the margin, 11 of them fixed
        assert_eq!(layout.transcript_area.height, 27);
    }

    #[test]
    fn test_chat_layout_without_actions_gives_rows_to_transcript() {
        let layout = calculate_chat_chunks(Rect::new(0, 0, 100, 40), false);
        assert_eq!(layout.actions_area.height, 0);
        assert_eq!(layout.transcript_area.height, 30);
    }

    #[test]
    fn test_setup_layout() {
        let layout = calculate_setup_chunks(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.detail_area.height, 4);
        assert_eq!(layout.help_area.height, 2);
        assert_eq!(layout.choices_area.height, 28 - 9);
    }
}
