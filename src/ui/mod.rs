mod chat;
pub mod layout;
mod popups;
mod scratchpad;
mod setup;

pub use chat::{draw_chat, transcript_lines};
pub use layout::{calculate_chat_chunks, calculate_setup_chunks};
pub use popups::{draw_quit_confirmation, draw_upload_prompt};
pub use scratchpad::draw_scratchpad;
pub use setup::draw_setup;

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

/// A bold cyan key name followed by its description, as used in help lines.
pub(crate) fn key_hint(key: &'static str, label: &'static str) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(label),
    ]
}
