use crate::attachment::{file_name, load_image_file, resolve_path};
use crate::models::{AppState, ChatView, TutorCommand, TutorConfig, UploadPrompt};
use crate::replies;
use crate::scratchpad::{Direction, Scratchpad};
use crate::setup::SetupWizard;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn prev_boundary(s: &str, index: usize) -> usize {
    s[..index]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_boundary(s: &str, index: usize) -> usize {
    s[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(index)
}

/// Applies a line-editing key to `buffer`; returns false for keys it does
/// not handle.
fn edit_line(buffer: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    *cursor = (*cursor).min(buffer.len());
    match key.code {
        KeyCode::Left => {
            *cursor = prev_boundary(buffer, *cursor);
        }
        KeyCode::Right => {
            *cursor = next_boundary(buffer, *cursor);
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Backspace => {
            if *cursor > 0 {
                let start = prev_boundary(buffer, *cursor);
                buffer.replace_range(start..*cursor, "");
                *cursor = start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let end = next_boundary(buffer, *cursor);
                buffer.replace_range(*cursor..end, "");
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            buffer.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => return false,
    }
    true
}

pub fn handle_setup_input(wizard: &mut SetupWizard, key: KeyEvent) -> Option<TutorConfig> {
    match key.code {
        KeyCode::Up | KeyCode::Left => {
            wizard.select_previous();
            None
        }
        KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
            wizard.select_next();
            None
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let index = c.to_digit(10).unwrap_or(0) as usize;
            if index > 0 {
                wizard.select(index - 1);
            }
            None
        }
        KeyCode::Enter => wizard.confirm(),
        _ => None,
    }
}

pub fn handle_quit_confirm_input(key: KeyEvent, app_state: &mut AppState) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            *app_state = AppState::Chat;
            false
        }
        _ => false,
    }
}

fn handle_upload_input(view: &mut ChatView, key: KeyEvent) -> Option<TutorCommand> {
    let prompt = view.upload.as_mut()?;
    match key.code {
        KeyCode::Esc => {
            view.upload = None;
            None
        }
        KeyCode::Enter => {
            if prompt.path_buffer.trim().is_empty() {
                return None;
            }
            let path = resolve_path(&prompt.path_buffer);
            match load_image_file(&path) {
                Ok(image) => {
                    view.upload = None;
                    Some(TutorCommand::SendMessage {
                        text: replies::upload_text(&file_name(&path)),
                        image: Some(image),
                    })
                }
                Err(e) => {
                    log::warn!("Upload of {} failed: {}", path.display(), e);
                    prompt.error = Some(e.to_string());
                    None
                }
            }
        }
        _ => {
            if edit_line(&mut prompt.path_buffer, &mut prompt.cursor_position, key) {
                prompt.error = None;
            }
            None
        }
    }
}

fn handle_scratchpad_input(view: &mut ChatView, key: KeyEvent) -> Option<TutorCommand> {
    let pad = view.scratchpad.as_mut()?;
    match key.code {
        KeyCode::Esc => view.scratchpad = None,
        KeyCode::Up => pad.move_cursor(Direction::Up),
        KeyCode::Down => pad.move_cursor(Direction::Down),
        KeyCode::Left => pad.move_cursor(Direction::Left),
        KeyCode::Right => pad.move_cursor(Direction::Right),
        KeyCode::Char(' ') => pad.toggle_pen(),
        KeyCode::Char('c') => pad.clear(),
        KeyCode::Enter => match pad.export_png() {
            Ok(image) => {
                view.scratchpad = None;
                return Some(TutorCommand::SendMessage {
                    text: replies::SCRATCHPAD_TEXT.to_string(),
                    image: Some(image),
                });
            }
            Err(e) => log::error!("Scratchpad export failed: {}", e),
        },
        _ => {}
    }
    None
}

/// Maps a key press in the chat view to at most one tutor command.
/// The input line, submissions and actions are inert while a request is
/// outstanding; scrolling still works. Returning a command marks the view
/// busy until the worker reports idle.
pub fn handle_chat_input(
    view: &mut ChatView,
    key: KeyEvent,
    app_state: &mut AppState,
) -> Option<TutorCommand> {
    let command = route_chat_key(view, key, app_state);
    if command.is_some() {
        view.busy = true;
        view.selected_action = None;
    }
    command
}

fn route_chat_key(
    view: &mut ChatView,
    key: KeyEvent,
    app_state: &mut AppState,
) -> Option<TutorCommand> {
    if view.scratchpad.is_some() {
        return handle_scratchpad_input(view, key);
    }
    if view.upload.is_some() {
        return handle_upload_input(view, key);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            if view.selected_action.is_some() {
                view.selected_action = None;
            } else {
                *app_state = AppState::QuitConfirm;
            }
            None
        }
        KeyCode::Char('u') if ctrl => {
            if !view.busy {
                view.upload = Some(UploadPrompt::default());
            }
            None
        }
        KeyCode::Char('d') if ctrl => {
            if !view.busy {
                view.scratchpad = Some(Scratchpad::default());
            }
            None
        }
        KeyCode::Tab | KeyCode::BackTab => {
            let count = view.active_actions().len();
            if count == 0 || view.busy {
                view.selected_action = None;
                return None;
            }
            view.selected_action = Some(match (view.selected_action, key.code) {
                (None, KeyCode::BackTab) => count - 1,
                (None, _) => 0,
                (Some(i), KeyCode::BackTab) => (i + count - 1) % count,
                (Some(i), _) => (i + 1) % count,
            });
            None
        }
        KeyCode::Enter => {
            if view.busy {
                return None;
            }
            if let Some(index) = view.selected_action.take() {
                return view
                    .active_actions()
                    .get(index)
                    .map(|action| TutorCommand::Action(action.id));
            }
            let text = view.input_buffer.trim().to_string();
            if text.is_empty() {
                return None;
            }
            view.input_buffer.clear();
            view.cursor_position = 0;
            Some(TutorCommand::SendMessage { text, image: None })
        }
        KeyCode::Up => {
            view.follow_tail = false;
            view.scroll_y = view.scroll_y.saturating_sub(1);
            None
        }
        KeyCode::Down => {
            view.scroll_y = view.scroll_y.saturating_add(1).min(view.max_scroll);
            view.follow_tail = view.scroll_y >= view.max_scroll;
            None
        }
        KeyCode::PageUp => {
            view.follow_tail = false;
            view.scroll_y = view.scroll_y.saturating_sub(10);
            None
        }
        KeyCode::PageDown => {
            view.scroll_y = view.scroll_y.saturating_add(10).min(view.max_scroll);
            view.follow_tail = view.scroll_y >= view.max_scroll;
            None
        }
        _ => {
            if !view.busy && edit_line(&mut view.input_buffer, &mut view.cursor_position, key) {
                view.selected_action = None;
            }
            None
        }
    }
}
