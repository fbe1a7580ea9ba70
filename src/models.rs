use crate::scratchpad::Scratchpad;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Elementary,
    MiddleSchool,
    HighSchool,
    College,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Elementary,
        Difficulty::MiddleSchool,
        Difficulty::HighSchool,
        Difficulty::College,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Elementary => "Elementary",
            Difficulty::MiddleSchool => "Middle School",
            Difficulty::HighSchool => "High School",
            Difficulty::College => "College",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explanatory depth, independent of the difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rigor {
    Novice,
    Intermediate,
    Pro,
}

impl Rigor {
    pub const ALL: [Rigor; 3] = [Rigor::Novice, Rigor::Intermediate, Rigor::Pro];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rigor::Novice => "Novice",
            Rigor::Intermediate => "Intermediate",
            Rigor::Pro => "Pro",
        }
    }
}

impl fmt::Display for Rigor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Solver,
    Practice,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Solver, Mode::Practice];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Solver => "solver",
            Mode::Practice => "practice",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Solver => "Solve a Problem",
            Mode::Practice => "Practice a Topic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Mode::Solver => "Get step-by-step help",
            Mode::Practice => "Take a short quiz",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session configuration chosen in the setup wizard. Never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorConfig {
    pub difficulty: Difficulty,
    pub rigor: Rigor,
    pub mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    NextStep,
    CreateLearningPath,
    PracticeAgain,
}

impl ActionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::NextStep => "next_step",
            ActionId::CreateLearningPath => "create_learning_path",
            ActionId::PracticeAgain => "practice_again",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "next_step" => Some(ActionId::NextStep),
            "create_learning_path" => Some(ActionId::CreateLearningPath),
            "practice_again" => Some(ActionId::PracticeAgain),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionId::NextStep => "Next Step",
            ActionId::CreateLearningPath => "Create Learning Path",
            ActionId::PracticeAgain => "Practice another topic",
        }
    }
}

/// A follow-up button offered on an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnAction {
    pub label: String,
    pub id: ActionId,
}

impl From<ActionId> for TurnAction {
    fn from(id: ActionId) -> Self {
        Self {
            label: id.label().to_string(),
            id,
        }
    }
}

/// Base64-encoded PNG attached to a user turn.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub base64: String,
}

impl ImageData {
    pub const MIME_TYPE: &'static str = "image/png";

    pub fn new(base64: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", Self::MIME_TYPE, self.base64)
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageData({} bytes base64)", self.base64.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub image: Option<ImageData>,
    pub actions: Vec<TurnAction>,
    pub requests_work: bool,
    pub is_correct_answer: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl QuizQuestion {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            options: None,
        }
    }
}

#[derive(Debug)]
pub enum TutorCommand {
    Start,
    SendMessage {
        text: String,
        image: Option<ImageData>,
    },
    Action(ActionId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TutorEvent {
    TurnAppended(Turn),
    Busy(bool),
    /// A quiz answer was correct; the UI plays its audio cue.
    Chime,
}

/// Upload prompt shown over the chat view.
#[derive(Debug, Default)]
pub struct UploadPrompt {
    pub path_buffer: String,
    pub cursor_position: usize,
    pub error: Option<String>,
}

/// UI-side mirror of the conversation plus the input line state.
#[derive(Debug, Default)]
pub struct ChatView {
    pub turns: Vec<Turn>,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub scroll_y: u16,
    pub max_scroll: u16,
    pub follow_tail: bool,
    pub busy: bool,
    pub selected_action: Option<usize>,
    pub upload: Option<UploadPrompt>,
    pub scratchpad: Option<Scratchpad>,
    pub pending_chimes: usize,
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            follow_tail: true,
            ..Default::default()
        }
    }

    /// Actions of the most recent assistant turn that offers any.
    pub fn active_actions(&self) -> &[TurnAction] {
        self.turns
            .iter()
            .rev()
            .find(|t| t.sender == Sender::Assistant && !t.actions.is_empty())
            .map(|t| t.actions.as_slice())
            .unwrap_or(&[])
    }

    pub fn apply_event(&mut self, event: TutorEvent) {
        match event {
            TutorEvent::TurnAppended(turn) => {
                self.turns.push(turn);
                self.selected_action = None;
                self.follow_tail = true;
            }
            TutorEvent::Busy(busy) => self.busy = busy,
            TutorEvent::Chime => self.pending_chimes += 1,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Setup,
    Chat,
    QuitConfirm,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant_turn(id: u64, actions: Vec<TurnAction>) -> Turn {
        Turn {
            id,
            sender: Sender::Assistant,
            text: format!("turn {}", id),
            image: None,
            actions,
            requests_work: false,
            is_correct_answer: None,
        }
    }

    #[test]
    fn test_action_id_roundtrip() {
        for id in [
            ActionId::NextStep,
            ActionId::CreateLearningPath,
            ActionId::PracticeAgain,
        ] {
            assert_eq!(ActionId::parse(id.as_str()), Some(id));
        }
        assert_eq!(ActionId::parse("unknown"), None);
    }

    #[test]
    fn test_enum_labels_match_display() {
        assert_eq!(Difficulty::MiddleSchool.to_string(), "Middle School");
        assert_eq!(Rigor::Pro.to_string(), "Pro");
        assert_eq!(Mode::Practice.to_string(), "practice");
    }

    #[test]
    fn test_image_data_url_uses_png_mime() {
        let image = ImageData::new("abc=");
        assert_eq!(image.data_url(), "data:image/png;base64,abc=");
    }

    #[test]
    fn test_active_actions_come_from_latest_actionable_turn() {
        let mut view = ChatView::new();
        view.apply_event(TutorEvent::TurnAppended(assistant_turn(
            1,
            vec![ActionId::NextStep.into()],
        )));
        view.apply_event(TutorEvent::TurnAppended(assistant_turn(
            2,
            vec![ActionId::PracticeAgain.into()],
        )));
        view.apply_event(TutorEvent::TurnAppended(assistant_turn(3, vec![])));

        let actions = view.active_actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, ActionId::PracticeAgain);
    }

    #[test]
    fn test_apply_event_tracks_busy_and_chimes() {
        let mut view = ChatView::new();
        view.apply_event(TutorEvent::Busy(true));
        assert!(view.busy);
        view.apply_event(TutorEvent::Chime);
        view.apply_event(TutorEvent::Chime);
        assert_eq!(view.pending_chimes, 2);
        view.apply_event(TutorEvent::Busy(false));
        assert!(!view.busy);
    }
}
