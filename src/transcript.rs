use crate::models::{ImageData, Sender, Turn, TurnAction};

/// Append-only conversation store. Turn ids come from a counter so that
/// replaying the same inputs yields the same transcript.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_id: u64,
}

/// Optional turn fields, filled by the caller before appending.
#[derive(Debug, Default, Clone)]
pub struct TurnExtras {
    pub image: Option<ImageData>,
    pub actions: Vec<TurnAction>,
    pub requests_work: bool,
    pub is_correct_answer: Option<bool>,
}

impl TurnExtras {
    pub fn with_image(image: Option<ImageData>) -> Self {
        Self {
            image,
            ..Default::default()
        }
    }

    pub fn with_actions(actions: Vec<TurnAction>) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            next_id: 1,
        }
    }

    pub fn append(&mut self, sender: Sender, text: impl Into<String>, extras: TurnExtras) -> &Turn {
        let turn = Turn {
            id: self.next_id,
            sender,
            text: text.into(),
            image: extras.image,
            actions: extras.actions,
            requests_work: extras.requests_work,
            is_correct_answer: extras.is_correct_answer,
        };
        self.next_id += 1;
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}
