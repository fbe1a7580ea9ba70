use crate::models::{Difficulty, Mode, Rigor, TutorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Difficulty,
    Rigor,
    Mode,
}

/// Three-screen linear wizard. Each confirmed choice moves one step
/// forward; the last one yields the finished configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupWizard {
    step: SetupStep,
    selected: usize,
    difficulty: Option<Difficulty>,
    rigor: Option<Rigor>,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        Self {
            step: SetupStep::Difficulty,
            selected: 0,
            difficulty: None,
            rigor: None,
        }
    }

    pub fn step(&self) -> SetupStep {
        self.step
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn rigor(&self) -> Option<Rigor> {
        self.rigor
    }

    /// Labels shown for the current step.
    pub fn choices(&self) -> Vec<&'static str> {
        match self.step {
            SetupStep::Difficulty => Difficulty::ALL.iter().map(|d| d.as_str()).collect(),
            SetupStep::Rigor => Rigor::ALL.iter().map(|r| r.as_str()).collect(),
            SetupStep::Mode => Mode::ALL.iter().map(|m| m.label()).collect(),
        }
    }

    pub fn select_next(&mut self) {
        let last = self.choices().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(last);
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Jumps straight to a choice; out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.choices().len() {
            self.selected = index;
        }
    }

    /// Confirms the highlighted choice. Returns the configuration once the
    /// mode has been chosen.
    pub fn confirm(&mut self) -> Option<TutorConfig> {
        match self.step {
            SetupStep::Difficulty => {
                self.difficulty = Difficulty::ALL.get(self.selected).copied();
                self.step = SetupStep::Rigor;
                self.selected = 0;
                None
            }
            SetupStep::Rigor => {
                self.rigor = Rigor::ALL.get(self.selected).copied();
                self.step = SetupStep::Mode;
                self.selected = 0;
                None
            }
            SetupStep::Mode => {
                let mode = Mode::ALL.get(self.selected).copied()?;
                Some(TutorConfig {
                    difficulty: self.difficulty?,
                    rigor: self.rigor?,
                    mode,
                })
            }
        }
    }
}
