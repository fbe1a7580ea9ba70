use crate::models::QuizQuestion;

/// Trimmed, case-insensitive string equality.
pub fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current_index: usize,
    answers: Vec<String>,
}

/// Outcome of submitting an answer to the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub question: QuizQuestion,
    pub correct: bool,
    /// The question to present next, if any remain.
    pub next: Option<(usize, QuizQuestion)>,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current_index: 0,
            answers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| answers_match(a, &q.answer))
            .count()
    }

    /// Records the answer, grades it and advances the cursor. Right or
    /// wrong, the cursor always moves forward by one. Returns `None` once the
    /// quiz is already complete.
    pub fn submit(&mut self, answer: &str) -> Option<Grade> {
        let question = self.current()?.clone();
        let correct = answers_match(answer, &question.answer);
        self.answers.push(answer.to_string());
        self.current_index += 1;

        let next = self
            .current()
            .cloned()
            .map(|q| (self.current_index + 1, q));

        Some(Grade {
            question,
            correct,
            next,
        })
    }
}

/// Practice-mode state.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizPhase {
    AwaitingTopic,
    InProgress(QuizSession),
    Complete(QuizSession),
}

impl QuizPhase {
    pub fn is_awaiting_topic(&self) -> bool {
        matches!(self, QuizPhase::AwaitingTopic)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, QuizPhase::InProgress(_))
    }
}
