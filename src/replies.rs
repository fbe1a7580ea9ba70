//! Literal assistant lines: fallbacks used when the model call fails, and
//! the fixed messages of the quiz and solver flows.

use crate::models::{Mode, QuizQuestion};

pub const STEP_FALLBACK: &str =
    "I'm sorry, I encountered an error. Could you please try that again?";
pub const LEARNING_PATH_FALLBACK: &str = "I'm sorry, I had trouble creating a learning path for that problem. Let's try focusing on the next step instead.";
pub const ANALYSIS_FALLBACK: &str = "I'm having trouble analyzing the work, but let's walk through the problem together. What is the first step?";
pub const MISSING_PROBLEM: &str =
    "I'm sorry, I don't seem to have the original problem. Could you please provide it again?";

pub const CORRECT_NEXT: &str = "That's correct! Great job. Here's the next one.";
pub const CORRECT_COMPLETE: &str = "You've completed the quiz! Excellent work.";
pub const WRONG_COMPLETE: &str = "That was the last question! You've completed the quiz.";
pub const PRACTICE_AGAIN: &str = "Great! What topic would you like to practice today?";

pub const UPLOAD_TEXT_PREFIX: &str = "Image uploaded: ";
pub const SCRATCHPAD_TEXT: &str = "Here's my work from the scratchpad.";

pub fn greeting_fallback(mode: Mode) -> String {
    let wanted = match mode {
        Mode::Practice => "topic",
        Mode::Solver => "problem",
    };
    format!(
        "I'm sorry, I'm having a little trouble starting. Let's try again. What {} would you like to work on?",
        wanted
    )
}

pub fn generating_quiz(topic: &str, count: usize) -> String {
    format!(
        "Excellent choice! Generating a {}-question quiz on \"{}\" for you now...",
        count, topic
    )
}

pub fn fallback_quiz(topic: &str) -> Vec<QuizQuestion> {
    vec![
        QuizQuestion::new(
            format!("What is 2 + 2? (Error generating quiz for {})", topic),
            "4",
        ),
        QuizQuestion::new("What is 5 * 5?", "25"),
    ]
}

pub fn present_question(number: usize, total: usize, question: &QuizQuestion) -> String {
    let mut text = format!("Question {} of {}:\n\n{}", number, total, question.question);
    if let Some(options) = &question.options {
        text.push('\n');
        for (i, option) in options.iter().enumerate() {
            let letter = (b'A' + (i % 26) as u8) as char;
            text.push_str(&format!("\n{}. {}", letter, option));
        }
    }
    text
}

pub fn upload_text(file_name: &str) -> String {
    format!("{}{}", UPLOAD_TEXT_PREFIX, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_quiz_literal_questions() {
        let quiz = fallback_quiz("fractions");
        assert_eq!(quiz.len(), 2);
        assert_eq!(
            quiz[0].question,
            "What is 2 + 2? (Error generating quiz for fractions)"
        );
        assert_eq!(quiz[0].answer, "4");
        assert_eq!(quiz[1].question, "What is 5 * 5?");
        assert_eq!(quiz[1].answer, "25");
    }

    #[test]
    fn test_greeting_fallback_names_what_is_missing() {
        assert!(greeting_fallback(Mode::Practice).contains("What topic"));
        assert!(greeting_fallback(Mode::Solver).contains("What problem"));
    }

    #[test]
    fn test_present_question_with_options() {
        let question = QuizQuestion {
            question: "Which is prime?".to_string(),
            answer: "B".to_string(),
            options: Some(vec!["4".to_string(), "7".to_string()]),
        };
        let text = present_question(2, 5, &question);
        assert_eq!(text, "Question 2 of 5:\n\nWhich is prime?\n\nA. 4\nB. 7");
    }

    #[test]
    fn test_present_question_plain() {
        let text = present_question(1, 2, &QuizQuestion::new("What is 5 * 5?", "25"));
        assert_eq!(text, "Question 1 of 2:\n\nWhat is 5 * 5?");
    }
}
