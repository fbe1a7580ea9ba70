use crate::ai::gateway::{GatewayError, OutputSchema};
use crate::models::QuizQuestion;
use serde_json::json;

/// Reply shape requested for quiz generation: an array of questions, each
/// with required `question` and `answer` strings and optional `options`.
pub fn quiz_schema() -> OutputSchema {
    OutputSchema {
        name: "quiz".to_string(),
        schema: json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "question": { "type": "string" },
                    "answer": { "type": "string" },
                    "options": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["question", "answer"]
            }
        }),
    }
}

/// Strips Markdown fences and surrounding prose, keeping the outermost JSON
/// array.
pub fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    if let Some(start) = cleaned.find('[')
        && let Some(end) = cleaned.rfind(']')
        && start < end
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

/// Parses the quiz-generation reply. An empty list or a question with a blank
/// answer counts as a parse failure.
pub fn parse_quiz(response: &str) -> Result<Vec<QuizQuestion>, GatewayError> {
    let cleaned = clean_json_response(response);
    let questions: Vec<QuizQuestion> = serde_json::from_str(&cleaned).map_err(|e| {
        GatewayError::InvalidOutput(format!(
            "quiz JSON: {}\nRaw: {}\nCleaned: {}",
            e, response, cleaned
        ))
    })?;

    if questions.is_empty() {
        return Err(GatewayError::InvalidOutput("quiz has no questions".to_string()));
    }

    if let Some(bad) = questions
        .iter()
        .position(|q| q.question.trim().is_empty() || q.answer.trim().is_empty())
    {
        return Err(GatewayError::InvalidOutput(format!(
            "quiz question {} is missing text or answer",
            bad + 1
        )));
    }

    Ok(questions)
}
