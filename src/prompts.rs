//! Prompt templates sent to the model. All functions are pure string
//! interpolation over the session configuration.

use crate::models::{Difficulty, Mode, Rigor, TutorConfig};

pub const QUIZ_LENGTH: usize = 5;

fn base_prompt(difficulty: Difficulty, rigor: Rigor) -> String {
    format!(
        r#"You are "Kellz Math," a friendly, encouraging, and expert math tutor AI.
Your primary goal is to empower users by teaching them the process of solving mathematical problems, not just giving them the final answer.
You are patient, clear, and can break down complex topics into simple, understandable steps.
Your current session is for a {difficulty} level with {rigor} rigor.
Maintain a positive and encouraging tone always."#
    )
}

pub fn greeting_prompt(config: &TutorConfig) -> String {
    let ask = match config.mode {
        Mode::Solver => "Ask the user for the specific problem they want help with. They may type it out or upload a picture of it.",
        Mode::Practice => "Ask the user which topic they would like to practice (for example 'fractions' or 'linear algebra').",
    };

    format!(
        r#"{base}
You are starting a new session. The user has selected {mode} mode.
Provide a brief, welcoming greeting and then ask for the next piece of information you need.
{ask}

Example response for practice mode: "Excellent choice! Let's begin. What topic would you like to practice today?""#,
        base = base_prompt(config.difficulty, config.rigor),
        mode = config.mode,
    )
}

pub fn quiz_prompt(topic: &str, config: &TutorConfig) -> String {
    format!(
        r#"Based on a {difficulty} level and {rigor} rigor, generate a {count}-question quiz on the topic of "{topic}".
The questions should be challenging but appropriate for the selected levels.
Ensure the questions cover a range of concepts within the topic.

Respond ONLY with a JSON array (no markdown, no extra text). Each element must have this shape:
{{
    "question": "the question text",
    "answer": "the correct answer; for multiple choice, just the correct letter or value",
    "options": ["optional", "list", "of", "choices"]
}}
"question" and "answer" are required strings. Keep answers short so they can be compared exactly."#,
        difficulty = config.difficulty,
        rigor = config.rigor,
        count = QUIZ_LENGTH,
    )
}

/// System instruction for the ongoing problem-solving conversation. The
/// transcript itself is sent as the message list.
pub fn next_step_instruction(config: &TutorConfig) -> String {
    format!(
        r#"{base}
You are in an ongoing problem-solving session. The user has provided a math problem, and you are guiding them step-by-step.
- Analyze the entire conversation history to understand the problem and where you left off.
- When the user asks for the "Next Step", provide the single, concise next step in the solution process.
- If the user provides the initial problem, acknowledge it and provide ONLY the very first conceptual step to solve it.
- DO NOT solve the entire problem at once. Your goal is to guide, not to give answers.
- Maintain the conversation flow. Do not re-introduce yourself or forget the context.
- Keep your persona as "Kellz Math" - friendly, encouraging, and an expert tutor."#,
        base = base_prompt(config.difficulty, config.rigor)
    )
}

pub fn learning_path_prompt(problem: &str, config: &TutorConfig) -> String {
    format!(
        r#"{base}
You are an expert curriculum designer. A student needs help understanding the concepts required to solve a specific math problem.

The student's problem is: "{problem}"

Your task is to create a personalized, step-by-step learning path for this student. The path should be tailored to their {difficulty} level with {rigor} rigor.

The learning path should:
1. Start with the most foundational, prerequisite concepts.
2. Logically build up to the concepts directly needed to solve the given problem.
3. Break down the path into clear, numbered steps or bullet points.
4. For each step, briefly explain what the concept is and why it's important for the final problem.
5. Use simple markdown to highlight key topics by wrapping them in double asterisks, like **this**.

Generate the learning path now."#,
        base = base_prompt(config.difficulty, config.rigor),
        difficulty = config.difficulty,
        rigor = config.rigor,
    )
}

pub fn analysis_prompt(
    question: &str,
    user_answer: &str,
    has_image: bool,
    config: &TutorConfig,
) -> String {
    let work = if has_image {
        "An image is attached."
    } else {
        "No image, analyze based on problem and answer."
    };

    format!(
        r#"{base}
The user was trying to solve this problem: "{question}".
Their incorrect answer was: "{user_answer}".
Here is the work they submitted: {work}

Your task is to:
1. Analyze their work to identify the specific conceptual or procedural error.
2. Start your response by thanking them for showing their work.
3. Point out the exact mistake in their work.
4. Briefly explain WHY it's a mistake, referencing the correct rule or concept.
5. Finally, begin the step-by-step guidance to walk them through the correct solution. Provide ONLY the first correct step and then wait for them to respond."#,
        base = base_prompt(config.difficulty, config.rigor),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_configs() -> Vec<TutorConfig> {
        let mut configs = Vec::new();
        for difficulty in Difficulty::ALL {
            for rigor in Rigor::ALL {
                for mode in Mode::ALL {
                    configs.push(TutorConfig {
                        difficulty,
                        rigor,
                        mode,
                    });
                }
            }
        }
        configs
    }

    #[test]
    fn test_every_template_names_difficulty_and_rigor() {
        for config in all_configs() {
            let prompts = [
                greeting_prompt(&config),
                quiz_prompt("fractions", &config),
                next_step_instruction(&config),
                learning_path_prompt("2x + 3 = 7", &config),
                analysis_prompt("What is 2 + 2?", "5", false, &config),
            ];
            for prompt in prompts {
                assert!(prompt.contains(config.difficulty.as_str()), "{}", prompt);
                assert!(prompt.contains(config.rigor.as_str()), "{}", prompt);
            }
        }
    }

    #[test]
    fn test_greeting_wording_depends_on_mode() {
        let solver = TutorConfig {
            difficulty: Difficulty::College,
            rigor: Rigor::Pro,
            mode: Mode::Solver,
        };
        let practice = TutorConfig {
            mode: Mode::Practice,
            ..solver
        };
        assert!(greeting_prompt(&solver).contains("solver mode"));
        assert!(greeting_prompt(&solver).contains("specific problem"));
        assert!(greeting_prompt(&practice).contains("practice mode"));
        assert!(greeting_prompt(&practice).contains("which topic"));
    }

    #[test]
    fn test_quiz_prompt_mentions_topic_and_shape() {
        let config = all_configs()[0];
        let prompt = quiz_prompt("linear equations", &config);
        assert!(prompt.contains("\"linear equations\""));
        assert!(prompt.contains("5-question"));
        assert!(prompt.contains("\"question\""));
        assert!(prompt.contains("\"answer\""));
    }

    #[test]
    fn test_analysis_prompt_reflects_image_presence() {
        let config = all_configs()[0];
        assert!(analysis_prompt("Q", "A", true, &config).contains("An image is attached."));
        assert!(analysis_prompt("Q", "A", false, &config).contains("No image"));
    }

    #[test]
    fn test_learning_path_quotes_problem() {
        let config = all_configs()[0];
        let prompt = learning_path_prompt("solve x^2 = 9", &config);
        assert!(prompt.contains("The student's problem is: \"solve x^2 = 9\""));
    }
}
