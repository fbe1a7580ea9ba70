use crate::ai::{GatewayError, GatewayRequest, ModelGateway, parse_quiz, quiz_schema};
use crate::models::{
    ActionId, ImageData, Mode, QuizQuestion, Sender, Turn, TutorConfig, TutorEvent,
};
use crate::prompts::{self, QUIZ_LENGTH};
use crate::quiz::{QuizPhase, QuizSession};
use crate::replies;
use crate::transcript::{Transcript, TurnExtras};
use std::time::Duration;
use tokio::sync::mpsc;

/// Owns the whole conversation: configuration, transcript, quiz state and
/// the remembered problem. Every mutation happens in response to one user
/// input or one completed model call.
pub struct Tutor {
    config: TutorConfig,
    gateway: Box<dyn ModelGateway>,
    transcript: Transcript,
    quiz: QuizPhase,
    problem: Option<String>,
    feedback_delay: Duration,
    events: Option<mpsc::UnboundedSender<TutorEvent>>,
}

impl Tutor {
    pub fn new(config: TutorConfig, gateway: Box<dyn ModelGateway>) -> Self {
        Self {
            config,
            gateway,
            transcript: Transcript::new(),
            quiz: QuizPhase::AwaitingTopic,
            problem: None,
            feedback_delay: Duration::from_millis(crate::config::DEFAULT_FEEDBACK_DELAY_MS),
            events: None,
        }
    }

    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    /// Every appended turn and chime is also sent to `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<TutorEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    pub fn turns(&self) -> &[Turn] {
        self.transcript.turns()
    }

    pub fn quiz(&self) -> &QuizPhase {
        &self.quiz
    }

    pub fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    fn emit(&self, event: TutorEvent) {
        if let Some(events) = &self.events {
            // The UI may already be gone on shutdown.
            let _ = events.send(event);
        }
    }

    fn append(&mut self, sender: Sender, text: impl Into<String>, extras: TurnExtras) {
        let turn = self.transcript.append(sender, text, extras).clone();
        self.emit(TutorEvent::TurnAppended(turn));
    }

    fn say(&mut self, text: impl Into<String>) {
        self.append(Sender::Assistant, text, TurnExtras::default());
    }

    fn say_with_actions(&mut self, text: impl Into<String>, actions: &[ActionId]) {
        let actions = actions.iter().map(|a| (*a).into()).collect();
        self.append(Sender::Assistant, text, TurnExtras::with_actions(actions));
    }

    async fn call(&self, request: GatewayRequest, site: &str) -> Result<String, GatewayError> {
        log::info!("Requesting {} from {}", site, self.gateway.name());
        let result = self.gateway.complete(request).await;
        match &result {
            Ok(text) => log::debug!("{} reply ({} chars)", site, text.len()),
            Err(e) => log::warn!("{} failed: {}", site, e),
        }
        result
    }

    /// Requests the mode-specific greeting and appends it as the first turn.
    pub async fn start(&mut self) {
        let request = GatewayRequest::prompt(prompts::greeting_prompt(&self.config));
        let greeting = self
            .call(request, "greeting")
            .await
            .unwrap_or_else(|_| replies::greeting_fallback(self.config.mode));
        self.say(greeting);
    }

    /// Handles one submitted message; `image` is the attached work, if any.
    pub async fn send_message(&mut self, text: &str, image: Option<ImageData>) {
        if self.config.mode == Mode::Practice {
            if self.quiz.is_awaiting_topic() {
                self.append(Sender::User, text, TurnExtras::default());
                self.start_quiz(text).await;
                return;
            }
            if self.quiz.is_in_progress() {
                self.answer_question(text, image).await;
                return;
            }
        }

        if self.config.mode == Mode::Solver && self.problem.is_none() {
            log::info!("Remembering problem: {}", text);
            self.problem = Some(text.to_string());
        }
        self.append(Sender::User, text, TurnExtras::with_image(image));
        self.reply_with_next_step().await;
    }

    /// Handles a click on one of the follow-up buttons.
    pub async fn handle_action(&mut self, action: ActionId) {
        self.append(Sender::User, action.label(), TurnExtras::default());

        match action {
            ActionId::PracticeAgain => {
                self.quiz = QuizPhase::AwaitingTopic;
                self.say(replies::PRACTICE_AGAIN);
            }
            ActionId::NextStep => self.reply_with_next_step().await,
            ActionId::CreateLearningPath => match self.problem.clone() {
                Some(problem) => {
                    let request = GatewayRequest::prompt(prompts::learning_path_prompt(
                        &problem,
                        &self.config,
                    ));
                    let path = self
                        .call(request, "learning path")
                        .await
                        .unwrap_or_else(|_| replies::LEARNING_PATH_FALLBACK.to_string());
                    self.say_with_actions(path, &[ActionId::NextStep]);
                }
                None => self.say(replies::MISSING_PROBLEM),
            },
        }
    }

    async fn reply_with_next_step(&mut self) {
        let request = GatewayRequest::conversation(
            prompts::next_step_instruction(&self.config),
            self.transcript.turns(),
        );
        let reply = self
            .call(request, "next step")
            .await
            .unwrap_or_else(|_| replies::STEP_FALLBACK.to_string());

        match self.config.mode {
            Mode::Solver => {
                self.say_with_actions(reply, &[ActionId::NextStep, ActionId::CreateLearningPath])
            }
            Mode::Practice => self.say(reply),
        }
    }

    async fn generate_quiz(&self, topic: &str) -> Vec<QuizQuestion> {
        let request = GatewayRequest::prompt(prompts::quiz_prompt(topic, &self.config))
            .with_schema(quiz_schema());
        let parsed = match self.call(request, "quiz").await {
            Ok(reply) => parse_quiz(&reply),
            Err(e) => Err(e),
        };
        match parsed {
            Ok(questions) => questions,
            Err(e) => {
                log::warn!("Using placeholder quiz for '{}': {}", topic, e);
                replies::fallback_quiz(topic)
            }
        }
    }

    async fn start_quiz(&mut self, topic: &str) {
        self.say(replies::generating_quiz(topic, QUIZ_LENGTH));
        let questions = self.generate_quiz(topic).await;
        let session = QuizSession::new(questions);
        if let Some(first) = session.current() {
            let text = replies::present_question(1, session.len(), first);
            self.quiz = QuizPhase::InProgress(session);
            self.say(text);
        }
    }

    async fn answer_question(&mut self, answer: &str, image: Option<ImageData>) {
        let QuizPhase::InProgress(mut session) =
            std::mem::replace(&mut self.quiz, QuizPhase::AwaitingTopic)
        else {
            return;
        };
        let Some(grade) = session.submit(answer) else {
            self.quiz = QuizPhase::Complete(session);
            return;
        };
        let total = session.len();
        let has_image = image.is_some();
        log::info!(
            "Answer to question {}/{} is {}",
            session.current_index(),
            total,
            if grade.correct { "correct" } else { "incorrect" }
        );

        self.append(
            Sender::User,
            answer,
            TurnExtras {
                image: image.clone(),
                is_correct_answer: Some(grade.correct),
                ..Default::default()
            },
        );

        if grade.correct {
            self.emit(TutorEvent::Chime);
            match grade.next {
                Some((number, next)) => {
                    self.quiz = QuizPhase::InProgress(session);
                    self.say(replies::CORRECT_NEXT);
                    self.say(replies::present_question(number, total, &next));
                }
                None => {
                    self.quiz = QuizPhase::Complete(session);
                    self.say_with_actions(replies::CORRECT_COMPLETE, &[ActionId::PracticeAgain]);
                }
            }
            return;
        }

        let request = GatewayRequest::prompt_with_image(
            prompts::analysis_prompt(&grade.question.question, answer, has_image, &self.config),
            image,
        );
        let analysis = self
            .call(request, "analysis")
            .await
            .unwrap_or_else(|_| replies::ANALYSIS_FALLBACK.to_string());
        self.append(
            Sender::Assistant,
            analysis,
            TurnExtras {
                requests_work: !has_image,
                ..Default::default()
            },
        );

        match grade.next {
            Some((number, next)) => {
                self.quiz = QuizPhase::InProgress(session);
                if !self.feedback_delay.is_zero() {
                    tokio::time::sleep(self.feedback_delay).await;
                }
                self.say(replies::present_question(number, total, &next));
            }
            None => {
                self.quiz = QuizPhase::Complete(session);
                self.say_with_actions(replies::WRONG_COMPLETE, &[ActionId::PracticeAgain]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gateway::stub::StubGateway;
    use crate::ai::{ContentPart, MessageRole};
    use crate::models::{Difficulty, Rigor};
    use std::sync::Arc;

    /// Lets a test keep a handle on the stub after handing it to the tutor.
    struct Shared(Arc<StubGateway>);

    #[async_trait::async_trait]
    impl ModelGateway for Shared {
        fn name(&self) -> &str {
            "shared-stub"
        }

        async fn complete(&self, request: GatewayRequest) -> Result<String, GatewayError> {
            self.0.complete(request).await
        }
    }

    fn config(mode: Mode) -> TutorConfig {
        TutorConfig {
            difficulty: Difficulty::MiddleSchool,
            rigor: Rigor::Intermediate,
            mode,
        }
    }

    fn tutor(mode: Mode, replies: Vec<Result<String, GatewayError>>) -> (Tutor, Arc<StubGateway>) {
        let stub = Arc::new(StubGateway::with_replies(replies));
        let tutor = Tutor::new(config(mode), Box::new(Shared(stub.clone())))
            .with_feedback_delay(Duration::ZERO);
        (tutor, stub)
    }

    fn texts(tutor: &Tutor) -> Vec<String> {
        tutor.turns().iter().map(|t| t.text.clone()).collect()
    }

    const TWO_QUESTIONS: &str = r#"[{"question":"What is 2 + 2?","answer":"4"},{"question":"What is 3 * 3?","answer":"9"}]"#;

    #[tokio::test]
    async fn test_greeting_success_and_fallback() {
        let (mut ok, _) = tutor(Mode::Solver, vec![StubGateway::ok("Welcome! What's the problem?")]);
        ok.start().await;
        assert_eq!(texts(&ok), vec!["Welcome! What's the problem?"]);

        let (mut failing, _) = tutor(Mode::Practice, vec![StubGateway::fail()]);
        failing.start().await;
        assert_eq!(texts(&failing), vec![replies::greeting_fallback(Mode::Practice)]);
    }

    #[tokio::test]
    async fn test_solver_remembers_first_problem_and_offers_actions() {
        let (mut tutor, stub) = tutor(
            Mode::Solver,
            vec![
                StubGateway::ok("Hi!"),
                StubGateway::ok("First, subtract 3 from both sides."),
                StubGateway::ok("Now divide by 2."),
            ],
        );
        tutor.start().await;
        tutor.send_message("2x + 3 = 7", None).await;
        tutor.send_message("I got 2x = 4", None).await;

        assert_eq!(tutor.problem(), Some("2x + 3 = 7"));
        let last = tutor.turns().last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        let ids: Vec<ActionId> = last.actions.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![ActionId::NextStep, ActionId::CreateLearningPath]);

        // The step request carries the whole transcript so far.
        let requests = stub.requests();
        let step = &requests[2];
        assert!(step.system_instruction.is_some());
        assert_eq!(step.messages.len(), 4);
        assert_eq!(step.messages[0].role, MessageRole::Model);
        assert_eq!(
            step.messages[3].parts,
            vec![ContentPart::Text("I got 2x = 4".to_string())]
        );
    }

    #[tokio::test]
    async fn test_next_step_action_appends_label_and_reply() {
        let (mut tutor, stub) = tutor(
            Mode::Solver,
            vec![StubGateway::ok("Step one."), StubGateway::ok("Step two.")],
        );
        tutor.send_message("x + 1 = 2", None).await;
        tutor.handle_action(ActionId::NextStep).await;

        assert_eq!(texts(&tutor), vec!["x + 1 = 2", "Step one.", "Next Step", "Step two."]);
        assert_eq!(stub.call_count(), 2);
        assert_eq!(tutor.turns()[3].actions.len(), 2);
    }

    #[tokio::test]
    async fn test_learning_path_without_problem_apologizes_without_calling() {
        let (mut tutor, stub) = tutor(Mode::Solver, vec![]);
        tutor.handle_action(ActionId::CreateLearningPath).await;

        assert_eq!(texts(&tutor), vec!["Create Learning Path", replies::MISSING_PROBLEM]);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_learning_path_uses_remembered_problem() {
        let (mut tutor, stub) = tutor(
            Mode::Solver,
            vec![
                StubGateway::ok("Step one."),
                StubGateway::ok("1. **Variables**"),
            ],
        );
        tutor.send_message("solve 3x = 12", None).await;
        tutor.handle_action(ActionId::CreateLearningPath).await;

        let last = tutor.turns().last().unwrap();
        assert_eq!(last.text, "1. **Variables**");
        assert_eq!(last.actions.len(), 1);
        assert_eq!(last.actions[0].id, ActionId::NextStep);

        let request = &stub.requests()[1];
        assert!(request.system_instruction.is_none());
        let ContentPart::Text(prompt) = &request.messages[0].parts[0] else {
            panic!("expected text prompt");
        };
        assert!(prompt.contains("\"solve 3x = 12\""));
    }

    #[tokio::test]
    async fn test_learning_path_failure_falls_back() {
        let (mut tutor, _) = tutor(
            Mode::Solver,
            vec![StubGateway::ok("Step one."), StubGateway::fail()],
        );
        tutor.send_message("solve 3x = 12", None).await;
        tutor.handle_action(ActionId::CreateLearningPath).await;
        assert_eq!(
            tutor.turns().last().unwrap().text,
            replies::LEARNING_PATH_FALLBACK
        );
    }

    #[tokio::test]
    async fn test_step_failure_falls_back_but_keeps_actions() {
        let (mut tutor, _) = tutor(Mode::Solver, vec![StubGateway::fail()]);
        tutor.send_message("x = ?", None).await;
        let last = tutor.turns().last().unwrap();
        assert_eq!(last.text, replies::STEP_FALLBACK);
        assert_eq!(last.actions.len(), 2);
    }

    #[tokio::test]
    async fn test_quiz_generation_failure_uses_placeholder() {
        let (mut tutor, stub) = tutor(Mode::Practice, vec![StubGateway::fail()]);
        tutor.send_message("fractions", None).await;

        let QuizPhase::InProgress(session) = tutor.quiz() else {
            panic!("quiz should be in progress");
        };
        assert_eq!(session.len(), 2);
        assert_eq!(
            session.current().unwrap().question,
            "What is 2 + 2? (Error generating quiz for fractions)"
        );
        assert_eq!(
            texts(&tutor),
            vec![
                "fractions".to_string(),
                replies::generating_quiz("fractions", 5),
                "Question 1 of 2:\n\nWhat is 2 + 2? (Error generating quiz for fractions)"
                    .to_string(),
            ]
        );
        assert_eq!(stub.requests()[0].output_schema, Some(quiz_schema()));
    }

    #[tokio::test]
    async fn test_unparseable_quiz_uses_placeholder() {
        let (mut tutor, _) = tutor(Mode::Practice, vec![StubGateway::ok("no quiz today")]);
        tutor.send_message("fractions", None).await;
        let QuizPhase::InProgress(session) = tutor.quiz() else {
            panic!("quiz should be in progress");
        };
        assert_eq!(session.current().unwrap().answer, "4");
    }

    #[tokio::test]
    async fn test_two_correct_answers_complete_quiz() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (tutor, stub) = tutor(Mode::Practice, vec![StubGateway::ok(TWO_QUESTIONS)]);
        let mut tutor = tutor.with_events(tx);

        tutor.send_message("arithmetic", None).await;
        tutor.send_message(" 4 ", None).await;
        tutor.send_message("9", None).await;

        // Two cursor advances: one leads to the next question, one completes.
        let next_question_lines = texts(&tutor)
            .iter()
            .filter(|t| t.as_str() == replies::CORRECT_NEXT)
            .count();
        assert_eq!(next_question_lines, 1);
        assert_eq!(
            tutor.turns().last().unwrap().text,
            replies::CORRECT_COMPLETE
        );

        let last = tutor.turns().last().unwrap();
        assert_eq!(last.text, replies::CORRECT_COMPLETE);
        assert_eq!(last.actions[0].id, ActionId::PracticeAgain);

        let QuizPhase::Complete(session) = tutor.quiz() else {
            panic!("quiz should be complete");
        };
        assert!(session.is_complete());
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.correct_count(), 2);
        assert_eq!(stub.call_count(), 1);

        let mut chimes = 0;
        let mut appended = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                TutorEvent::Chime => chimes += 1,
                TutorEvent::TurnAppended(_) => appended += 1,
                TutorEvent::Busy(_) => {}
            }
        }
        assert_eq!(chimes, 2);
        assert_eq!(appended, tutor.turns().len());
    }

    #[tokio::test]
    async fn test_correct_answer_marks_turn() {
        let (mut tutor, _) = tutor(Mode::Practice, vec![StubGateway::ok(TWO_QUESTIONS)]);
        tutor.send_message("arithmetic", None).await;
        tutor.send_message("FOUR", None).await;

        let answer_turn = tutor
            .turns()
            .iter()
            .find(|t| t.text == "FOUR")
            .unwrap();
        assert_eq!(answer_turn.is_correct_answer, Some(false));
    }

    #[tokio::test]
    async fn test_wrong_answer_analyzes_then_advances() {
        let (mut tutor, stub) = tutor(
            Mode::Practice,
            vec![
                StubGateway::ok(TWO_QUESTIONS),
                StubGateway::ok("Thanks for showing your work!"),
            ],
        );
        tutor.send_message("arithmetic", None).await;
        tutor.send_message("5", None).await;

        let turns = tutor.turns();
        let n = turns.len();
        assert_eq!(turns[n - 2].text, "Thanks for showing your work!");
        assert!(turns[n - 2].requests_work);
        assert_eq!(turns[n - 1].text, "Question 2 of 2:\n\nWhat is 3 * 3?");

        let QuizPhase::InProgress(session) = tutor.quiz() else {
            panic!("quiz should still be running");
        };
        assert_eq!(session.current_index(), 1);

        let ContentPart::Text(prompt) = &stub.requests()[1].messages[0].parts[0] else {
            panic!("expected text prompt");
        };
        assert!(prompt.contains("\"What is 2 + 2?\""));
        assert!(prompt.contains("\"5\""));
    }

    #[tokio::test]
    async fn test_wrong_answer_with_image_sends_image_and_skips_work_request() {
        let (mut tutor, stub) = tutor(
            Mode::Practice,
            vec![StubGateway::ok(TWO_QUESTIONS), StubGateway::fail()],
        );
        tutor.send_message("arithmetic", None).await;
        tutor
            .send_message("Image uploaded: work.png", Some(ImageData::new("aGk=")))
            .await;

        let analysis = &tutor.turns()[tutor.turns().len() - 2];
        assert_eq!(analysis.text, replies::ANALYSIS_FALLBACK);
        assert!(!analysis.requests_work);
        assert!(stub.requests()[1].has_image());
    }

    #[tokio::test]
    async fn test_wrong_last_answer_completes_with_restart() {
        let (mut tutor, _) = tutor(
            Mode::Practice,
            vec![
                StubGateway::ok(TWO_QUESTIONS),
                StubGateway::ok("analysis"),
            ],
        );
        tutor.send_message("arithmetic", None).await;
        tutor.send_message("4", None).await;
        tutor.send_message("10", None).await;

        let last = tutor.turns().last().unwrap();
        assert_eq!(last.text, replies::WRONG_COMPLETE);
        assert_eq!(last.actions[0].id, ActionId::PracticeAgain);
        assert!(matches!(tutor.quiz(), QuizPhase::Complete(_)));
    }

    #[tokio::test]
    async fn test_practice_again_waits_for_new_topic() {
        let (mut tutor, _) = tutor(
            Mode::Practice,
            vec![
                StubGateway::ok(TWO_QUESTIONS),
                StubGateway::ok(r#"[{"question":"1/2 + 1/2?","answer":"1"}]"#),
            ],
        );
        tutor.send_message("arithmetic", None).await;
        tutor.send_message("4", None).await;
        tutor.send_message("9", None).await;
        tutor.handle_action(ActionId::PracticeAgain).await;

        assert!(tutor.quiz().is_awaiting_topic());
        assert_eq!(tutor.turns().last().unwrap().text, replies::PRACTICE_AGAIN);

        tutor.send_message("fractions", None).await;
        let QuizPhase::InProgress(session) = tutor.quiz() else {
            panic!("new quiz should be running");
        };
        assert_eq!(session.len(), 1);
        assert_eq!(
            tutor.turns().last().unwrap().text,
            "Question 1 of 1:\n\n1/2 + 1/2?"
        );
    }

    #[tokio::test]
    async fn test_chat_after_quiz_complete_has_no_actions() {
        let (mut tutor, _) = tutor(
            Mode::Practice,
            vec![
                StubGateway::ok(r#"[{"question":"1 + 1?","answer":"2"}]"#),
                StubGateway::ok("Happy to help!"),
            ],
        );
        tutor.send_message("addition", None).await;
        tutor.send_message("2", None).await;
        tutor.send_message("thanks!", None).await;

        let last = tutor.turns().last().unwrap();
        assert_eq!(last.text, "Happy to help!");
        assert!(last.actions.is_empty());
        assert!(tutor.problem().is_none());
    }

    #[tokio::test]
    async fn test_replay_produces_identical_transcript() {
        async fn run() -> Vec<Turn> {
            let (mut tutor, _) = tutor(
                Mode::Practice,
                vec![
                    StubGateway::ok("Hello!"),
                    StubGateway::ok(TWO_QUESTIONS),
                    StubGateway::ok("Let's look at that."),
                ],
            );
            tutor.start().await;
            tutor.send_message("arithmetic", None).await;
            tutor.send_message("3", None).await;
            tutor.send_message("9", None).await;
            tutor.handle_action(ActionId::PracticeAgain).await;
            tutor.turns().to_vec()
        }

        let first = run().await;
        let second = run().await;
        assert_eq!(first, second);
        let ids: Vec<u64> = first.iter().map(|t| t.id).collect();
        let expected: Vec<u64> = (1..=first.len() as u64).collect();
        assert_eq!(ids, expected);
    }
}
