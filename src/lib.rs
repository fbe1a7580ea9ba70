pub mod ai;
pub mod attachment;
pub mod config;
pub mod input;
pub mod logger;
pub mod models;
pub mod prompts;
pub mod quiz;
pub mod replies;
pub mod scratchpad;
pub mod setup;
pub mod transcript;
pub mod tutor;
pub mod tutor_worker;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use ai::{
    DEFAULT_GEMINI_MODEL, DEFAULT_MODEL, GatewayError, GeminiClient, ModelConfig, ModelGateway,
    OpenRouterClient,
};
pub use config::{ConfigError, Provider, Settings};
pub use input::{handle_chat_input, handle_quit_confirm_input, handle_setup_input};
pub use models::{
    ActionId, AppState, ChatView, Difficulty, Mode, Rigor, Turn, TutorCommand, TutorConfig,
    TutorEvent,
};
pub use quiz::{QuizPhase, QuizSession};
pub use setup::SetupWizard;
pub use tutor::Tutor;
pub use tutor_worker::spawn_tutor_worker;
pub use ui::{draw_chat, draw_quit_confirmation, draw_setup};
pub use utils::calculate_wrapped_cursor_position;
