use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use kellz_math::{
    AppState, ChatView, ModelGateway, Settings, SetupWizard, Tutor, TutorCommand, TutorConfig,
    TutorEvent, draw_chat, draw_quit_confirmation, draw_setup, handle_chat_input,
    handle_quit_confirm_input, handle_setup_input, logger, spawn_tutor_worker,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout, Write};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

type Backend = CrosstermBackend<Stdout>;

/// Channels to the running tutor, created once setup completes.
struct ChatSession {
    config: TutorConfig,
    commands: UnboundedSender<TutorCommand>,
    events: UnboundedReceiver<TutorEvent>,
    worker: JoinHandle<()>,
}

impl ChatSession {
    fn start(config: TutorConfig, gateway: Box<dyn ModelGateway>, settings: &Settings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (evt_tx, evt_rx) = mpsc::unbounded_channel();
        let tutor = Tutor::new(config, gateway).with_feedback_delay(settings.feedback_delay);
        let worker = spawn_tutor_worker(tutor, cmd_rx, evt_tx);
        let session = Self {
            config,
            commands: cmd_tx,
            events: evt_rx,
            worker,
        };
        session.send(TutorCommand::Start);
        session
    }

    fn send(&self, command: TutorCommand) -> bool {
        match self.commands.send(command) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Tutor worker is gone, dropping command: {:?}", e.0);
                false
            }
        }
    }
}

async fn next_tutor_event(session: Option<&mut ChatSession>) -> Option<TutorEvent> {
    match session {
        Some(session) => session.events.recv().await,
        None => std::future::pending().await,
    }
}

async fn run_app(
    terminal: &mut Terminal<Backend>,
    settings: &Settings,
    gateway: Box<dyn ModelGateway>,
    model_label: &str,
) -> io::Result<()> {
    let mut key_events = EventStream::new();
    let mut app_state = AppState::Setup;
    let mut wizard = SetupWizard::new();
    let mut view = ChatView::new();
    let mut gateway = Some(gateway);
    let mut session: Option<ChatSession> = None;

    loop {
        if view.pending_chimes > 0 {
            view.pending_chimes = 0;
            terminal.backend_mut().write_all(b"\x07")?;
            terminal.backend_mut().flush()?;
        }

        terminal.draw(|f| match (&app_state, &session) {
            (AppState::Setup, _) | (_, None) => draw_setup(f, &wizard, model_label),
            (AppState::Chat, Some(s)) => draw_chat(f, &mut view, &s.config),
            (AppState::QuitConfirm, Some(s)) => {
                draw_chat(f, &mut view, &s.config);
                draw_quit_confirmation(f);
            }
        })?;

        tokio::select! {
            maybe_event = key_events.next() => {
                let key = match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => key,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e),
                    None => break,
                };

                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    log::info!("Ctrl+C pressed, exiting");
                    break;
                }

                match app_state {
                    AppState::Setup => {
                        if let Some(config) = handle_setup_input(&mut wizard, key) {
                            let Some(gateway) = gateway.take() else {
                                break;
                            };
                            log::info!(
                                "Setup complete: {} / {} / {}",
                                config.difficulty,
                                config.rigor,
                                config.mode
                            );
                            session = Some(ChatSession::start(config, gateway, settings));
                            // Held until the greeting's Busy(false) arrives.
                            view.busy = true;
                            app_state = AppState::Chat;
                        }
                    }
                    AppState::Chat => {
                        if let Some(command) = handle_chat_input(&mut view, key, &mut app_state)
                            && let Some(session) = &session
                            && !session.send(command)
                        {
                            view.busy = false;
                        }
                    }
                    AppState::QuitConfirm => {
                        if handle_quit_confirm_input(key, &mut app_state) {
                            log::info!("Session ended by user");
                            break;
                        }
                    }
                }
            }
            Some(event) = next_tutor_event(session.as_mut()) => {
                view.apply_event(event);
            }
        }
    }

    if let Some(session) = session {
        session.worker.abort();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logger::init(&settings.log_file, settings.log_level) {
        eprintln!("Warning: could not open log file {}: {}", settings.log_file, e);
    }

    let gateway = match settings.build_gateway() {
        Ok(gateway) => gateway,
        Err(e) => {
            log::error!("Failed to create model gateway: {}", e);
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    let model_label = format!("{} / {}", settings.provider.label(), gateway.name());
    log::info!("Starting Kellz Math with {}", model_label);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &settings, gateway, &model_label).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("Terminal error: {}", e);
    }
    result
}
