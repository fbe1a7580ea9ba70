use crate::models::{TutorCommand, TutorEvent};
use crate::tutor::Tutor;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Runs the tutor on its own task, one command at a time. `Busy(true)` is
/// sent before each command and `Busy(false)` once it has fully finished.
pub fn spawn_tutor_worker(
    tutor: Tutor,
    mut commands: UnboundedReceiver<TutorCommand>,
    events: UnboundedSender<TutorEvent>,
) -> JoinHandle<()> {
    let mut tutor = tutor.with_events(events.clone());
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            log::debug!("Worker received {:?}", command);
            let _ = events.send(TutorEvent::Busy(true));
            match command {
                TutorCommand::Start => tutor.start().await,
                TutorCommand::SendMessage { text, image } => {
                    tutor.send_message(&text, image).await
                }
                TutorCommand::Action(action) => tutor.handle_action(action).await,
            }
            let _ = events.send(TutorEvent::Busy(false));
        }
        log::info!("Tutor command channel closed, worker exiting");
    })
}
