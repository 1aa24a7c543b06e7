//! The application root that wires every component together.
//!
//! `ClockApp` owns the model, the dispatcher and the user-interface event
//! bus. Collaborators receive it by reference; nothing is global. When the
//! timer and an interactive surface run concurrently they share one
//! `ClockApp` behind a single mutex (see [`SharedApp`]).

use crate::commands::{CommandFactory, UpdateCommandFactory};
use crate::common::{ADAM_ERROR, INPUT_ENTERED, RESULT_AVAILABLE};
use crate::config::{ClockConfig, StrategyKind};
use crate::coordinator::Coordinator;
use crate::dispatcher::{CommandDispatcher, Dispatch};
use crate::error::Result;
use crate::events::{Payload, UserInputData};
use crate::model::ModelProxy;
use crate::publisher::{Observer, Publisher};
use crate::repository::CommandRepository;
use crate::timer::ClockTimer;
use crate::view::{InputObserver, ModelObserver, UserInteraction};
use crate::ENGINE_NAME;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{error, info};

/// A `ClockApp` shared between the timer task and an input loop.
pub type SharedApp = Arc<Mutex<ClockApp>>;

/// The facade of the clock.
pub struct ClockApp {
    strategy: StrategyKind,
    ui: Arc<dyn UserInteraction>,
    ui_events: Publisher,
    inbox: mpsc::UnboundedReceiver<UserInputData>,
    model: ModelProxy,
    dispatcher: CommandDispatcher,
}

impl ClockApp {
    /// Builds and wires every component for `config`, rendering to `ui`.
    pub fn new(config: &ClockConfig, ui: Arc<dyn UserInteraction>) -> Result<Self> {
        let (input_tx, inbox) = mpsc::unbounded_channel();
        let mut ui_events = Publisher::new();
        ui_events.register_event(INPUT_ENTERED)?;
        ui_events.subscribe(INPUT_ENTERED, Box::new(InputObserver::new(input_tx)))?;

        let mut model = ModelProxy::new(&config.hands)?;
        model.subscribe(RESULT_AVAILABLE, Box::new(ModelObserver::new(Arc::clone(&ui))))?;
        model.subscribe(ADAM_ERROR, Box::new(ModelObserver::new(Arc::clone(&ui))))?;

        let mut repository = CommandRepository::new();
        repository.register_command("update", UpdateCommandFactory::new("0 0 0").create())?;

        let dispatcher = CommandDispatcher::new(Coordinator::new(config.strategy), repository);
        info!("{} ready ({:?} undo strategy).", ENGINE_NAME, config.strategy);

        Ok(Self {
            strategy: config.strategy,
            ui,
            ui_events,
            inbox,
            model,
            dispatcher,
        })
    }

    pub fn into_shared(self) -> SharedApp {
        Arc::new(Mutex::new(self))
    }

    /// Publishes `text` on `Input entered`, then dispatches everything queued.
    ///
    /// Returns `Dispatch::Exit` if any dispatched input asked to leave.
    pub fn input_entered(&mut self, text: &str, sender: &str) -> Result<Dispatch> {
        let input = UserInputData::new(text, sender);
        self.ui_events
            .notify(INPUT_ENTERED, Arc::new(Payload::Input(input)))?;

        let mut outcome = Dispatch::Continue;
        while let Ok(input) = self.inbox.try_recv() {
            let dispatched = self.dispatcher.command_entered(
                &mut self.model,
                self.ui.as_ref(),
                &input.text,
                &input.sender,
            )?;
            if dispatched == Dispatch::Exit {
                outcome = Dispatch::Exit;
            }
        }
        Ok(outcome)
    }

    /// Adds another listener to the `Input entered` event.
    pub fn subscribe_input(&mut self, observer: Box<dyn Observer>) -> Result<()> {
        self.ui_events.subscribe(INPUT_ENTERED, observer).map(|_| ())
    }

    /// Adds another listener to the model's `result available` event.
    pub fn subscribe_results(&mut self, observer: Box<dyn Observer>) -> Result<()> {
        self.model.subscribe(RESULT_AVAILABLE, observer).map(|_| ())
    }

    pub fn model(&self) -> &ModelProxy {
        &self.model
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn undo_len(&self) -> usize {
        self.dispatcher.coordinator().undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.dispatcher.coordinator().redo_len()
    }

    pub fn command_names(&self) -> BTreeSet<String> {
        self.dispatcher.repository().command_names()
    }

    pub fn print_help(&self, command: &str, out: &mut impl Write) -> io::Result<()> {
        self.dispatcher.repository().print_help(command, out)
    }
}

/// Runs `timer` against `app` until a shutdown signal is received.
///
/// This method will:
/// 1. Spawn the `ClockTimer` task.
/// 2. Wait for a Ctrl+C signal to initiate a graceful shutdown.
///
/// The undo history gains one entry per tick and is not trimmed while this runs.
pub async fn run_until_ctrl_c(app: SharedApp, timer: ClockTimer) -> anyhow::Result<()> {
    info!("{} starting up...", ENGINE_NAME);
    let (shutdown_tx, _) = broadcast::channel(1);

    let timer_shutdown_rx = shutdown_tx.subscribe();
    let handle = tokio::spawn(async move { timer.run(app, timer_shutdown_rx).await });

    info!("Timer running. Press Ctrl+C to shut down.");
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Stopping the timer...");
    if shutdown_tx.send(()).is_err() {
        error!("Failed to send shutdown signal. The timer may not terminate gracefully.");
    }
    tokio::time::timeout(Duration::from_millis(500), handle).await.ok();
    info!("{} has shut down.", ENGINE_NAME);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{HOURS_HAND, MINUTES_HAND};
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct Screen {
        messages: StdMutex<Vec<String>>,
        outputs: StdMutex<Vec<Payload>>,
    }

    impl UserInteraction for Screen {
        fn send_message(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }

        fn send_output(&self, payload: &Payload) {
            self.outputs.lock().unwrap().push(payload.clone());
        }
    }

    fn app() -> (ClockApp, Arc<Screen>) {
        let screen = Arc::new(Screen::default());
        let app = ClockApp::new(&ClockConfig::default(), screen.clone()).unwrap();
        (app, screen)
    }

    #[test]
    fn timer_input_flows_through_to_the_view() {
        let (mut app, screen) = app();
        assert_eq!(app.input_entered("10 30 15", "timer").unwrap(), Dispatch::Continue);
        assert_eq!(screen.outputs.lock().unwrap().len(), 3);
        assert_eq!(app.model().last_angle(MINUTES_HAND), Some(180.0));
        assert_eq!(app.undo_len(), 1);
    }

    #[test]
    fn exit_is_reported_back() {
        let (mut app, _screen) = app();
        assert_eq!(app.input_entered("exit", "").unwrap(), Dispatch::Exit);
    }

    #[test]
    fn unknown_input_shows_a_message() {
        let (mut app, screen) = app();
        app.input_entered("paint", "").unwrap();
        assert_eq!(
            *screen.messages.lock().unwrap(),
            vec!["Command paint is not a known command".to_string()]
        );
    }

    #[test]
    fn model_errors_reach_the_view() {
        let (mut app, screen) = app();
        assert!(app.input_entered("1 2 x", "timer").is_err());
        let outputs = screen.outputs.lock().unwrap();
        assert!(matches!(outputs.last(), Some(Payload::ModelError(_))));
    }

    #[test]
    fn undo_through_the_facade() {
        let (mut app, _screen) = app();
        app.input_entered("1 0 0", "timer").unwrap();
        app.input_entered("2 0 0", "timer").unwrap();
        app.input_entered("undo", "").unwrap();
        assert_eq!(app.model().last_angle(HOURS_HAND), Some(30.0));
        assert_eq!((app.undo_len(), app.redo_len()), (1, 1));
    }

    #[test]
    fn default_repository_has_update() {
        let (app, _screen) = app();
        assert!(app.command_names().contains("update"));
        let mut out = Vec::new();
        app.print_help("update", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "update: Rotate the Hand\n");
    }
}
