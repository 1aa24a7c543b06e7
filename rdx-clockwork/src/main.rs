use anyhow::Result;
use clockwork::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 2. Load the configuration. The first argument may name a TOML file.
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = ClockConfig::load(path.as_deref())?;
    info!("Loaded configuration: {:?}", config);

    // 3. Build the app with a terminal view and a logging observer.
    let mut app = ClockApp::new(&config, Arc::new(TerminalView))?;
    app.subscribe_input(Box::new(InputLogger))?;

    // 4. Run the timer until Ctrl+C.
    let timer = ClockTimer::new(&config);
    run_until_ctrl_c(app.into_shared(), timer).await?;

    Ok(())
}

/// Logs every input before it reaches the dispatcher.
struct InputLogger;

impl Observer for InputLogger {
    fn name(&self) -> &str {
        "InputLogger"
    }

    fn notify(&self, payload: Arc<Payload>) {
        if let Payload::Input(input) = payload.as_ref() {
            info!("[INPUT] => '{}' from '{}'", input.text, input.sender);
        }
    }
}
