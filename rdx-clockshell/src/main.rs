use anyhow::Result;
use clockwork::common::{HOURS_HAND, MINUTES_HAND, SECONDS_HAND};
use clockwork::prelude::*;
use clockwork::{ENGINE_NAME, VERSION as LIB_VERSION};
use colored::Colorize;
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sender name for lines typed at the prompt.
const SHELL_SENDER: &str = "shell";

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct MyHighlighter;

impl Highlighter for MyHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    const LOGO_TEXT: &str = include_str!("../logo.log");
    println!("{}", LOGO_TEXT.cyan());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    let rule = "-".repeat(72);

    println!("{}", rule.dimmed());
    println!("{}", version_string);
    println!(
        "{}",
        "    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.".dimmed()
    );
    println!("{}", rule.dimmed());
}

fn print_help(app: &ClockApp) {
    println!("Available commands:");
    println!("  tick <H> <M> <S>      - Feeds a time to the clock as the timer would.");
    println!("  now                   - Feeds the current time once.");
    println!("  undo                  - Re-shows the time before the last update.");
    println!("  redo                  - Re-applies the last undone update.");
    println!("  status                - Shows history sizes and hand angles.");
    println!("  start timer           - Lets the timer drive the clock.");
    println!("  stop timer            - Pauses the timer.");
    println!("  exit                  - Quits the shell.");
    println!("Registered commands:");
    for name in app.command_names() {
        let mut line = Vec::new();
        if app.print_help(&name, &mut line).is_ok() {
            print!("  {}", String::from_utf8_lossy(&line));
        }
    }
}

fn print_status(app: &ClockApp) {
    println!(
        "Strategy: {:?}  undo: {}  redo: {}",
        app.strategy(),
        app.undo_len(),
        app.redo_len()
    );
    for hand in [HOURS_HAND, MINUTES_HAND, SECONDS_HAND] {
        match app.model().last_angle(hand) {
            Some(angle) => println!("  {:<12} {:>7.1} deg", hand, angle),
            None => println!("  {:<12} {:>7}", hand, "-"),
        }
    }
}

/// Sends one input to the app and prints any error. Returns `true` on exit.
async fn feed(app: &SharedApp, text: &str, sender: &str) -> bool {
    match app.lock().await.input_entered(text, sender) {
        Ok(Dispatch::Exit) => true,
        Ok(Dispatch::Continue) => false,
        Err(e) => {
            println!("{} {}", "Error:".red().bold(), e);
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let path = env::args().nth(1).map(PathBuf::from);
    let config = ClockConfig::load(path.as_deref())?;

    let app = ClockApp::new(&config, Arc::new(TerminalView))?.into_shared();

    // The timer starts paused so history only grows when asked to.
    let timer = ClockTimer::new(&config);
    let timer_enabled = timer.enabled_flag();
    timer_enabled.store(false, Ordering::Relaxed);
    let sampler = ClockTimer::new(&config);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    info!("Spawning the {} timer in the background...", ENGINE_NAME);
    let timer_app = app.clone();
    let timer_handle = tokio::spawn(async move { timer.run(timer_app, shutdown_rx).await });

    let mut rl = Editor::new()?;
    rl.set_helper(Some(MyHighlighter));

    println!("{} is running. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let trimmed = line.trim();
                let args = trimmed.split_whitespace().collect::<Vec<_>>();

                match args.as_slice() {
                    [] => {}
                    ["help"] => print_help(&*app.lock().await),
                    ["status"] => print_status(&*app.lock().await),
                    ["tick", h, m, s] => {
                        feed(&app, &format!("{} {} {}", h, m, s), TIMER_SENDER).await;
                    }
                    ["tick", ..] => println!("Usage: tick <H> <M> <S>"),
                    ["now"] => {
                        feed(&app, &sampler.sample(), TIMER_SENDER).await;
                    }
                    ["start", "timer"] => {
                        timer_enabled.store(true, Ordering::Relaxed);
                        println!("--> Timer started.");
                    }
                    ["stop", "timer"] => {
                        timer_enabled.store(false, Ordering::Relaxed);
                        println!("--> Timer stopped.");
                    }
                    _ => {
                        if feed(&app, trimmed, SHELL_SENDER).await {
                            break;
                        }
                    }
                }
            }
            Err(_) => {
                println!("Exiting clockshell...");
                break;
            }
        }
    }

    shutdown_tx.send(()).ok();
    tokio::time::timeout(Duration::from_millis(500), timer_handle).await.ok();
    Ok(())
}
