//! `Taskline`: terminal task list with priority ordering.
//!
//! Launches the TUI. Advice is enabled when an API key is present in the
//! environment variable named by `advisory.api_key_env`
//! (`TASKLINE_API_KEY` by default). Configuration via CLI flags,
//! environment variables, or config file (`~/.config/taskline/config.toml`).
//!
//! ```bash
//! # Without advice
//! cargo run --bin taskline
//!
//! # With advice from an OpenAI-compatible endpoint
//! TASKLINE_API_KEY=sk-... cargo run --bin taskline -- \
//!     --advisory-endpoint http://localhost:11434/v1/chat/completions \
//!     --advisory-model llama3
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskline::advisory::{AdvisoryError, AdvisoryEvent, AdvisoryService, HttpAdvisor};
use taskline::app::{App, AppCommand};
use taskline::config::{CliArgs, ClientConfig};
use taskline::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file, never stdout, since ratatui owns the terminal.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("taskline starting");

    let advisory = build_advisory(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, advisory, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskline exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskline.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// The advisory service and its event receiver, when advice is configured.
type Advisory = (
    AdvisoryService<HttpAdvisor>,
    mpsc::Receiver<AdvisoryEvent>,
);

/// Build the advisory service from config, or `None` if no key is set.
fn build_advisory(config: &ClientConfig) -> Option<Advisory> {
    let Some(advisor_config) = config.to_advisor_config() else {
        tracing::info!(env = %config.api_key_env, "no advisory API key; advice disabled");
        return None;
    };
    match HttpAdvisor::new(advisor_config) {
        Ok(advisor) => {
            tracing::info!(?advisor, "advice enabled");
            Some(AdvisoryService::new(advisor, config.event_buffer))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to build advisory client; advice disabled");
            None
        }
    }
}

/// Main application loop.
///
/// Must run inside the tokio runtime: advisory requests are spawned onto it.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut advisory: Option<Advisory>,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new()
        .with_min_name_len(config.min_name_len)
        .with_deadline_format(config.deadline_format.clone());

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain finished advisory requests (non-blocking).
        if let Some((_, rx)) = advisory.as_mut() {
            while let Ok(event) = rx.try_recv() {
                app.apply_advisory_event(event);
            }
        }

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(AppCommand::RequestAdvice(request)) = app.handle_key_event(key) {
                match advisory.as_ref() {
                    Some((service, _)) => {
                        service.request(request);
                    }
                    None => app.apply_advisory_event(AdvisoryEvent::failed(
                        request.generation,
                        &AdvisoryError::NotConfigured,
                    )),
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
