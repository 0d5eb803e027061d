//! dropsearch-tui - the search dropdown in a terminal.
//!
//! Loads the config, builds the configured search backend and runs the
//! widget against it. Search completions, terminal input and animation
//! ticks all feed one select loop.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dropsearch_core::client::AnyClient;
use dropsearch_core::config::{Config, Directories};
use dropsearch_core::session::{Completion, SearchCompletion, SpawnDispatcher};
use dropsearch_core::{Dropdown, DropdownOptions};
use dropsearch_tui::geometry::tui_metrics;
use dropsearch_tui::row::{ResultRow, children_from_config, overrides_from_config};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod app;
mod cli;
mod colors;
mod render;

use app::App;
use cli::{Cli, Commands};
use render::render_dropdown;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Set up logging with file output. TUI must log to file since it uses the terminal for display.
fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("dropsearch-tui-{timestamp}.log");
    let log_path = std::path::Path::new("/tmp").join(&log_filename);

    let symlink_path = std::path::Path::new("/tmp/dropsearch-tui.log");
    let _ = std::fs::remove_file(symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, symlink_path);

    let file_appender = tracing_appender::rolling::never("/tmp", &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

/// Config, backend and children, ready to build a widget from.
struct Setup {
    config: Config,
    client: Arc<AnyClient>,
}

impl Setup {
    fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let dirs = Directories::new();
        let path = config_path.unwrap_or_else(|| dirs.config_file.clone());
        tracing::debug!("Loading config from {}", path.display());

        let config = Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        let client = AnyClient::from_config(&config.backend, &dirs)
            .context("Failed to set up the search backend")?;

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    fn dropdown(
        &self,
        available_extent: f32,
    ) -> Result<(Dropdown<ResultRow>, UnboundedReceiver<SearchCompletion>)> {
        let children = children_from_config(&self.config)?;
        let options = DropdownOptions {
            metrics: tui_metrics(&self.config),
            ..DropdownOptions::from_config(&self.config, available_extent)
        };
        let (dispatcher, rx) = SpawnDispatcher::new(Arc::clone(&self.client));

        let mut dropdown = Dropdown::new(options, children, Box::new(dispatcher))?
            .with_overrides(overrides_from_config(&self.config.appearance));
        if let Some(label) = &self.config.appearance.side_component {
            dropdown = dropdown.with_side_component(ResultRow::Label(label.clone()));
        }

        Ok((dropdown, rx))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Init => init()?,
        Commands::Query { query } => search_query(&load_or_exit(cli.config), &query).await?,
        Commands::Check => check(&load_or_exit(cli.config))?,
        Commands::Tui => run_tui(&load_or_exit(cli.config)).await?,
    }

    Ok(())
}

fn load_or_exit(config_path: Option<PathBuf>) -> Setup {
    match Setup::load(config_path) {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn init() -> Result<()> {
    let dirs = Directories::new();
    if Config::init(&dirs)? {
        println!("Wrote {}", dirs.config_file.display());
    } else {
        println!("{} already exists", dirs.config_file.display());
    }
    Ok(())
}

/// Raw mode, the alternate screen and mouse capture for as long as it lives.
/// Dropping it restores the terminal, including on an early error return.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show) {
            tracing::warn!("Failed to restore terminal: {}", e);
        }
    }
}

// Event loop with setup/teardown - input handling lives in App
async fn run_tui(setup: &Setup) -> Result<()> {
    let (_, rows) = crossterm::terminal::size()?;
    let (dropdown, mut completions) = setup.dropdown(f32::from(rows))?;

    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(dropdown);

    let mut event_stream = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut needs_render = true;
    let mut was_animating = false;

    loop {
        let now = Instant::now();
        let animating = app.dropdown.is_animating(now);
        // One extra frame after an animation settles so the final state is drawn
        if needs_render || animating || was_animating {
            terminal.draw(|f| render_dropdown(f, &mut app, now))?;
            needs_render = false;
        }
        was_animating = animating;

        tokio::select! {
            Some(completion) = completions.recv() => {
                let seq = completion.seq;
                let outcome = app.apply(completion);
                tracing::debug!("Completion #{seq}: {outcome:?}");
                needs_render = outcome != Completion::Stale;
            }

            Some(event_result) = event_stream.next() => {
                let event = match event_result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::error!("Event stream error: {}", e);
                        continue;
                    }
                };

                let now = Instant::now();
                needs_render = match event {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        tracing::debug!("KEY EVENT: code={:?}, modifiers={:?}", key.code, key.modifiers);
                        app.handle_key(key, now)
                    }
                    Event::Mouse(mouse) => app.handle_mouse(mouse, now),
                    Event::Resize(_, rows) => {
                        app.dropdown.resize(f32::from(rows));
                        true
                    }
                    _ => false,
                };
            }

            _ = frames.tick(), if animating => {}

            else => break,
        }

        if app.should_quit {
            break;
        }
    }

    drop(terminal);
    drop(guard);

    if let Some(hit) = app.chosen {
        println!("{}", serde_json::to_string(&hit)?);
    }

    Ok(())
}

async fn search_query(setup: &Setup, query: &str) -> Result<()> {
    println!("Searching: {query}");

    let (mut dropdown, mut completions) = setup.dropdown(0.0)?;
    dropdown.focus(Instant::now());
    if !dropdown.set_text(query) {
        println!("Nothing to search");
        return Ok(());
    }

    let received = tokio::time::timeout(QUERY_TIMEOUT, async {
        while let Some(completion) = completions.recv().await {
            let error = completion.outcome.as_ref().err().map(ToString::to_string);
            match dropdown.apply(completion) {
                Completion::Applied => return Ok(()),
                Completion::Failed => {
                    return Err(anyhow::anyhow!(
                        "Search failed: {}",
                        error.unwrap_or_default()
                    ));
                }
                Completion::Stale => {}
            }
        }
        Ok(())
    })
    .await;

    match received {
        Err(_) => println!("No results received within timeout"),
        Ok(result) => {
            result?;
            println!();
            println!("Results: {} rows", dropdown.results().row_count());
            for row in dropdown.results().rows() {
                println!("{}", row.element.plain_text());
            }
        }
    }

    Ok(())
}

fn check(setup: &Setup) -> Result<()> {
    let children = children_from_config(&setup.config)?;
    println!("Backend: {}", backend_name(&setup.client));
    println!("Indices: {}", children.len());
    for (i, child) in children.iter().enumerate() {
        let descriptor = child.descriptor();
        println!("  {i}. {} ({})", descriptor.title, descriptor.index);
    }
    if let AnyClient::Local(client) = setup.client.as_ref() {
        let names = client.index_names();
        for child in &children {
            if !names.contains(&child.descriptor().index.as_str()) {
                println!(
                    "  warning: dataset has no index named {}",
                    child.descriptor().index
                );
            }
        }
    }
    println!("OK");
    Ok(())
}

fn backend_name(client: &AnyClient) -> &'static str {
    match client {
        AnyClient::Local(_) => "local",
        AnyClient::Algolia(_) => "algolia",
    }
}
