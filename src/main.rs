//! cpu-partyparrot: CPU usage keys with a party parrot that speeds up under load.
//!
//! Features:
//!   - Per-key CPU sampling from OS tick counters, shown as "42.1%"
//!   - Ten-frame parrot animation, 220ms per frame when idle down to 20ms at full load
//!   - Terminal preview of a 5x3 key deck (add/remove/restart keys live)
//!   - Headless mode that logs every title change
//!
//! Keybindings: Press F1 or '?' for help.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::MissedTickBehavior;

use cpu_partyparrot::app::App;
use cpu_partyparrot::cli::Cli;
use cpu_partyparrot::config::{self, PartyParrotConfig};
use cpu_partyparrot::surface::LogSurface;
use cpu_partyparrot::{input, logging, system, ui, InstanceId, LoadAnimator};

/// Redraw interval in milliseconds
const REDRAW_MS: u64 = 50;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => PartyParrotConfig::load_from(path),
        None => PartyParrotConfig::load(),
    };
    if let Some(keys) = cli.keys {
        cfg.initial_keys = keys.min(config::MAX_KEYS);
    }

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => {
                cfg.save_to(path)?;
                path.clone()
            }
            None => cfg.save()?,
        };
        println!("Wrote {}", path.display());
        return Ok(());
    }

    // Single-threaded: every key's loops run cooperatively on this thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    if cli.headless {
        logging::init_stderr()?;
        return runtime.block_on(run_headless(&cfg, cli.duration_secs));
    }

    // A log file we cannot open is not worth refusing to start over
    if let Some(path) = cli.log_file.clone().or_else(config::default_log_path) {
        if let Err(e) = logging::init_file(&path) {
            eprintln!("Warning: logging disabled: {:#}", e);
        }
    }
    runtime.block_on(run_preview(&cfg))
}

fn new_animator(cfg: &PartyParrotConfig) -> LoadAnimator {
    LoadAnimator::new(
        cfg.animator_settings(),
        cfg.frames(),
        system::tick_source(cfg.tick_source),
    )
}

/// Set up the terminal, run the deck preview, and always restore the terminal
async fn run_preview(cfg: &PartyParrotConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, cfg).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main preview loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: &PartyParrotConfig,
) -> Result<()> {
    let mut app = App::new(new_animator(cfg));
    for _ in 0..cfg.initial_keys {
        app.add_key();
    }
    app.selected_index = 0;
    tracing::info!(keys = app.tiles.len(), "preview started");

    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(Duration::from_millis(REDRAW_MS));
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if app.should_quit {
            break Ok(());
        }

        tokio::select! {
            _ = redraw.tick() => {}
            event = events.next() => match event {
                // On Windows, crossterm fires Press and Release; only handle Press
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    input::handle_input(&mut app, key);
                }
                // Resize and the rest are picked up by the next draw
                Some(Ok(_)) => {}
                Some(Err(e)) => break Err(anyhow::Error::new(e).context("Terminal input failed")),
                None => break Ok(()),
            },
        }
    };

    app.shutdown();
    tracing::info!("preview finished");
    result
}

/// Run keys without a UI until Ctrl-C or `duration_secs` elapses
async fn run_headless(cfg: &PartyParrotConfig, duration_secs: u64) -> Result<()> {
    let mut animator = new_animator(cfg);

    let ids: Vec<InstanceId> = (1..=cfg.initial_keys.max(1))
        .map(|n| InstanceId::new(format!("key-{}", n)))
        .collect();
    for id in &ids {
        animator.on_appear(id.clone(), Arc::new(LogSurface::new(id.as_str())));
    }
    tracing::info!(keys = ids.len(), "headless run started");

    if duration_secs == 0 {
        tokio::signal::ctrl_c().await.context("Failed to wait for Ctrl-C")?;
    } else {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => signal.context("Failed to wait for Ctrl-C")?,
            _ = tokio::time::sleep(Duration::from_secs(duration_secs)) => {}
        }
    }

    for id in &ids {
        animator.on_disappear(id);
    }
    tracing::info!("headless run finished");
    Ok(())
}
