use std::io;
use std::path::Path;

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use sprite_walk::app::App;
use sprite_walk::config::{self, CliArgs, Config};
use sprite_walk::driver::{SharedMotion, TickDriver};
use sprite_walk::error::SpriteError;
use sprite_walk::event::{Event, EventHandler};
use sprite_walk::replay::{self, ReplayPlan};
use sprite_walk::ui;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    if cli.print_default_config {
        print!("{}", config::default_config_toml());
        return Ok(());
    }

    if let Some(ticks) = cli.headless {
        color_eyre::install()?;
        let config = config::load(&cli)?;
        init_logging(&config.general.log_level, LogTarget::Stderr)?;
        return run_headless(&config, &cli, ticks);
    }

    // Initialize color-eyre with custom panic hook that restores terminal
    install_panic_hook();
    let config = config::load(&cli)?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = match cli.log {
        Some(ref path) => init_logging(&config.general.log_level, LogTarget::File(path))?,
        None => init_logging("off", LogTarget::Sink)?,
    };

    info!("sprite-walk starting");
    run_tui(&config).await?;
    info!("sprite-walk exiting");
    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    let sheet = config.sprite_sheet()?;

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| SpriteError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Stage is the terminal minus its border
    let size = terminal.size()?;
    let motion = SharedMotion::new(
        config.build_controller(&sheet, i32::from(size.width.saturating_sub(2)))?,
    );

    let mut event_handler = EventHandler::new();
    let tick_tx = event_handler.sender();
    let driver = TickDriver::spawn(motion.clone(), config.tick_period(), move |_| {
        tick_tx.send(Event::Tick).is_ok()
    });

    let mut app = App::new(motion.clone(), sheet, config);

    // ── Main event loop ───────────────────────────────────────────────
    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        match event_handler.next().await {
            Some(event) => app.handle_event(event),
            None => break,
        }
        if app.should_quit {
            break;
        }
    }

    // Stop ticking before the stage goes away
    driver.shutdown().await;
    motion.detach();
    event_handler.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_headless(config: &Config, cli: &CliArgs, ticks: u32) -> Result<()> {
    let sheet = config.sprite_sheet()?;
    let motion = SharedMotion::new(config.build_controller(&sheet, cli.width)?);
    let plan = ReplayPlan {
        ticks,
        touch: cli.touch,
        release_after: cli.release_after,
        tick_ms: config.tick_period().as_millis() as u64,
    };
    info!("headless run: {} ticks", ticks);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    replay::run(&motion, &plan, &mut out)?;
    motion.detach();
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        // Call default handler
        default_hook(panic_info);
    }));
    color_eyre::install().ok();
}

enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    /// Can't log to stdout in a TUI
    Sink,
}

/// Initialize tracing; `RUST_LOG` takes precedence over `level`
fn init_logging(level: &str, target: LogTarget<'_>) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    match target {
        LogTarget::File(path) => {
            let file = std::fs::File::create(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
            Ok(None)
        }
        LogTarget::Sink => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .with_writer(io::sink)
                .init();
            Ok(None)
        }
    }
}
