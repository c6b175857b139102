use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use typemaster::{
    app::{App, Flow, TICK_RATE_MS},
    app_dirs::AppDirs,
    challenge::ChallengeKind,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    engine::Engine,
    notifier::LogNotifier,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    store::AppStore,
    text::{Difficulty, TextProvider},
    theme::Theme,
};

/// typing practice tui with live wpm, accuracy, key heatmap and challenges
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice typing on curated or custom texts with live WPM and accuracy, a per-key error heatmap, goal challenges and themed colours."
)]
pub struct Cli {
    /// difficulty tier of the practice text (defaults to the saved preference)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// custom text to practice on, at least 10 characters
    #[clap(short = 'p', long, conflicts_with = "challenge")]
    text: Option<String>,

    /// colour theme for this run (defaults to the saved preference)
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// start directly in a challenge
    #[clap(short = 'c', long, value_enum)]
    challenge: Option<ChallengeKind>,

    /// seed for text selection, for repeatable runs
    #[clap(long)]
    seed: Option<u64>,

    /// log level used when TYPEMASTER_LOG and RUST_LOG are unset
    #[clap(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(text) = &cli.text {
        if let Err(e) = TextProvider::accept_custom(text) {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::ValueValidation, e).exit();
        }
    }

    let _log_guard = init_logging(&cli.log_level);

    let config_store = FileConfigStore::new();
    let config = config_store.load();
    let mut app = build_app(&cli, config, Box::new(config_store))?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!(sessions = app.store.history.len(), "exiting");
    result
}

/// Logs go to a file in the state directory; the terminal belongs to the UI.
fn init_logging(level: &str) -> Option<WorkerGuard> {
    let default_filter = format!("typemaster={level}");
    let filter = EnvFilter::try_from_env("TYPEMASTER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| default_filter.into());

    let dir = AppDirs::log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: could not create log directory {dir:?}: {e}");
        return None;
    }

    let appender = tracing_appender::rolling::never(&dir, "typemaster.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

/// CLI flags override the saved preferences for this run only
fn build_app(
    cli: &Cli,
    config: Config,
    config_store: Box<dyn ConfigStore>,
) -> Result<App, Box<dyn Error>> {
    let provider = match cli.seed {
        Some(seed) => TextProvider::with_seed(seed)?,
        None => TextProvider::new()?,
    };
    let difficulty = cli.difficulty.unwrap_or(config.difficulty);
    let theme = cli.theme.unwrap_or(config.theme);

    let notifier = LogNotifier::new(config.muted);
    let muted = notifier.mute_handle();
    let mut engine = Engine::new(provider, difficulty, Box::new(notifier), Box::new(SystemClock));

    if let Some(kind) = cli.challenge {
        engine.start_challenge(kind);
    } else if let Some(text) = &cli.text {
        engine.use_custom_text(text)?;
    }

    tracing::info!(%difficulty, %theme, "starting");
    Ok(App::new(engine, AppStore::new(theme), config, config_store, muted))
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        let size = terminal.size()?;
        app.set_viewport(size.width, size.height);
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if app.handle_event(runner.step()) == Flow::Quit {
            break;
        }
    }

    Ok(())
}
