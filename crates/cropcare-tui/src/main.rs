use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use cropcare_core::config::{FileConfig, Overrides, resolve};
use cropcare_core::theme::{FileStore, MemoryStore, PreferenceStore};
use cropcare_core::{ApiClient, AppState, ThemeService};

mod action;
mod app;
mod backend;
mod input;
mod logging;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;

/// CropCare TUI: crop-disease detection dashboard in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Backend base URL
    #[arg(long)]
    url: Option<String>,

    /// Latitude for the weather card
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude for the weather card
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Request timeout in seconds (0 = none)
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file (default: ~/.config/cropcare/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for saved reports (default: Downloads)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Open the dashboard directly, without the login form
    #[arg(long)]
    no_login: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    let _log_guard = logging::init(&log_dir)?;

    // Resolve config from CLI flags > env vars > config file > defaults
    let file_config = match args.config.clone().or_else(FileConfig::default_path) {
        Some(path) => FileConfig::load(&path)?,
        None => FileConfig::default(),
    };
    let overrides = Overrides {
        url: args.url.clone(),
        latitude: args.lat,
        longitude: args.lon,
        timeout: args.timeout,
    };
    let config = resolve(overrides, |k| std::env::var(k).ok(), file_config);
    let client = ApiClient::new(&config)?;
    tracing::info!(base_url = client.base_url(), "starting");

    let store: Box<dyn PreferenceStore> = match FileStore::default_location() {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!("theme preference will not persist: {e}");
            Box::new(MemoryStore::default())
        }
    };
    let colorfgbg = std::env::var("COLORFGBG").ok();
    let theme = ThemeService::load(store, theme::system_prefers_dark(colorfgbg.as_deref()));

    let export_dir = args.export_dir.clone().unwrap_or_else(cropcare_reporting::download_dir);
    let mut app = App::new(AppState::new(theme), client.base_url().to_string(), export_dir);
    if args.no_login {
        app.skip_login();
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let tick_rate = Duration::from_millis(100);

    loop {
        for command in app.take_commands() {
            backend::spawn(command, client.clone(), tx.clone(), cancel.child_token());
        }

        terminal.draw(|f| app.view(f))?;

        let mode = app.input_mode();
        tokio::select! {
            Some(backend_event) = rx.recv() => {
                app.handle_backend_event(backend_event);
                // Drain any additional queued backend events
                while let Ok(evt) = rx.try_recv() {
                    app.handle_backend_event(evt);
                }
            }
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        app.update(input::map_event(&evt, mode));
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    tracing::info!("exiting");

    Ok(())
}
