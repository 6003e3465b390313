use std::{
    io::{self, Write},
    panic,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tracing::warn;
use tuirealm::{
    PollStrategy,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use ai_assistant::{
    app::App,
    backend::{ApiClient, resolve_base_url_from_env},
    cli::{self, RootCommand},
    logging::{init_logging, print_log_location},
    realm::{RootId, apply_message, init_application, should_quit},
    settings::{Settings, SettingsThemeStore},
    theme::{EphemeralThemeStore, ThemeContext, ThemeMode, ThemeStore},
};

#[derive(Parser, Debug)]
#[command(
    name = "ai-assistant",
    about = "Terminal client for a remote AI coding assistant",
    long_about = "Chat with the assistant, generate front-end and back-end code, and drive repository, testing and task-board operations on a remote AI automation service.",
    version = env!("AI_ASSISTANT_BUILD_VERSION"),
    author
)]
struct Cli {
    /// Base URL of the assistant service.
    #[arg(long, global = true, value_name = "URL")]
    backend_url: Option<String>,

    /// Start in this theme without saving it.
    #[arg(long, value_name = "light|dark")]
    theme: Option<String>,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<RootCommand>,
}

enum RunOutcome {
    Continue,
    Exit(i32),
}

static TERMINAL_RESTORED: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = match init_logging() {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("warning: failed to initialize logging: {err}");
            None
        }
    };
    if let Some(path) = log_path.as_ref() {
        install_panic_hook_with_log(path.clone());
    }

    match run_app().await {
        Ok(RunOutcome::Continue) => {
            if let Some(path) = log_path.as_ref() {
                print_log_location(path);
            }
            Ok(())
        }
        Ok(RunOutcome::Exit(code)) => {
            std::process::exit(code);
        }
        Err(err) => {
            if let Some(path) = log_path.as_ref() {
                print_log_location(path);
            }
            Err(err)
        }
    }
}

async fn run_app() -> Result<RunOutcome> {
    let cli = Cli::parse();
    let settings = Settings::load();
    let base_url =
        resolve_base_url_from_env(cli.backend_url.as_deref(), settings.backend_url.as_deref());
    let client = ApiClient::new(base_url);

    if let Some(command) = cli.command {
        let code = cli::run(&client, command, cli.json, cli.quiet).await;
        return Ok(RunOutcome::Exit(code));
    }

    let theme = match cli.theme.as_deref() {
        None => ThemeContext::load(theme_store()),
        Some(value) => match ThemeMode::from_str(value) {
            Ok(mode) => ThemeContext::with_override(theme_store(), mode),
            Err(()) => {
                eprintln!("error[INVALID_THEME]: expected \"light\" or \"dark\", got {value:?}");
                return Ok(RunOutcome::Exit(2));
            }
        },
    };

    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(theme, client)));
    let mut realm = init_application(Arc::clone(&app))?;

    let mut redraw = true;
    while !should_quit(&app)? {
        if redraw {
            terminal
                .draw(|frame| {
                    let area = frame.area();
                    realm.view(&RootId::Root, frame, area);
                })
                .context("failed to render frame")?;
            redraw = false;
        }

        let messages = realm
            .tick(PollStrategy::Once)
            .context("failed to process tui-realm tick")?;

        if !messages.is_empty() {
            redraw = true;
        }

        for message in messages {
            apply_message(&app, message)?;
        }
    }

    let _ = execute!(io::stdout(), DisableMouseCapture);
    let _ = terminal.disable_raw_mode();
    let _ = terminal.leave_alternate_screen();
    let _ = terminal.clear_screen();
    TERMINAL_RESTORED.store(true, Ordering::SeqCst);

    Ok(RunOutcome::Continue)
}

fn theme_store() -> Box<dyn ThemeStore> {
    match SettingsThemeStore::default_location() {
        Some(store) => Box::new(store),
        None => {
            warn!("no config directory; theme preference will not be saved");
            Box::new(EphemeralThemeStore::default())
        }
    }
}

fn setup_terminal() -> Result<TerminalBridge<CrosstermTerminalAdapter>> {
    TERMINAL_RESTORED.store(false, Ordering::SeqCst);

    let mut terminal =
        TerminalBridge::new_crossterm().context("failed to initialize terminal bridge")?;

    terminal
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    terminal
        .enter_alternate_screen()
        .context("failed to enter alternate screen")?;
    execute!(io::stdout(), EnableMouseCapture).context("failed to enable mouse capture")?;

    Ok(terminal)
}

fn install_panic_hook_with_log(log_path: std::path::PathBuf) {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        eprintln!();
        eprintln!("  Log file: {}", log_path.display());
        eprintln!();
        previous_hook(panic_info);
    }));
}

fn restore_terminal() -> Result<()> {
    if TERMINAL_RESTORED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let _ = disable_raw_mode();

    let mut stderr = io::stderr();
    let _ = execute!(
        stderr,
        LeaveAlternateScreen,
        DisableMouseCapture,
        Show,
        ResetColor
    );
    let _ = stderr.flush();

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}
