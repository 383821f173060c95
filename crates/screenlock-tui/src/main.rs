//! Screenlock - terminal lock prompt
//!
//! Holds the terminal until the device owner authenticates with the
//! provisioned passcode, or until the locked users are logged out.
//!
//! Exit status: 0 unlocked, 2 logged out, 1 abandoned (still locked).

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zeroize::Zeroizing;

use screenlock_tui::app::{App, TuiConfig};
use screenlock_tui::auth::{hash_passcode, LockStatus, ScreenLockManager};

#[derive(Parser)]
#[command(name = "screenlock", version, about = "Terminal lock prompt")]
struct Cli {
    /// Configuration file (defaults to ~/.config/screenlock/config.json)
    #[arg(long, env = "SCREENLOCK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the lock prompt (default)
    Prompt,
    /// Read a passcode from stdin and print its hash for `passcode_hash`
    HashPasscode,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Prompt) {
        Command::HashPasscode => {
            hash_from_stdin()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Prompt => {
            let config = load_config(cli.config.as_deref())?;
            init_logging(&config)?;
            let status = run_prompt(&config)?;
            Ok(exit_code(status))
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<TuiConfig> {
    match path {
        Some(path) => TuiConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => TuiConfig::load().with_context(|| match TuiConfig::config_file_path() {
            Some(path) => format!("Failed to load config {}", path.display()),
            None => "Failed to load config".to_string(),
        }),
    }
}

/// Log to a file; the terminal belongs to the prompt
fn init_logging(config: &TuiConfig) -> Result<()> {
    let Some(path) = config.log_file_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screenlock_tui=info,screenlock_core=info".into()),
        )
        .init();

    Ok(())
}

fn hash_from_stdin() -> Result<()> {
    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read passcode")?;
    let passcode = line.trim_end_matches(['\r', '\n']);

    let hash = hash_passcode(passcode)?;
    println!("{}", hash);
    Ok(())
}

/// Run the prompt with terminal setup and restoration
fn run_prompt(config: &TuiConfig) -> Result<LockStatus> {
    // Restore the terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let users = std::env::var("USER").map(|user| vec![user]).unwrap_or_default();
    let lock_manager = Arc::new(ScreenLockManager::new(users));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, lock_manager);
    let result = runtime.block_on(app.run(&mut terminal));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Screen readers pick these up from the restored terminal
    let mut stdout = io::stdout();
    for announcement in app.take_announcements() {
        writeln!(stdout, "{}", announcement)?;
    }

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }
    result
}

fn exit_code(status: LockStatus) -> ExitCode {
    match status {
        LockStatus::Unlocked => ExitCode::SUCCESS,
        LockStatus::LoggedOut => ExitCode::from(2),
        LockStatus::Locked => ExitCode::from(1),
    }
}
