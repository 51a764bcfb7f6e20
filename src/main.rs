//! geoviz-wizard - main entry point
//!
//! Launches the terminal wizard, or runs a headless check when asked to.

use anyhow::{Context, Result};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use geoviz_wizard::api::{HttpVisualizationApi, VisualizationApi};
use geoviz_wizard::app::App;
use geoviz_wizard::cli::{Cli, Commands, ConfigCommands};
use geoviz_wizard::config_file::WizardConfig;
use geoviz_wizard::output::run_check;

const DEFAULT_LOG_FILE: &str = "geoviz-wizard.log";

fn env_filter(default_level: &str) -> EnvFilter {
    // RUST_LOG overrides the default level
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Log to a file so the alternate screen stays clean
fn init_file_logger(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Log to stderr for headless commands
fn init_stderr_logger() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        None => run_wizard(cli.config.as_deref(), cli.log_file.as_deref(), None),
        Some(Commands::Wizard { ref input }) => {
            run_wizard(cli.config.as_deref(), cli.log_file.as_deref(), input.as_deref())
        }
        Some(Commands::Check { ref input, json, stats }) => {
            init_stderr_logger()?;
            run_check_command(cli.config.as_deref(), input, json, stats)
        }
        Some(Commands::Config { ref action }) => {
            init_stderr_logger()?;
            run_config_command(cli.config.as_deref(), action)
        }
    }
}

fn build_api(config: &WizardConfig) -> Result<Arc<dyn VisualizationApi>> {
    let api = HttpVisualizationApi::new(config).context("Failed to build HTTP client")?;
    Ok(Arc::new(api))
}

/// Run the interactive wizard
fn run_wizard(config_path: Option<&Path>, log_file: Option<&Path>, input: Option<&str>) -> Result<()> {
    let log_path: PathBuf = log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE));
    init_file_logger(&log_path)?;
    info!("geoviz-wizard starting up (log: {:?})", log_path);

    let config = WizardConfig::resolve(config_path)?;
    debug!("Effective configuration: {:?}", config);
    let api = build_api(&config)?;

    let mut app = match input {
        Some(text) => App::with_input(config, api, text),
        None => App::new(config, api),
    };

    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| app.run(&mut terminal).map_err(anyhow::Error::from));

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen);

    if let Err(ref e) = result {
        error!("Wizard exited with error: {:#}", e);
    }
    info!("geoviz-wizard shutting down");
    result
}

/// Headless validation and recommendation
fn run_check_command(config_path: Option<&Path>, input: &str, json: bool, stats: bool) -> Result<()> {
    let config = WizardConfig::resolve(config_path)?;
    let api = build_api(&config)?;

    let output = run_check(api.as_ref(), &config, input, stats);
    if json {
        println!("{}", output.to_json().context("Failed to serialize report")?);
    } else {
        println!("{}", output.to_text());
    }

    let code = output.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn run_config_command(config_path: Option<&Path>, action: &ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let config = WizardConfig::resolve(config_path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Validate { path } => {
            info!("Validating configuration file: {:?}", path);
            match WizardConfig::load_from_file(path).and_then(|c| c.validate()) {
                Ok(()) => println!("✓ Configuration file is valid: {}", path.display()),
                Err(e) => {
                    error!("Configuration validation failed: {:#}", e);
                    eprintln!("✗ Configuration validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        ConfigCommands::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            WizardConfig::default().save_to_file(path)?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
    }
    Ok(())
}
