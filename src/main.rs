//! Folio - a terminal portfolio with scroll-synchronized navigation.
//!
//! # Usage
//!
//! ```bash
//! folio
//! folio my-portfolio.json5 --watch
//! folio --theme light --no-smooth-scroll
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio::app::App;
use folio::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use folio::nav::NavConfig;

/// A terminal portfolio with scroll-synchronized navigation
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    /// Portfolio content file (JSON5); the built-in portfolio when omitted
    #[arg(value_name = "CONTENT")]
    content: Option<PathBuf>,

    /// Watch the content file and reload on change
    #[arg(short, long)]
    watch: bool,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Quiet period before the active section follows a scroll
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Jump to sections instead of animating
    #[arg(long)]
    no_smooth_scroll: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// File that receives contact messages when no mail service is set up
    #[arg(long, value_name = "PATH")]
    outbox: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_ref())?;
    tracing::debug!(?effective, "effective flags");

    if let Some(path) = &cli.content
        && !path.exists()
    {
        anyhow::bail!("File not found: {}", path.display());
    }

    let defaults = NavConfig::default();
    let nav_config = NavConfig {
        debounce_ms: effective.debounce_ms.unwrap_or(defaults.debounce_ms),
        smooth_scroll: !effective.no_smooth_scroll,
        ..defaults
    };

    let mut app = App::new(cli.content)
        .with_watch(effective.watch)
        .with_nav_config(nav_config)
        .with_theme(effective.theme.unwrap_or_default())
        .with_outbox(effective.outbox)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
