//! Saved command-line defaults.
//!
//! Flag files hold plain CLI tokens, one or more per line, with `#`
//! comments. The global file is merged with a local `.foliorc`, and the
//! command line wins over both for valued options.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR: &str = "folio";
const LOCAL_FILE: &str = ".foliorc";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub no_smooth_scroll: bool,
    pub theme: Option<ThemeMode>,
    pub debounce_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub outbox: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; switches OR together, `other` wins for values.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            no_smooth_scroll: self.no_smooth_scroll || other.no_smooth_scroll,
            theme: other.theme.or(self.theme),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            outbox: other.outbox.clone().or_else(|| self.outbox.clone()),
        }
    }

    fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.watch {
            lines.push("--watch".to_string());
        }
        if self.no_smooth_scroll {
            lines.push("--no-smooth-scroll".to_string());
        }
        if let Some(theme) = self.theme {
            lines.push(format!("--theme {}", theme.as_str()));
        }
        if let Some(ms) = self.debounce_ms {
            lines.push(format!("--debounce-ms {ms}"));
        }
        if let Some(path) = &self.log_file {
            lines.push(format!("--log-file {}", path.display()));
        }
        if let Some(path) = &self.outbox {
            lines.push(format!("--outbox {}", path.display()));
        }
        lines
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR).join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR)
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR).join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join(APP_DIR)
                .join("config");
        }
    }

    PathBuf::from(LOCAL_FILE)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

/// Default outbox location, next to the global config.
pub fn default_outbox_path() -> PathBuf {
    global_config_path()
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("folio-outbox.jsonl"), |dir| dir.join("outbox.jsonl"))
}

/// Load a flag file. A missing file yields default flags.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` to `path`, creating parent directories.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# folio defaults (saved with --save)".to_string()];
    lines.extend(flags.to_lines());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a flag file if present.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags folio knows out of raw argument tokens.
///
/// Unknown tokens (the program name, the content path, `--save`) are
/// skipped, as are valued flags with a missing or malformed value.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let mut take_value = || {
            inline_value.map(str::to_string).or_else(|| {
                let next = tokens.get(i + 1)?;
                i += 1;
                Some(next.clone())
            })
        };
        match name {
            "--watch" | "-w" => flags.watch = true,
            "--no-smooth-scroll" => flags.no_smooth_scroll = true,
            "--theme" => {
                if let Some(theme) = take_value().as_deref().and_then(ThemeMode::parse) {
                    flags.theme = Some(theme);
                }
            }
            "--debounce-ms" => {
                if let Some(ms) = take_value().and_then(|v| v.parse().ok()) {
                    flags.debounce_ms = Some(ms);
                }
            }
            "--log-file" => flags.log_file = take_value().map(PathBuf::from),
            "--outbox" => flags.outbox = take_value().map(PathBuf::from),
            _ => {}
        }
        i += 1;
    }
    flags
}
