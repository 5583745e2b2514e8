//! Configuration for the Tether front-end
//!
//! This module provides the file-backed configuration store:
//! - XDG-compliant config file location
//! - CLI argument overrides
//! - Environment variable support
//! - Config precedence: runtime edits > CLI > env > file > defaults
//! - User themes declared in the config file
//!
//! The store re-reads its file on every request so edits made while a
//! session is running take effect on the next resize.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tether_core::{ConfigError, Reservation, TerminalOptions, ThemeRecord, ThemeRegistry};
use tether_session::ConfigSource;

/// CLI arguments for Tether
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tether")]
#[command(version)]
#[command(about = "Headless terminal front-end that reports resizes to a remote peer", long_about = None)]
pub struct CliArgs {
    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Theme name (see --list-themes)
    #[arg(short, long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Font family name
    #[arg(long, value_name = "FONT")]
    pub font_family: Option<String>,

    /// Font size in pixels
    #[arg(long, value_name = "SIZE")]
    pub font_size: Option<f32>,

    /// Number of scrollback lines
    #[arg(long, value_name = "LINES")]
    pub scrollback: Option<usize>,

    /// Keep the grid size fixed when the container is resized
    #[arg(long)]
    pub no_fit: bool,

    /// Pixels kept for a vertical scrollbar when fitting
    #[arg(long, value_name = "PX", default_value_t = 0)]
    pub scrollbar_width: u32,

    /// Pixels of padding on each edge of the container
    #[arg(long, value_name = "PX", default_value_t = 0)]
    pub padding: u32,

    /// Initial container width in pixels
    #[arg(long, value_name = "PX", default_value_t = 800)]
    pub width: u32,

    /// Initial container height in pixels
    #[arg(long, value_name = "PX", default_value_t = 480)]
    pub height: u32,

    /// Print the available themes and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Read events from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

impl CliArgs {
    /// Container pixels withheld from the grid
    pub fn reservation(&self) -> Reservation {
        Reservation {
            scrollbar_width: self.scrollbar_width,
            horizontal_padding: self.padding.saturating_mul(2),
            vertical_padding: self.padding.saturating_mul(2),
        }
    }
}

/// On-disk configuration layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub terminal: TerminalOptions,

    /// User themes, keyed by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub themes: BTreeMap<String, ThemeRecord>,
}

impl ConfigFile {
    /// Parse a TOML document
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::Read(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }
}

/// Field overrides layered over the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub theme: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub scrollback: Option<usize>,
    pub fit_on_resize: Option<bool>,
}

impl Overrides {
    /// Overrides from `TETHER_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Overrides from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut overrides = Self {
            theme: lookup("TETHER_THEME"),
            font_family: lookup("TETHER_FONT_FAMILY"),
            ..Self::default()
        };
        if let Some(val) = lookup("TETHER_FONT_SIZE") {
            match val.parse() {
                Ok(size) => overrides.font_size = Some(size),
                Err(_) => log::warn!("Ignoring TETHER_FONT_SIZE={}", val),
            }
        }
        if let Some(val) = lookup("TETHER_SCROLLBACK") {
            match val.parse() {
                Ok(lines) => overrides.scrollback = Some(lines),
                Err(_) => log::warn!("Ignoring TETHER_SCROLLBACK={}", val),
            }
        }
        if let Some(val) = lookup("TETHER_FIT") {
            overrides.fit_on_resize = Some(val == "1" || val.eq_ignore_ascii_case("true"));
        }
        overrides
    }

    /// Overrides from CLI arguments
    pub fn from_args(args: &CliArgs) -> Self {
        Self {
            theme: args.theme.clone(),
            font_family: args.font_family.clone(),
            font_size: args.font_size,
            scrollback: args.scrollback,
            fit_on_resize: args.no_fit.then_some(false),
        }
    }

    fn apply(&self, options: &mut TerminalOptions) {
        if let Some(theme) = &self.theme {
            options.theme = theme.clone();
        }
        if let Some(family) = &self.font_family {
            options.font_family = family.clone();
        }
        if let Some(size) = self.font_size {
            options.font_size = size;
        }
        if let Some(lines) = self.scrollback {
            options.scrollback = lines;
        }
        if let Some(fit) = self.fit_on_resize {
            options.fit_on_resize = fit;
        }
    }
}

struct StoreInner {
    path: Option<PathBuf>,
    env: Overrides,
    cli: Overrides,
    runtime: RefCell<Overrides>,
}

/// File-backed configuration store
///
/// Clones share the same runtime edits.
#[derive(Clone)]
pub struct FileConfig {
    inner: Rc<StoreInner>,
}

impl FileConfig {
    pub fn new(path: Option<PathBuf>, env: Overrides, cli: Overrides) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                path,
                env,
                cli,
                runtime: RefCell::new(Overrides::default()),
            }),
        }
    }

    /// Store for the given CLI arguments and the process environment
    pub fn from_args(args: &CliArgs) -> Self {
        let path = args.config.clone().or_else(Self::default_config_path);
        Self::new(path, Overrides::from_env(), Overrides::from_args(args))
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tether").join("config.toml"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Read the file, or the defaults when there is none
    fn read_file(&self) -> Result<ConfigFile, ConfigError> {
        match &self.inner.path {
            Some(path) if path.exists() => ConfigFile::load_from_file(path),
            _ => Ok(ConfigFile::default()),
        }
    }

    /// Add the file's user themes to `registry`
    pub fn register_themes(&self, registry: &mut ThemeRegistry) -> Result<usize, ConfigError> {
        let file = self.read_file()?;
        let count = file.themes.len();
        for (name, record) in file.themes {
            log::debug!("Registering user theme '{}'", name);
            registry.register(name, record);
        }
        Ok(count)
    }

    /// Toggle fitting for the rest of this run
    pub fn set_fit_on_resize(&self, fit: bool) {
        self.inner.runtime.borrow_mut().fit_on_resize = Some(fit);
    }

    /// Switch theme for the rest of this run
    pub fn set_theme(&self, theme: impl Into<String>) {
        self.inner.runtime.borrow_mut().theme = Some(theme.into());
    }

    /// Write `options` to the config file, keeping its user themes
    pub fn save(&self, options: &TerminalOptions) -> Result<(), ConfigError> {
        let path = self
            .inner
            .path
            .as_ref()
            .ok_or_else(|| ConfigError::Write("Could not determine config path".to_string()))?;
        let themes = match self.read_file() {
            Ok(file) => file.themes,
            Err(e) => {
                log::warn!("Existing config unreadable, saving without user themes: {}", e);
                BTreeMap::new()
            }
        };

        let file = ConfigFile {
            terminal: options.clone(),
            themes,
        };
        let content =
            toml::to_string_pretty(&file).map_err(|e| ConfigError::Write(e.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
        }
        fs::write(path, content).map_err(|e| ConfigError::Write(e.to_string()))?;
        log::info!("Saved configuration to {}", path.display());
        Ok(())
    }
}

impl ConfigSource for FileConfig {
    fn current(&self) -> Result<TerminalOptions, ConfigError> {
        let mut options = self.read_file()?.terminal;
        self.inner.env.apply(&mut options);
        self.inner.cli.apply(&mut options);
        self.inner.runtime.borrow().apply(&mut options);
        options.validate()?;
        Ok(options)
    }
}
