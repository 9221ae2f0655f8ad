use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::ValueEnum;
use config::{Environment, File, FileFormat};
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;

use crate::{cli::Args, extractor::DEFAULT_QUALITIES, types::Quality};

pub const ENV_PREFIX: &str = "PLAYSBACK";
pub const DEFAULT_CONFIG_FILE: &str = "playsback.toml";

/// How profile pages are retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    /// Render the page in Chrome, letting its scripts load the videos
    Browser,
    /// Plain HTTP request, enough for pages archived as static HTML
    Http,
}

/// Scrolling done by the browser to load every video of the profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    /// Give up scrolling after this many key presses
    pub max_iterations: u32,
    /// Count the visible videos every N key presses
    pub check_every: u32,
    /// Stop after this many counts without new videos
    pub max_unchanged: u32,
    pub delay_ms: u64,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            check_every: 10,
            max_unchanged: 5,
            delay_ms: 1000,
        }
    }
}

impl ScrollSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Directory receiving the clips
    pub path: PathBuf,
    /// Download clips even if they are already on disk
    pub force: bool,
    /// Run the browser without a window
    pub headless: bool,
    pub fetcher: FetcherKind,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Encodings to try, for clips whose page does not list them
    pub qualities: Vec<Quality>,
    /// Stop following profile pages after this many
    pub max_pages: usize,
    pub scroll: ScrollSettings,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            force: false,
            headless: false,
            fetcher: FetcherKind::Browser,
            timeout_secs: 30,
            user_agent: concat!("playsback/", env!("CARGO_PKG_VERSION")).to_owned(),
            qualities: DEFAULT_QUALITIES.to_vec(),
            max_pages: 50,
            scroll: ScrollSettings::default(),
        }
    }
}

impl Configuration {
    /// Read the settings from the optional TOML file, then from the environment.
    /// Unspecified settings keep their default value.
    pub fn load(file: &Path) -> Result<Self> {
        let file_name = file.to_string_lossy();

        let config = config::Config::builder()
            .add_source(File::new(&file_name, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("qualities"),
            )
            .build()
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not read configuration from {file_name}"))?;

        let mut config: Self = config
            .try_deserialize()
            .into_diagnostic()
            .wrap_err("Invalid configuration")?;

        if config.qualities.is_empty() {
            config.qualities = DEFAULT_QUALITIES.to_vec();
        }
        if config.scroll.check_every == 0 {
            config.scroll.check_every = 1;
        }

        Ok(config)
    }

    /// Command-line values take precedence over every other source
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(path) = &args.path {
            self.path = path.clone();
        }
        if let Some(fetcher) = args.fetcher {
            self.fetcher = fetcher;
        }
        self.force |= args.force;
        self.headless |= args.headless;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
