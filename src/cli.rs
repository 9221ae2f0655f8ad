use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{FetcherKind, DEFAULT_CONFIG_FILE},
    types::Username,
};

macro_rules! arg_env {
    ($v:literal) => {
        concat!("PLAYSBACK_", $v)
    };
}

/// Recover the clips of a PlaysTV profile from the Internet Archive.
///
/// Every clip found in the archived profile pages is downloaded as `<clip id>.mp4`,
/// in the best quality the archive kept.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// The PlaysTV username whose clips to recover
    #[arg(env=arg_env!("USERNAME"))]
    pub username: Username,

    /// The directory to save the clips to. Created if it does not exist.
    /// Defaults to the current directory
    #[arg(long, env=arg_env!("PATH"))]
    pub path: Option<PathBuf>,

    /// Download clips again even if they are already in the directory
    #[arg(long, env=arg_env!("FORCE"))]
    pub force: bool,

    /// Do not show the browser window while reading the profile pages
    #[arg(long, env=arg_env!("HEADLESS"))]
    pub headless: bool,

    /// How to read the profile pages
    #[arg(long, value_enum, env=arg_env!("FETCHER"))]
    pub fetcher: Option<FetcherKind>,

    /// The path to an optional TOML file with the advanced settings
    #[arg(long, default_value=DEFAULT_CONFIG_FILE, env=arg_env!("CONFIG"))]
    pub config: PathBuf,

    /// The maximum level of the logs to print
    #[arg(long, default_value_t=tracing::Level::INFO, env=arg_env!("LOG_LEVEL"))]
    pub log_level: tracing::Level,
}
