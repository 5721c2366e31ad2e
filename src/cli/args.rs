use std::path::PathBuf;

use clap::Parser;

use crate::{Commands, Config, Result};

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    name = "kinotes",
    version,
    about = "Personal notes with tags, colours and favourites"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored notes and session state
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Loads the configuration file, then applies command-line overrides.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match self.config.clone().or_else(Config::default_path) {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }

        Ok(config)
    }
}
