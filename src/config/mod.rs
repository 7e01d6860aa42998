pub mod toml_config;

pub use toml_config::{TomlConfig, DEFAULT_SEARCH_URL};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Command-line flags. Each flag overrides the TOML file (when given) and the
/// built-in defaults; with no flags the harvest runs on the defaults.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "paper-harvest")]
#[command(about = "Save arXiv search results as one text file per paper")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Search results URL to load
    #[arg(long)]
    pub url: Option<String>,

    /// Where the rendered page markup is saved
    #[arg(long)]
    pub markup_file: Option<String>,

    /// Directory receiving one text file per paper
    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long)]
    pub scroll_interval_ms: Option<u64>,

    /// Consecutive unchanged height readings required to stop scrolling
    #[arg(long)]
    pub stable_reads: Option<usize>,

    /// Maximum scroll rounds (0 = unbounded)
    #[arg(long)]
    pub max_scroll_rounds: Option<usize>,

    #[arg(long)]
    pub title_max_chars: Option<usize>,

    #[arg(long)]
    pub chromium_path: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Skip the browser and parse the existing markup file
    #[arg(long)]
    pub reuse_markup: bool,

    /// List the files that would be written without writing them
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML file if one was given, then applies the flags on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let base = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }

    pub fn apply_overrides(&self, mut config: TomlConfig) -> TomlConfig {
        if let Some(url) = &self.url {
            config.source.url = url.clone();
        }
        if let Some(markup_file) = &self.markup_file {
            config.output.markup_file = markup_file.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.dir = output_dir.clone();
        }
        if let Some(interval) = self.scroll_interval_ms {
            config.acquisition.scroll_interval_ms = interval;
        }
        if let Some(stable_reads) = self.stable_reads {
            config.acquisition.stable_reads = stable_reads;
        }
        if let Some(max_rounds) = self.max_scroll_rounds {
            config.acquisition.max_scroll_rounds = max_rounds;
        }
        if let Some(max_chars) = self.title_max_chars {
            config.output.title_max_chars = max_chars;
        }
        if let Some(path) = &self.chromium_path {
            config.acquisition.chromium_path = Some(path.clone());
        }
        if self.headful {
            config.acquisition.headless = false;
        }
        if self.reuse_markup {
            config.acquisition.reuse_markup = true;
        }
        config
    }
}
