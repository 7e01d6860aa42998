pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    chromium::{ChromiumLauncher, LaunchOptions},
    storage::LocalStorage,
};
pub use config::TomlConfig;
pub use core::{etl::HarvestEngine, pipeline::HarvestPipeline};
pub use domain::model::{PaperFile, ResultEntry, RunReport};
pub use utils::error::{HarvestError, Result};
