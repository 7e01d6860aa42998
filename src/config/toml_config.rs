use crate::adapters::chromium::LaunchOptions;
use crate::domain::model::{ScrollPolicy, SelectorSet, DEFAULT_TITLE_MAX_CHARS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{
    validate_path, validate_range, validate_selector, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str = "https://arxiv.org/search/cs?query=Machine+Learning&searchtype=all&abstracts=show&order=-announced_date_first&size=50";

const MAX_SCROLL_INTERVAL_MS: u64 = 60_000;

/// Harvest settings. Every key is optional; missing keys keep the built-in
/// defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub acquisition: AcquisitionConfig,
    pub selectors: SelectorSet,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub scroll_interval_ms: u64,
    pub stable_reads: usize,
    /// `0` disables the bound.
    pub max_scroll_rounds: usize,
    pub headless: bool,
    pub chromium_path: Option<PathBuf>,
    pub navigation_timeout_secs: u64,
    /// Parse the existing markup file instead of launching a browser.
    pub reuse_markup: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            scroll_interval_ms: 2_000,
            stable_reads: 1,
            max_scroll_rounds: 50,
            headless: true,
            chromium_path: None,
            navigation_timeout_secs: 30,
            reuse_markup: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub markup_file: String,
    pub dir: String,
    pub title_max_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            markup_file: "arxiv_page.html".to_string(),
            dir: "papers_txt".to_string(),
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }
}

fn env_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| HarvestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ARXIV_QUERY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            executable: self.acquisition.chromium_path.clone(),
            headless: self.acquisition.headless,
            navigation_timeout: Duration::from_secs(self.acquisition.navigation_timeout_secs),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn search_url(&self) -> &str {
        &self.source.url
    }

    fn markup_path(&self) -> &str {
        &self.output.markup_file
    }

    fn output_dir(&self) -> &str {
        &self.output.dir
    }

    fn scroll_policy(&self) -> ScrollPolicy {
        ScrollPolicy {
            interval: Duration::from_millis(self.acquisition.scroll_interval_ms),
            stable_reads: self.acquisition.stable_reads,
            max_rounds: match self.acquisition.max_scroll_rounds {
                0 => None,
                n => Some(n),
            },
        }
    }

    fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    fn title_max_chars(&self) -> usize {
        self.output.title_max_chars
    }

    fn reuse_markup(&self) -> bool {
        self.acquisition.reuse_markup
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if !self.acquisition.reuse_markup {
            validate_url("source.url", &self.source.url)?;
        }

        validate_path("output.markup_file", &self.output.markup_file)?;
        validate_path("output.dir", &self.output.dir)?;
        validate_range("output.title_max_chars", self.output.title_max_chars, 1, 200)?;

        validate_range(
            "acquisition.scroll_interval_ms",
            self.acquisition.scroll_interval_ms,
            0,
            MAX_SCROLL_INTERVAL_MS,
        )?;
        validate_range(
            "acquisition.stable_reads",
            self.acquisition.stable_reads,
            1,
            usize::MAX,
        )?;
        validate_range(
            "acquisition.navigation_timeout_secs",
            self.acquisition.navigation_timeout_secs,
            1,
            600,
        )?;

        validate_selector("selectors.entry", &self.selectors.entry)?;
        validate_selector("selectors.title", &self.selectors.title)?;
        validate_selector("selectors.abstract", &self.selectors.abstract_text)?;

        Ok(())
    }
}
