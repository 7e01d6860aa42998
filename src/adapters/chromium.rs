//! Chromium-backed browser sessions using chromiumoxide.

use crate::domain::ports::{BrowserLauncher, BrowserSession};
use crate::utils::error::{HarvestError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const CHROMIUM_PATH_ENV: &str = "PAPER_HARVEST_CHROMIUM_PATH";

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub navigation_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

/// Find the Chromium binary: explicit path, then env, then PATH.
pub fn find_chromium(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.clone());
    }

    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    ["google-chrome", "chromium", "chromium-browser"]
        .iter()
        .find_map(|name| which::which(name).ok())
}

pub struct ChromiumLauncher {
    options: LaunchOptions,
}

impl ChromiumLauncher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let chrome_path = find_chromium(self.options.executable.as_ref()).ok_or_else(|| {
            HarvestError::browser(format!(
                "Chromium not found; pass --chromium-path or set {}",
                CHROMIUM_PATH_ENV
            ))
        })?;
        tracing::debug!("Launching Chromium from {}", chrome_path.display());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(self.options.navigation_timeout)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if !self.options.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| HarvestError::browser(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // CDP 事件必須持續被消化，否則 page 呼叫會卡住
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let mut browser = browser;
                let _ = browser.close().await;
                handler_task.abort();
                return Err(e.into());
            }
        };

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            navigation_timeout: self.options.navigation_timeout,
        }))
    }
}

/// One Chromium process with a single tab. Dropping it without `close`
/// still kills the child process.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {
                self.page.wait_for_navigation().await?;
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(HarvestError::browser(format!(
                "navigation timed out after {:?}",
                self.navigation_timeout
            ))),
        }
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self.page.evaluate(script).await?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn page_source(&self) -> Result<String> {
        let html = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await?
            .into_value::<String>()
            .map_err(|e| HarvestError::browser(format!("failed to read page HTML: {e}")))?;
        Ok(html)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumSession {
            mut browser,
            page,
            handler_task,
            ..
        } = *self;

        let _ = page.close().await;
        let closed = browser.close().await;
        let _ = browser.wait().await;
        handler_task.abort();

        closed?;
        tracing::debug!("Browser session closed");
        Ok(())
    }
}
