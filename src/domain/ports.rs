use crate::domain::model::{
    LoadReport, PageSnapshot, ScrollPolicy, SelectorSet, TransformResult,
};
use crate::utils::error::{HarvestError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn create_dir(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn search_url(&self) -> &str;
    fn markup_path(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn scroll_policy(&self) -> ScrollPolicy;
    fn selectors(&self) -> &SelectorSet;
    fn title_max_chars(&self) -> usize;
    fn reuse_markup(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<PageSnapshot>;
    async fn transform(&self, snapshot: &PageSnapshot) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<LoadReport>;
}

/// Starts browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// A single open browser tab.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Evaluates `script` in the page; scripts without a value yield `Null`.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;

    async fn page_source(&self) -> Result<String>;

    /// Releases the tab and the browser behind it.
    async fn close(self: Box<Self>) -> Result<()>;

    async fn scroll_height(&self) -> Result<u64> {
        let value = self.execute_js("document.body.scrollHeight").await?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h as u64))
            .ok_or_else(|| {
                HarvestError::browser(format!("scrollHeight is not a number: {}", value))
            })
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.execute_js("window.scrollTo(0, document.body.scrollHeight)")
            .await?;
        Ok(())
    }
}
