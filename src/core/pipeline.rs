use crate::core::extract::EntryExtractor;
use crate::core::scroll::scroll_until_stable;
use crate::core::{
    BrowserLauncher, BrowserSession, ConfigProvider, PageSnapshot, Pipeline, Storage,
    TransformResult,
};
use crate::domain::model::{LoadReport, PaperFile, ScrollOutcome};
use crate::utils::error::{HarvestError, Result};
use std::path::Path;

pub struct HarvestPipeline<S: Storage, C: ConfigProvider, B: BrowserLauncher> {
    storage: S,
    config: C,
    launcher: B,
}

impl<S: Storage, C: ConfigProvider, B: BrowserLauncher> HarvestPipeline<S, C, B> {
    pub fn new(storage: S, config: C, launcher: B) -> Self {
        Self {
            storage,
            config,
            launcher,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    async fn capture(&self, session: &mut dyn BrowserSession) -> Result<(String, ScrollOutcome)> {
        session.navigate(self.config.search_url()).await?;
        let outcome = scroll_until_stable(&*session, &self.config.scroll_policy()).await?;
        let html = session.page_source().await?;
        Ok((html, outcome))
    }

    fn output_path(&self, file_name: &str) -> String {
        Path::new(self.config.output_dir())
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, B: BrowserLauncher> Pipeline for HarvestPipeline<S, C, B> {
    async fn extract(&self) -> Result<PageSnapshot> {
        let markup_path = self.config.markup_path().to_string();

        if self.config.reuse_markup() {
            let data = self.storage.read_file(&markup_path).await?;
            tracing::info!("Reusing saved markup {} ({} bytes)", markup_path, data.len());
            return Ok(PageSnapshot {
                markup_path,
                bytes: data.len(),
                scroll: None,
            });
        }

        let mut session = self.launcher.launch().await?;
        let captured = self.capture(session.as_mut()).await;

        // 不論成功與否都要關閉瀏覽器
        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close browser session cleanly: {}", e);
        }
        let (html, outcome) = captured?;

        if outcome.converged {
            tracing::info!(
                "Page settled after {} scroll rounds at height {}",
                outcome.rounds,
                outcome.final_height
            );
        } else {
            tracing::info!(
                "Stopped scrolling after {} rounds at height {} before the page settled",
                outcome.rounds,
                outcome.final_height
            );
        }

        self.storage
            .write_file(&markup_path, html.as_bytes())
            .await?;
        tracing::debug!("Saved {} bytes of markup to {}", html.len(), markup_path);

        Ok(PageSnapshot {
            markup_path,
            bytes: html.len(),
            scroll: Some(outcome),
        })
    }

    async fn transform(&self, snapshot: &PageSnapshot) -> Result<TransformResult> {
        let data = self.storage.read_file(&snapshot.markup_path).await?;
        let markup = String::from_utf8(data).map_err(|e| {
            HarvestError::processing(format!(
                "{} is not valid UTF-8: {}",
                snapshot.markup_path, e
            ))
        })?;

        let extractor = EntryExtractor::new(self.config.selectors())?;
        let entries = extractor.extract(&markup);

        if entries.is_empty() {
            tracing::warn!(
                "No entries matched `{}` in {}; the page layout may have changed",
                self.config.selectors().entry,
                snapshot.markup_path
            );
        } else {
            tracing::debug!("Matched {} entries", entries.len());
        }

        let max_chars = self.config.title_max_chars();
        let files = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| PaperFile::from_entry(i + 1, entry, max_chars))
            .collect();

        Ok(TransformResult { entries, files })
    }

    async fn load(&self, result: &TransformResult) -> Result<LoadReport> {
        let output_dir = self.config.output_dir().to_string();
        self.storage.create_dir(&output_dir).await?;

        let mut overwritten = Vec::new();
        for file in &result.files {
            let path = self.output_path(&file.file_name);

            if self.storage.exists(&path).await? {
                let previous = self.storage.read_file(&path).await?;
                if previous != file.content.as_bytes() {
                    tracing::warn!(
                        "Overwriting {} left by an earlier run with different content",
                        path
                    );
                    overwritten.push(file.file_name.clone());
                } else {
                    tracing::debug!("Rewriting unchanged {}", path);
                }
            }

            self.storage.write_file(&path, file.content.as_bytes()).await?;
        }

        tracing::debug!("Wrote {} files to {}", result.files.len(), output_dir);

        Ok(LoadReport {
            output_dir,
            files_written: result.files.len(),
            overwritten,
        })
    }
}
