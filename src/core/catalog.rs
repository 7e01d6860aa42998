use crate::domain::model::SavedPaper;
use crate::utils::error::Result;
use std::path::Path;

/// Reads every `.txt` file in `dir` back into a [`SavedPaper`], sorted by
/// file name. A missing directory yields an empty list.
pub async fn scan_papers(dir: impl AsRef<Path>) -> Result<Vec<SavedPaper>> {
    let dir = dir.as_ref();
    if !tokio::fs::try_exists(dir).await? {
        tracing::warn!("Directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(item) = read_dir.next_entry().await? {
        let path = item.path();
        let is_txt = path.extension().is_some_and(|ext| ext == "txt");
        if is_txt && item.file_type().await?.is_file() {
            names.push(item.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let mut papers = Vec::with_capacity(names.len());
    for name in names {
        let bytes = tokio::fs::read(dir.join(&name)).await?;
        papers.push(SavedPaper::parse(name, &String::from_utf8_lossy(&bytes)));
    }

    tracing::debug!("Found {} paper files in {}", papers.len(), dir.display());
    Ok(papers)
}
