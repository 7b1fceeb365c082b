//! Local file supplier: the source identifier is a path.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::sources::DocumentSupplier;

/// Reads markdown files from disk, relative to a root directory.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSupplier {
    root: PathBuf,
}

impl LocalFileSupplier {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSupplier for LocalFileSupplier {
    async fn fetch(&self, source: &str) -> Result<Option<String>> {
        let path = self.root.join(source);
        tokio::fs::read_to_string(&path)
            .await
            .map(Some)
            .map_err(|e| AppError::fetch(path.display().to_string(), e))
    }
}
