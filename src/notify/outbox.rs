//! Outbox notifier: drops each digest into a directory as a message file
//! for an external mailer to pick up.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;

use crate::digest::Digest;
use crate::error::{AppError, Result};
use crate::notify::Notifier;

/// Writes digests as files under a directory.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    dir: PathBuf,
    sender: String,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>, sender: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            sender: sender.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn render(&self, digest: &Digest, recipients: &[String]) -> String {
        let mut message = String::new();
        if !self.sender.is_empty() {
            message.push_str(&format!("From: {}\n", self.sender));
        }
        message.push_str(&format!("To: {}\n", recipients.join(", ")));
        message.push_str(&format!("Subject: {}\n\n", digest.subject));
        message.push_str(&digest.body);
        message
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn deliver(&self, digest: &Digest, recipients: &[String]) -> Result<()> {
        let name = format!(
            "{}-{}.{}",
            Utc::now().format("%Y%m%dT%H%M%S%3f"),
            digest.count,
            digest.format.extension()
        );
        let path = self.dir.join(name);
        let failed = |e: std::io::Error| AppError::delivery(format!("{}: {}", path.display(), e));

        tokio::fs::create_dir_all(&self.dir).await.map_err(failed)?;
        tokio::fs::write(&path, self.render(digest, recipients))
            .await
            .map_err(failed)?;

        log::info!("Digest written to {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "outbox"
    }
}
