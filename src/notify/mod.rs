//! Digest delivery.
//!
//! - `ConsoleNotifier`: prints the digest to stdout
//! - `OutboxNotifier`: writes one file per digest into a directory
//! - `WebhookNotifier`: POSTs the digest to a mail relay as JSON
//!
//! Delivery failures are hard errors; the sentinel digest is never sent.

mod console;
mod outbox;
mod webhook;

use async_trait::async_trait;

use crate::digest::Digest;
use crate::error::{AppError, Result};
use crate::models::{NotifyConfig, NotifyMethod};

pub use console::ConsoleNotifier;
pub use outbox::OutboxNotifier;
pub use webhook::WebhookNotifier;

/// Trait for digest delivery backends.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a digest to the recipients.
    async fn deliver(&self, digest: &Digest, recipients: &[String]) -> Result<()>;

    /// Backend name, for logs.
    fn name(&self) -> &'static str;
}

/// Deliver a digest unless it is the "nothing to report" sentinel.
///
/// Returns whether a delivery was made.
pub async fn dispatch(
    notifier: &dyn Notifier,
    digest: &Digest,
    recipients: &[String],
) -> Result<bool> {
    if digest.is_nothing_to_report() {
        log::info!("Nothing to report, skipping delivery");
        return Ok(false);
    }

    notifier.deliver(digest, recipients).await?;
    log::info!(
        "Delivered {} postings via {} to {} recipient(s)",
        digest.count,
        notifier.name(),
        recipients.len()
    );
    Ok(true)
}

/// Build the notifier selected in the configuration.
pub fn from_config(config: &NotifyConfig, client: reqwest::Client) -> Result<Box<dyn Notifier>> {
    let notifier: Box<dyn Notifier> = match config.method {
        NotifyMethod::Console => Box::new(ConsoleNotifier),
        NotifyMethod::Outbox => Box::new(OutboxNotifier::new(&config.outbox_dir, &config.sender)),
        NotifyMethod::Webhook => {
            let endpoint = config
                .webhook_url
                .as_deref()
                .ok_or_else(|| AppError::config("notify.webhook_url is required"))?;
            Box::new(WebhookNotifier::new(client, endpoint, &config.sender)?)
        }
    };
    Ok(notifier)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Notifier that records digests and can be told to fail.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub delivered: Mutex<Vec<Digest>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn count(&self) -> usize {
            self.delivered.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn deliver(&self, digest: &Digest, _recipients: &[String]) -> Result<()> {
            if self.fail {
                return Err(AppError::delivery("relay unavailable"));
            }
            self.delivered.lock().unwrap().push(digest.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }
}
