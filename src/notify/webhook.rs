// src/notify/webhook.rs

//! Webhook notifier for HTTP mail relays.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::digest::Digest;
use crate::error::{AppError, Result};
use crate::models::DigestFormat;
use crate::notify::Notifier;

/// JSON body posted to the relay.
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    format: DigestFormat,
    body: &'a str,
}

/// POSTs digests to a relay endpoint; any non-2xx answer is a failure.
pub struct WebhookNotifier {
    client: Client,
    endpoint: Url,
    sender: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, endpoint: &str, sender: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
            sender: sender.into(),
        })
    }

    fn message<'a>(&'a self, digest: &'a Digest, recipients: &'a [String]) -> RelayMessage<'a> {
        RelayMessage {
            from: &self.sender,
            to: recipients,
            subject: &digest.subject,
            format: digest.format,
            body: &digest.body,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(&self, digest: &Digest, recipients: &[String]) -> Result<()> {
        self.client
            .post(self.endpoint.clone())
            .json(&self.message(digest, recipients))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::delivery(format!("{}: {}", self.endpoint, e)))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_endpoint() {
        assert!(WebhookNotifier::new(Client::new(), "::nope", "").is_err());
    }

    #[test]
    fn test_message_shape() {
        let notifier =
            WebhookNotifier::new(Client::new(), "https://relay.example.com/send", "bot@example.com")
                .unwrap();
        let digest = Digest {
            subject: "1 New Posting".to_string(),
            body: "<html></html>".to_string(),
            format: DigestFormat::Html,
            count: 1,
        };
        let recipients = vec!["me@example.com".to_string()];

        let json = serde_json::to_value(notifier.message(&digest, &recipients)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "bot@example.com",
                "to": ["me@example.com"],
                "subject": "1 New Posting",
                "format": "html",
                "body": "<html></html>",
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_delivery_error() {
        let notifier =
            WebhookNotifier::new(Client::new(), "http://127.0.0.1:9/send", "").unwrap();
        let digest = Digest {
            subject: "s".to_string(),
            body: "b".to_string(),
            format: DigestFormat::Text,
            count: 1,
        };

        let err = notifier.deliver(&digest, &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Delivery(_)));
    }
}
