use async_trait::async_trait;

use crate::digest::Digest;
use crate::error::Result;
use crate::notify::Notifier;

/// Prints digests to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn deliver(&self, digest: &Digest, recipients: &[String]) -> Result<()> {
        println!("{}", "═".repeat(60));
        println!("  {}", digest.subject);
        if !recipients.is_empty() {
            println!("  To: {}", recipients.join(", "));
        }
        println!("{}", "═".repeat(60));
        println!("{}", digest.body);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
