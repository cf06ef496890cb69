use std::time::Duration;
use tokio::time::sleep;

/// Spaces out tasks that run back to back against a rate-limited upstream.
///
/// The first call returns immediately and every later call waits the
/// configured delay, so a batch of N items spends (N - 1) delays total.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    primed: bool,
}

impl Pacer {
    #[must_use]
    pub const fn from_millis(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            primed: false,
        }
    }

    /// Waits out the inter-task delay. No-op on the first call.
    pub async fn pace(&mut self) {
        if self.primed {
            sleep(self.delay).await;
        } else {
            self.primed = true;
        }
    }
}
