//! Demo mailer: simulates a delivery API with latency and random failures.

use folio_ports::{BoxFuture, DeliveryReceipt, MailerPort, OutgoingMessage};
use folio_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Mailer that never leaves the process.
///
/// Each send fails independently with probability `failure_rate_pct / 100`,
/// so a freshly built mailer (one per CLI run) still sees failures.
#[derive(Debug)]
pub struct DemoMailer {
    latency: Duration,
    failure_rate_pct: u32,
    sends: AtomicU64,
    rng: Mutex<StdRng>,
}

impl DemoMailer {
    /// Build with a simulated latency and failure rate (clamped to 100).
    #[must_use]
    pub fn new(latency: Duration, failure_rate_pct: u32) -> Self {
        Self::with_rng(latency, failure_rate_pct, StdRng::from_os_rng())
    }

    /// Same as [`DemoMailer::new`] with a reproducible failure sequence.
    #[must_use]
    pub fn seeded(latency: Duration, failure_rate_pct: u32, seed: u64) -> Self {
        Self::with_rng(latency, failure_rate_pct, StdRng::seed_from_u64(seed))
    }

    fn with_rng(latency: Duration, failure_rate_pct: u32, rng: StdRng) -> Self {
        Self {
            latency,
            failure_rate_pct: failure_rate_pct.min(100),
            sends: AtomicU64::new(0),
            rng: Mutex::new(rng),
        }
    }

    /// Number of send attempts so far.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.sends.load(Ordering::SeqCst)
    }

    fn draw_failure(&self) -> bool {
        match self.failure_rate_pct {
            0 => false,
            100 => true,
            rate => self
                .rng
                .lock()
                .is_ok_and(|mut rng| rng.random_ratio(rate, 100)),
        }
    }
}

impl Default for DemoMailer {
    fn default() -> Self {
        Self::new(Duration::from_millis(2_000), 10)
    }
}

impl MailerPort for DemoMailer {
    fn provider(&self) -> &str {
        "demo"
    }

    fn send(&self, message: OutgoingMessage) -> BoxFuture<'_, Result<DeliveryReceipt>> {
        Box::pin(async move {
            let attempt = self.sends.fetch_add(1, Ordering::SeqCst) + 1;
            let fails = self.draw_failure();
            tokio::time::sleep(self.latency).await;

            if fails {
                return Err(ErrorEnvelope::expected_with_class(
                    ErrorCode::new("mailer", "network"),
                    "Network error",
                    ErrorClass::Retriable,
                )
                .with_metadata("attempt", attempt.to_string())
                .with_metadata("senderDomain", message.sender_domain().to_owned()));
            }

            Ok(DeliveryReceipt {
                message_id: format!("demo-{}", uuid::Uuid::new_v4()).into_boxed_str(),
                accepted_at_ms: now_epoch_ms(),
            })
        })
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}
