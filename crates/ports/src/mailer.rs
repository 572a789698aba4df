//! Message delivery boundary contract.

use crate::BoxFuture;
use folio_domain::{DeliveryReceipt, OutgoingMessage};
use folio_shared::Result;

/// Boundary contract for delivering a contact message.
///
/// Failures are `ErrorEnvelope`s; transient ones are classed retriable.
pub trait MailerPort: Send + Sync {
    /// Stable provider name, used in logs.
    fn provider(&self) -> &str;

    /// Deliver `message`.
    fn send(&self, message: OutgoingMessage) -> BoxFuture<'_, Result<DeliveryReceipt>>;
}
