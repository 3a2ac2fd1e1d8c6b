//! Everything a session keeps to drive the Publish service: its set of
//! subscriptions, the monitored item queues they drain, the retransmission
//! history of what was sent, and the banked publish requests waiting to be
//! answered.

use uapub_types::{service_types::PublishResponse, DateTimeUtc};

pub mod monitored_item;
pub mod retransmission;
pub mod subscription;
pub mod subscriptions;

/// A pre-allocated response envelope together with the id of the publish
/// request it will answer. Banked when the request arrives, consumed FIFO by
/// the first tick with something to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishResponseEntry {
    pub request_id: u32,
    pub response: PublishResponse,
    /// When the request was banked. Entries past the configured age are
    /// answered with BadTimeout.
    pub ts: DateTimeUtc,
}
