use std::collections::VecDeque;

use uapub_types::DataValue;

/// A sampled value waiting to be drained into a publish response, tagged
/// with the client handle it will be reported under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuedValue {
    pub client_handle: u32,
    pub value: DataValue,
}

/// The publisher's view of a monitored item: the identity of the sampling
/// registration and the queue the sampler fills. The subscription drains the
/// queue oldest first; the sampler appends and enforces its own bounds.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoredItem {
    monitored_item_id: u32,
    /// Handle the client chose for this item at creation time
    client_handle: u32,
    /// Sampled values in arrival order, oldest at the front
    queue: VecDeque<QueuedValue>,
}

impl MonitoredItem {
    pub(crate) fn new(monitored_item_id: u32, client_handle: u32) -> MonitoredItem {
        MonitoredItem {
            monitored_item_id,
            client_handle,
            queue: VecDeque::new(),
        }
    }

    pub fn monitored_item_id(&self) -> u32 {
        self.monitored_item_id
    }

    pub fn client_handle(&self) -> u32 {
        self.client_handle
    }

    /// Entry point for the sampling engine. Appends a freshly sampled value
    /// to the queue.
    pub fn enqueue_value(&mut self, value: DataValue) {
        self.queue.push_back(QueuedValue {
            client_handle: self.client_handle,
            value,
        });
    }

    /// Take the oldest queued value, transferring ownership to the caller.
    pub(crate) fn dequeue_value(&mut self) -> Option<QueuedValue> {
        self.queue.pop_front()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
