use std::collections::VecDeque;

use uapub_types::{service_types::NotificationMessage, StatusCode};

/// The notification messages a subscription has sent but the client has not
/// yet acknowledged, newest first. A non-zero bound evicts the oldest message
/// when a new one is retained, so memory per subscription stays fixed no
/// matter how slowly the client acknowledges.
#[derive(Debug, Clone, Serialize)]
pub struct RetransmissionQueue {
    /// Head is the most recently sent message
    messages: VecDeque<NotificationMessage>,
    /// 0 disables the bound
    max_size: usize,
}

impl RetransmissionQueue {
    pub fn new(max_size: usize) -> RetransmissionQueue {
        RetransmissionQueue {
            messages: VecDeque::new(),
            max_size,
        }
    }

    /// Retain a sent message. When the bound is active and reached, the
    /// oldest message is dropped first so the size never exceeds the bound.
    pub fn push(&mut self, message: NotificationMessage) {
        if self.max_size > 0 && self.messages.len() >= self.max_size {
            if let Some(evicted) = self.messages.pop_back() {
                debug!("Evicting notification message {} from the retransmission queue", evicted.sequence_number);
            }
        }
        self.messages.push_front(message);
    }

    /// Acknowledge the message with the supplied sequence number, releasing
    /// it. Numbers that were evicted or never sent are unknown.
    pub fn remove(&mut self, sequence_number: u32) -> Result<(), StatusCode> {
        let found = self
            .messages
            .iter()
            .position(|m| m.sequence_number == sequence_number);
        match found {
            Some(idx) => {
                self.messages.remove(idx);
                Ok(())
            }
            None => Err(StatusCode::BadSequenceNumberUnknown),
        }
    }

    /// The sequence numbers currently held, newest first. This is what a
    /// publish response advertises as acknowledgeable.
    pub fn sequence_numbers(&self) -> Vec<u32> {
        self.messages.iter().map(|m| m.sequence_number).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
