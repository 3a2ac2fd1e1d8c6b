use std::sync::{Arc, RwLock};

use crate::prelude::*;


/// Scheduler double that records registrations and hands out ascending ids.
pub struct TestScheduler {
    next_callback_id: CallbackId,
    pub active: Vec<(CallbackId, PublishTarget, f64)>,
}

impl TestScheduler {
    pub fn new() -> TestScheduler {
        TestScheduler {
            next_callback_id: 1,
            active: Vec::new(),
        }
    }
}

impl Scheduler for TestScheduler {
    fn add_repeated_callback(&mut self, target: PublishTarget, period_ms: f64) -> CallbackId {
        let callback_id = self.next_callback_id;
        self.next_callback_id += 1;
        self.active.push((callback_id, target, period_ms));
        callback_id
    }

    fn remove_repeated_callback(&mut self, callback_id: CallbackId) {
        self.active.retain(|(id, _, _)| *id != callback_id);
    }
}

/// Channel double that records every response passed to it.
pub struct TestChannel {
    pub sent: Vec<(u32, PublishResponse)>,
}

impl TestChannel {
    pub fn new() -> TestChannel {
        TestChannel { sent: Vec::new() }
    }
}

impl MessageSender for TestChannel {
    fn send_symmetric(&mut self, request_id: u32, response: PublishResponse) {
        self.sent.push((request_id, response));
    }
}

/// A channel double plus the type-erased handle the engine wants.
pub fn test_channel() -> (Arc<RwLock<TestChannel>>, MessageSenderRef) {
    let channel = Arc::new(RwLock::new(TestChannel::new()));
    let sender: MessageSenderRef = channel.clone();
    (channel, sender)
}

pub fn make_publish_request(request_handle: u32) -> PublishRequest {
    PublishRequest {
        request_header: RequestHeader::new(request_handle),
        subscription_acknowledgements: None,
    }
}

pub fn enqueue_publish_request(
    subscriptions: &mut Subscriptions,
    now: &DateTimeUtc,
    request_id: u32,
    channel: &MessageSenderRef,
) {
    let request = make_publish_request(request_id);
    subscriptions
        .enqueue_publish_request(now, request_id, request, Some(channel))
        .unwrap();
}

/// Pull the client handle / value pairs out of a publish response.
pub fn notification_values(response: &PublishResponse) -> Vec<(u32, i32)> {
    let mut out = Vec::new();
    if let Some(ref data) = response.notification_message.notification_data {
        for notification in data {
            if let Some(ref items) = notification.monitored_items {
                for item in items {
                    if let Some(Variant::Int32(v)) = item.value.value {
                        out.push((item.client_handle, v));
                    }
                }
            }
        }
    }
    out
}
