use std::sync::Mutex;

use chrono;

use uapub_types::service_types::PublishRequest;
use uapub_types::{DateTimeUtc, StatusCode};

use crate::{
    comms::MessageSenderRef, config::ServerConfig, scheduler::Scheduler,
    subscriptions::subscriptions::Subscriptions,
};

lazy_static! {
    static ref LAST_SESSION_ID: Mutex<u32> = Mutex::new(0);
}

fn next_session_id() -> u32 {
    let mut last_session_id = trace_lock_unwrap!(LAST_SESSION_ID);
    *last_session_id += 1;
    *last_session_id
}

/// The state maintained between a client and the publish engine on its
/// behalf: the secure channel the session is currently bound to, and the
/// subscriptions plus banked publish requests that drive publishing.
pub struct Session {
    /// The session identifier
    session_id: u32,
    /// Channel the session is bound to. None once the transport has dropped
    /// it; subscriptions then tick without sending until a channel returns.
    secure_channel: Option<MessageSenderRef>,
    /// Subscriptions and the publish request bank owned by this session
    pub subscriptions: Subscriptions,
    /// Flag indicating the session is terminated
    terminated: bool,
    /// Time of termination, for reaping
    terminated_at: DateTimeUtc,
}

impl Drop for Session {
    fn drop(&mut self) {
        info!("Session {} is being dropped", self.session_id);
    }
}

impl Session {
    pub fn new(config: ServerConfig) -> Session {
        let session_id = next_session_id();
        Session {
            session_id,
            secure_channel: None,
            subscriptions: Subscriptions::new(session_id, config),
            terminated: false,
            terminated_at: chrono::Utc::now(),
        }
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn terminated(&self) -> bool {
        self.terminated
    }

    pub fn terminated_at(&self) -> DateTimeUtc {
        self.terminated_at
    }

    /// Bind the session to a channel, e.g. on activation or reconnect.
    pub fn set_secure_channel(&mut self, channel: MessageSenderRef) {
        self.secure_channel = Some(channel);
    }

    /// Drop the channel binding. Ticks fall silent until a new one arrives.
    pub fn clear_secure_channel(&mut self) {
        self.secure_channel = None;
    }

    pub fn secure_channel(&self) -> Option<&MessageSenderRef> {
        self.secure_channel.as_ref()
    }

    pub fn create_subscription(
        &mut self,
        scheduler: &mut dyn Scheduler,
        publishing_enabled: bool,
        publishing_interval: f64,
        lifetime_count: u32,
        max_keep_alive_count: u32,
        notifications_per_publish: usize,
    ) -> Result<u32, StatusCode> {
        self.subscriptions.create_subscription(
            scheduler,
            publishing_enabled,
            publishing_interval,
            lifetime_count,
            max_keep_alive_count,
            notifications_per_publish,
        )
    }

    /// Delete a subscription. If it was the last one, any banked publish
    /// requests are answered immediately since nothing will ever consume
    /// them.
    pub fn delete_subscription(
        &mut self,
        scheduler: &mut dyn Scheduler,
        now: &DateTimeUtc,
        subscription_id: u32,
    ) -> Result<(), StatusCode> {
        self.subscriptions
            .delete_subscription(scheduler, subscription_id)?;
        self.subscriptions
            .answer_publish_requests_no_subscription(self.secure_channel.as_ref(), now);
        Ok(())
    }

    /// Bank an incoming publish request, resolving its acknowledgements.
    pub fn enqueue_publish_request(
        &mut self,
        now: &DateTimeUtc,
        request_id: u32,
        request: PublishRequest,
    ) -> Result<(), StatusCode> {
        self.subscriptions
            .enqueue_publish_request(now, request_id, request, self.secure_channel.as_ref())
    }

    /// Tick entry point, normally driven by the scheduler on the
    /// subscription's publishing interval.
    pub fn publish_tick(
        &mut self,
        scheduler: &mut dyn Scheduler,
        now: &DateTimeUtc,
        subscription_id: u32,
    ) {
        self.subscriptions.publish_tick(
            scheduler,
            self.secure_channel.as_ref(),
            now,
            subscription_id,
        );
    }

    /// Answer every banked publish request once no subscription remains.
    pub fn answer_publish_requests_no_subscription(&mut self, now: &DateTimeUtc) {
        self.subscriptions
            .answer_publish_requests_no_subscription(self.secure_channel.as_ref(), now);
    }

    /// Answer banked publish requests that have outlived the configured
    /// timeout.
    pub fn expire_stale_publish_requests(&mut self, now: &DateTimeUtc) {
        self.subscriptions
            .expire_stale_publish_requests(now, self.secure_channel.as_ref());
    }

    /// Reset the lifetime counter on the subscription, e.g. because a
    /// service references the subscription.
    pub fn reset_subscription_lifetime_counter(&mut self, subscription_id: u32) {
        if let Some(subscription) = self.subscriptions.get_mut(subscription_id) {
            subscription.reset_lifetime_counter();
        }
    }

    /// Terminate the session, releasing every subscription and answering
    /// whatever publish requests are still banked.
    pub fn close(&mut self, scheduler: &mut dyn Scheduler, now: &DateTimeUtc) {
        info!("Session {} being closed", self.session_id);
        self.subscriptions.clear(scheduler);
        self.subscriptions
            .answer_publish_requests_no_subscription(self.secure_channel.as_ref(), now);
        self.secure_channel = None;
        self.terminated = true;
        self.terminated_at = chrono::Utc::now();
    }
}
