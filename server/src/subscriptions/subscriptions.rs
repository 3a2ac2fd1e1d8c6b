use std::collections::{BTreeMap, VecDeque};

use chrono;

use uapub_types::{
    service_types::{NotificationMessage, PublishRequest, PublishResponse},
    DateTime, DateTimeUtc, ResponseHeader, StatusCode,
};

use crate::{
    comms::MessageSenderRef,
    config::ServerConfig,
    constants,
    scheduler::Scheduler,
    subscriptions::{
        subscription::{Subscription, SubscriptionState},
        PublishResponseEntry,
    },
};

/// The subscriptions belonging to a single session, together with the
/// session's bank of publish requests. The publish tick lives here rather
/// than on the subscription because it consumes from the request bank and,
/// when a lifetime runs out, removes the subscription from under itself.
pub struct Subscriptions {
    /// Session these subscriptions belong to, for scheduler targeting and logs
    session_id: u32,
    /// Engine limits, copied from the server configuration at session creation
    config: ServerConfig,
    /// Live subscriptions keyed by id
    subscriptions: BTreeMap<u32, Subscription>,
    /// Pre-allocated publish responses awaiting a tick, oldest first
    publish_response_queue: VecDeque<PublishResponseEntry>,
    /// The next subscription id to hand out
    next_subscription_id: u32,
}

impl Subscriptions {
    pub fn new(session_id: u32, config: ServerConfig) -> Subscriptions {
        Subscriptions {
            session_id,
            config,
            subscriptions: BTreeMap::new(),
            publish_response_queue: VecDeque::new(),
            next_subscription_id: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn get(&self, subscription_id: u32) -> Option<&Subscription> {
        self.subscriptions.get(&subscription_id)
    }

    pub fn get_mut(&mut self, subscription_id: u32) -> Option<&mut Subscription> {
        self.subscriptions.get_mut(&subscription_id)
    }

    /// Number of publish requests currently banked
    pub fn pending_publish_requests(&self) -> usize {
        self.publish_response_queue.len()
    }

    /// Create a subscription from the requested parameters, revising the
    /// ones the configuration bounds, and schedule its publish callback.
    pub fn create_subscription(
        &mut self,
        scheduler: &mut dyn Scheduler,
        publishing_enabled: bool,
        publishing_interval: f64,
        lifetime_count: u32,
        max_keep_alive_count: u32,
        notifications_per_publish: usize,
    ) -> Result<u32, StatusCode> {
        if self.subscriptions.len() >= self.config.max_subscriptions {
            return Err(StatusCode::BadTooManySubscriptions);
        }

        let revised_interval = if publishing_interval < self.config.min_publishing_interval_ms {
            debug!(
                "Revising publishing interval {} up to {}",
                publishing_interval, self.config.min_publishing_interval_ms
            );
            self.config.min_publishing_interval_ms
        } else {
            publishing_interval
        };
        let revised_notifications_per_publish = if notifications_per_publish == 0
            || notifications_per_publish > self.config.max_notifications_per_publish
        {
            self.config.max_notifications_per_publish
        } else {
            notifications_per_publish
        };
        // A count of 0 asks the server to choose
        let revised_keep_alive_count = if max_keep_alive_count == 0 {
            constants::DEFAULT_KEEP_ALIVE_COUNT
        } else {
            max_keep_alive_count
        };
        let revised_lifetime_count = if lifetime_count == 0 {
            constants::DEFAULT_LIFETIME_COUNT
        } else {
            lifetime_count
        };

        let subscription_id = self.next_subscription_id;
        self.next_subscription_id += 1;

        let mut subscription = Subscription::new(
            self.session_id,
            subscription_id,
            publishing_enabled,
            revised_interval,
            revised_lifetime_count,
            revised_keep_alive_count,
            revised_notifications_per_publish,
            self.config.max_retransmission_queue_size,
        );
        subscription.register_publish_callback(scheduler);
        self.subscriptions.insert(subscription_id, subscription);
        info!(
            "Session {} | created subscription {} with publishing interval {}",
            self.session_id, subscription_id, revised_interval
        );
        Ok(subscription_id)
    }

    /// Delete the subscription with the supplied id, releasing everything it
    /// owns. The caller is expected to follow up with the no-subscription
    /// flush if this was the last one.
    pub fn delete_subscription(
        &mut self,
        scheduler: &mut dyn Scheduler,
        subscription_id: u32,
    ) -> Result<(), StatusCode> {
        match self.subscriptions.remove(&subscription_id) {
            Some(mut subscription) => {
                subscription.teardown(scheduler);
                info!(
                    "Session {} | deleted subscription {}",
                    self.session_id, subscription_id
                );
                Ok(())
            }
            None => Err(StatusCode::BadSubscriptionIdInvalid),
        }
    }

    /// Release every subscription at once, e.g. because the session closed.
    pub fn clear(&mut self, scheduler: &mut dyn Scheduler) {
        for (_, subscription) in self.subscriptions.iter_mut() {
            subscription.teardown(scheduler);
        }
        self.subscriptions.clear();
    }

    /// The Publish service front door. Resolves the request's
    /// acknowledgements against the retransmission queues, pre-allocates the
    /// response envelope and banks it for the next tick with something to
    /// send. When the bank is full the oldest entry is shed with a failure
    /// so the client's newest request is the one that waits.
    pub fn enqueue_publish_request(
        &mut self,
        now: &DateTimeUtc,
        request_id: u32,
        request: PublishRequest,
        channel: Option<&MessageSenderRef>,
    ) -> Result<(), StatusCode> {
        if request.request_header.request_handle == 0 {
            return Err(StatusCode::BadRequestHeaderInvalid);
        }

        if self.publish_response_queue.len() >= self.config.max_pending_publish_requests {
            if let Some(oldest) = self.publish_response_queue.pop_front() {
                warn!(
                    "Session {} | too many publish requests, shedding request {}",
                    self.session_id, oldest.request_id
                );
                let mut response = oldest.response;
                response.response_header.service_result = StatusCode::BadTooManySubscriptions;
                response.response_header.timestamp = DateTime::from(*now);
                Self::send_response(channel, oldest.request_id, response);
            }
        }

        let results = self.process_acknowledgements(&request);
        let response = PublishResponse {
            response_header: ResponseHeader::new_good(&request.request_header),
            results,
            ..Default::default()
        };
        self.publish_response_queue.push_back(PublishResponseEntry {
            request_id,
            response,
            ts: *now,
        });
        debug!(
            "Session {} | banked publish request {}, {} pending",
            self.session_id,
            request_id,
            self.publish_response_queue.len()
        );
        Ok(())
    }

    /// Resolve each acknowledgement in the request against the subscription
    /// it names, producing one status per acknowledgement in request order.
    fn process_acknowledgements(&mut self, request: &PublishRequest) -> Option<Vec<StatusCode>> {
        match request.subscription_acknowledgements {
            Some(ref acknowledgements) => {
                let results = acknowledgements
                    .iter()
                    .map(|ack| {
                        match self.subscriptions.get_mut(&ack.subscription_id) {
                            Some(subscription) => {
                                match subscription.remove_retransmission_message(ack.sequence_number) {
                                    Ok(()) => StatusCode::Good,
                                    Err(status) => status,
                                }
                            }
                            None => StatusCode::BadSubscriptionIdInvalid,
                        }
                    })
                    .collect();
                Some(results)
            }
            None => None,
        }
    }

    /// The publish tick for one subscription. Runs on every expiry of the
    /// subscription's publishing interval, and may be invoked directly to
    /// force an immediate attempt.
    ///
    /// Counts what the monitored items have queued, then either stays silent
    /// while the keep-alive allowance lasts, goes late when no publish
    /// request is banked, or consumes the oldest banked request to carry a
    /// notification message (or keep-alive) back to the client. A data
    /// message is retained for retransmission before the response advertises
    /// the available sequence numbers, so it is immediately acknowledgeable.
    pub fn publish_tick(
        &mut self,
        scheduler: &mut dyn Scheduler,
        channel: Option<&MessageSenderRef>,
        now: &DateTimeUtc,
        subscription_id: u32,
    ) {
        loop {
            let sub = match self.subscriptions.get_mut(&subscription_id) {
                Some(sub) => sub,
                None => return,
            };
            trace!("Subscription {} | publish tick", subscription_id);

            let (notifications, more_notifications) = sub.count_queued_notifications();

            // Nothing to say. Stay silent until a keep-alive is due, then
            // fall through and send one.
            if notifications == 0 {
                sub.current_keep_alive_count += 1;
                if sub.current_keep_alive_count < sub.max_keep_alive_count {
                    return;
                }
                debug!("Subscription {} | sending a keep-alive", subscription_id);
            }

            // Without a channel there is nobody to talk to
            let channel = match channel {
                Some(channel) => channel,
                None => return,
            };

            // Rendezvous with a banked publish request. Preparation below
            // cannot fail, so taking the entry is the point of no return.
            let entry = match self.publish_response_queue.pop_front() {
                Some(entry) => entry,
                None => {
                    debug!(
                        "Subscription {} | cannot send a publish response since the publish queue is empty",
                        subscription_id
                    );
                    if sub.state != SubscriptionState::Late {
                        sub.state = SubscriptionState::Late;
                    } else {
                        sub.current_lifetime_count += 1;
                        if sub.current_lifetime_count > sub.lifetime_count {
                            info!(
                                "Subscription {} | end of lifetime for subscription",
                                subscription_id
                            );
                            let _ = self.delete_subscription(scheduler, subscription_id);
                            self.answer_publish_requests_no_subscription(Some(channel), now);
                        }
                    }
                    return;
                }
            };

            let request_id = entry.request_id;
            let mut response = entry.response;

            // Assemble and stamp the response
            let timestamp = DateTime::from(*now);
            response.response_header.timestamp = timestamp;
            response.subscription_id = subscription_id;
            response.more_notifications = more_notifications;
            if notifications == 0 {
                // A keep-alive advertises the sequence number the next data
                // message will use without consuming it
                response.notification_message =
                    NotificationMessage::keep_alive(sub.preview_sequence_number(), timestamp);
            } else {
                let message = sub.prepare_notification_message(notifications, timestamp);
                // Retained before the snapshot below so the message itself is
                // included in the available sequence numbers
                sub.retain_for_retransmission(message.clone());
                response.notification_message = message;
            }
            response.available_sequence_numbers = sub.available_sequence_numbers();

            sub.state = SubscriptionState::Normal;
            sub.current_keep_alive_count = 0;
            sub.current_lifetime_count = 0;

            debug!(
                "Subscription {} | sending a publish response with {} notifications",
                subscription_id, notifications
            );
            Self::send_response(Some(channel), request_id, response);

            // Go round again while notifications were left behind; the
            // request bank and channel are re-checked each pass
            if !more_notifications {
                return;
            }
        }
    }

    /// When publish requests are banked but the last subscription is gone,
    /// answer them all. Does nothing while any subscription remains, and is
    /// harmless to call repeatedly or after the channel has died.
    pub fn answer_publish_requests_no_subscription(
        &mut self,
        channel: Option<&MessageSenderRef>,
        now: &DateTimeUtc,
    ) {
        if !self.subscriptions.is_empty() {
            return;
        }
        while let Some(entry) = self.publish_response_queue.pop_front() {
            debug!(
                "Session {} | answering publish request {} with BadNoSubscription",
                self.session_id, entry.request_id
            );
            let mut response = entry.response;
            response.response_header.service_result = StatusCode::BadNoSubscription;
            response.response_header.timestamp = DateTime::from(*now);
            Self::send_response(channel, entry.request_id, response);
        }
    }

    /// Answer banked publish requests older than the configured timeout with
    /// BadTimeout, keeping the rest in arrival order.
    pub fn expire_stale_publish_requests(
        &mut self,
        now: &DateTimeUtc,
        channel: Option<&MessageSenderRef>,
    ) {
        let timeout = chrono::Duration::milliseconds(self.config.publish_request_timeout_ms);
        let queue = std::mem::replace(&mut self.publish_response_queue, VecDeque::new());
        for entry in queue {
            if now.signed_duration_since(entry.ts) > timeout {
                warn!(
                    "Session {} | publish request {} has timed out",
                    self.session_id, entry.request_id
                );
                let mut response = entry.response;
                response.response_header.service_result = StatusCode::BadTimeout;
                response.response_header.timestamp = DateTime::from(*now);
                Self::send_response(channel, entry.request_id, response);
            } else {
                self.publish_response_queue.push_back(entry);
            }
        }
    }

    fn send_response(channel: Option<&MessageSenderRef>, request_id: u32, response: PublishResponse) {
        if let Some(channel) = channel {
            let mut channel = trace_write_lock_unwrap!(channel);
            channel.send_symmetric(request_id, response);
        }
    }
}
