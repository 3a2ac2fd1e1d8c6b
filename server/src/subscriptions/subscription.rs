use std::collections::BTreeMap;

use uapub_types::{
    service_types::{MonitoredItemNotification, NotificationMessage},
    DateTime, StatusCode,
};

use crate::{
    scheduler::{CallbackId, PublishTarget, Scheduler},
    subscriptions::{monitored_item::MonitoredItem, retransmission::RetransmissionQueue},
};

/// The state of the subscription
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum SubscriptionState {
    /// Publishing normally, or not yet found wanting
    Normal,
    /// Had something to send but found no publish request banked. One grace
    /// tick, then every further tick in this state counts against the
    /// subscription's lifetime.
    Late,
    /// Counting silent ticks up to the next keep-alive
    KeepAlive,
}

#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    /// Subscription id, unique within the owning session
    pub subscription_id: u32,
    /// Id of the owning session. A non-owning backreference; the session
    /// table is the authority on whether it is still alive.
    pub session_id: u32,
    /// The parameter that requests publishing to be enabled or disabled.
    /// While false, queued values are left where they are and every tick
    /// counts as silent.
    pub publishing_enabled: bool,
    /// Publishing interval in milliseconds
    pub publishing_interval: f64,
    /// Publishing cycles without client activity before the subscription is
    /// terminated
    pub lifetime_count: u32,
    /// Silent publishing cycles before a keep-alive response is due
    pub max_keep_alive_count: u32,
    /// Upper bound on the notifications assembled into a single response
    pub notifications_per_publish: usize,
    /// Consecutive silent ticks so far
    pub current_keep_alive_count: u32,
    /// Ticks spent late without a banked publish request
    pub current_lifetime_count: u32,
    /// State of the subscription
    pub state: SubscriptionState,
    /// Sequence number of the last data-bearing notification message sent
    sequence_number: u32,
    /// Monitored items keyed by id. Ids ascend as items are created, so
    /// iteration order is creation order, which fixes the draining order.
    monitored_items: BTreeMap<u32, MonitoredItem>,
    /// Sent messages retained until acknowledged or evicted
    retransmission_queue: RetransmissionQueue,
    /// The next monitored item id to hand out
    next_monitored_item_id: u32,
    /// Handle from the host scheduler, present iff the publish callback is
    /// registered
    #[serde(skip)]
    publish_callback_id: Option<CallbackId>,
}

impl Subscription {
    pub fn new(
        session_id: u32,
        subscription_id: u32,
        publishing_enabled: bool,
        publishing_interval: f64,
        lifetime_count: u32,
        max_keep_alive_count: u32,
        notifications_per_publish: usize,
        max_retransmission_queue_size: usize,
    ) -> Subscription {
        Subscription {
            subscription_id,
            session_id,
            publishing_enabled,
            publishing_interval,
            lifetime_count,
            max_keep_alive_count,
            notifications_per_publish,
            current_keep_alive_count: 0,
            current_lifetime_count: 0,
            state: SubscriptionState::Normal,
            sequence_number: 0,
            monitored_items: BTreeMap::new(),
            retransmission_queue: RetransmissionQueue::new(max_retransmission_queue_size),
            next_monitored_item_id: 1,
            publish_callback_id: None,
        }
    }

    /// Register a monitored item with the subscription, returning the id it
    /// was assigned. The sampling registration behind the item is the
    /// sampling engine's affair.
    pub fn create_monitored_item(&mut self, client_handle: u32) -> u32 {
        let monitored_item_id = self.next_monitored_item_id;
        self.next_monitored_item_id += 1;
        self.monitored_items.insert(
            monitored_item_id,
            MonitoredItem::new(monitored_item_id, client_handle),
        );
        monitored_item_id
    }

    pub fn get_monitored_item(&self, monitored_item_id: u32) -> Option<&MonitoredItem> {
        self.monitored_items.get(&monitored_item_id)
    }

    pub fn get_monitored_item_mut(&mut self, monitored_item_id: u32) -> Option<&mut MonitoredItem> {
        self.monitored_items.get_mut(&monitored_item_id)
    }

    /// Delete the monitored item with the supplied id, destroying its queue
    /// and any values still held in it.
    pub fn delete_monitored_item(&mut self, monitored_item_id: u32) -> Result<(), StatusCode> {
        match self.monitored_items.remove(&monitored_item_id) {
            Some(_) => Ok(()),
            None => Err(StatusCode::BadMonitoredItemIdInvalid),
        }
    }

    /// Monitored items in draining order
    pub fn monitored_items(&self) -> impl Iterator<Item = &MonitoredItem> {
        self.monitored_items.values()
    }

    pub fn monitored_item_count(&self) -> usize {
        self.monitored_items.len()
    }

    /// Count the values available for the next response, walking items in
    /// draining order and capping the count at notifications per publish.
    /// The second element of the pair says whether anything was left over.
    /// Publishing disabled forces the count to 0 regardless of the queues.
    pub(crate) fn count_queued_notifications(&self) -> (usize, bool) {
        if !self.publishing_enabled {
            return (0, false);
        }
        let mut notifications = 0;
        let mut more_notifications = false;
        for item in self.monitored_items.values() {
            for _ in 0..item.queued_count() {
                if notifications >= self.notifications_per_publish {
                    more_notifications = true;
                    break;
                }
                notifications += 1;
            }
        }
        (notifications, more_notifications)
    }

    /// Assemble the next data-bearing notification message by moving exactly
    /// `notifications` queued values out of the item queues, in the same
    /// order the count walked them. Advances the sequence number.
    pub(crate) fn prepare_notification_message(
        &mut self,
        notifications: usize,
        publish_time: DateTime,
    ) -> NotificationMessage {
        let mut monitored_item_notifications = Vec::with_capacity(notifications);
        for item in self.monitored_items.values_mut() {
            while monitored_item_notifications.len() < notifications {
                match item.dequeue_value() {
                    Some(queued_value) => {
                        monitored_item_notifications.push(MonitoredItemNotification {
                            client_handle: queued_value.client_handle,
                            value: queued_value.value,
                        })
                    }
                    None => break,
                }
            }
            if monitored_item_notifications.len() >= notifications {
                break;
            }
        }
        let sequence_number = self.next_sequence_number();
        debug!(
            "Subscription {} | notification message {} with {} notifications",
            self.subscription_id,
            sequence_number,
            monitored_item_notifications.len()
        );
        NotificationMessage::data_change(sequence_number, publish_time, monitored_item_notifications)
    }

    /// Sequence number of the last data-bearing message, 0 if none was sent
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    #[cfg(test)]
    pub(crate) fn set_sequence_number(&mut self, sequence_number: u32) {
        self.sequence_number = sequence_number;
    }

    /// Advance the sequence number and return it. Wraps past the 32-bit
    /// ceiling to 1, since 0 is reserved.
    fn next_sequence_number(&mut self) -> u32 {
        self.sequence_number = if self.sequence_number == u32::MAX {
            1
        } else {
            self.sequence_number + 1
        };
        self.sequence_number
    }

    /// The sequence number the next data-bearing message will carry. This is
    /// what a keep-alive advertises, without consuming it.
    pub(crate) fn preview_sequence_number(&self) -> u32 {
        if self.sequence_number == u32::MAX {
            1
        } else {
            self.sequence_number + 1
        }
    }

    /// Retain a sent message for retransmission, evicting the oldest if the
    /// configured bound requires it.
    pub(crate) fn retain_for_retransmission(&mut self, message: NotificationMessage) {
        self.retransmission_queue.push(message);
    }

    /// Acknowledge a previously sent notification message.
    pub fn remove_retransmission_message(&mut self, sequence_number: u32) -> Result<(), StatusCode> {
        self.retransmission_queue.remove(sequence_number)
    }

    /// Sequence numbers held for retransmission, newest first. None when the
    /// queue is empty, matching the wire convention of omitting the array.
    pub fn available_sequence_numbers(&self) -> Option<Vec<u32>> {
        if self.retransmission_queue.is_empty() {
            None
        } else {
            Some(self.retransmission_queue.sequence_numbers())
        }
    }

    pub fn retransmission_queue_len(&self) -> usize {
        self.retransmission_queue.len()
    }

    /// Reset the lifetime counter, e.g. because a service call referenced
    /// the subscription and proved the client alive.
    pub fn reset_lifetime_counter(&mut self) {
        self.current_lifetime_count = 0;
    }

    /// Schedule the publish tick at the publishing interval. Idempotent.
    pub fn register_publish_callback(&mut self, scheduler: &mut dyn Scheduler) {
        if self.publish_callback_id.is_some() {
            return;
        }
        let target = PublishTarget {
            session_id: self.session_id,
            subscription_id: self.subscription_id,
        };
        let callback_id = scheduler.add_repeated_callback(target, self.publishing_interval);
        debug!(
            "Subscription {} | registered publish callback {}",
            self.subscription_id, callback_id
        );
        self.publish_callback_id = Some(callback_id);
    }

    /// Cancel the scheduled publish tick. Idempotent.
    pub fn unregister_publish_callback(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(callback_id) = self.publish_callback_id.take() {
            debug!(
                "Subscription {} | unregistered publish callback {}",
                self.subscription_id, callback_id
            );
            scheduler.remove_repeated_callback(callback_id);
        }
    }

    pub fn publish_callback_registered(&self) -> bool {
        self.publish_callback_id.is_some()
    }

    /// Release everything the subscription owns: the publish callback, the
    /// monitored items and their queues, and the retransmission history.
    pub(crate) fn teardown(&mut self, scheduler: &mut dyn Scheduler) {
        self.unregister_publish_callback(scheduler);
        self.monitored_items.clear();
        self.retransmission_queue.clear();
    }
}
