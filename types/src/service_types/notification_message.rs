//! Helpers for NotificationMessage
use crate::{
    date_time::DateTime,
    service_types::{DataChangeNotification, MonitoredItemNotification, NotificationMessage},
};

impl NotificationMessage {
    /// Create a data change notification message. Calling this with no
    /// notifications will panic.
    pub fn data_change(
        sequence_number: u32,
        publish_time: DateTime,
        monitored_items: Vec<MonitoredItemNotification>,
    ) -> NotificationMessage {
        if monitored_items.is_empty() {
            panic!("No notifications supplied to data_change()");
        }
        let data_change_notification = DataChangeNotification {
            monitored_items: Some(monitored_items),
        };
        trace!("data change notification = {:?}", data_change_notification);
        NotificationMessage {
            sequence_number,
            publish_time,
            notification_data: Some(vec![data_change_notification]),
        }
    }

    /// Create a keep-alive notification message, proving liveness without
    /// consuming a sequence number.
    pub fn keep_alive(sequence_number: u32, publish_time: DateTime) -> NotificationMessage {
        NotificationMessage {
            sequence_number,
            publish_time,
            notification_data: None,
        }
    }

    pub fn is_keep_alive(&self) -> bool {
        self.notification_data.is_none()
    }

    /// Number of monitored item notifications carried by the message.
    pub fn notification_count(&self) -> usize {
        match self.notification_data {
            Some(ref data) => data
                .iter()
                .map(|n| n.monitored_items.as_ref().map_or(0, |m| m.len()))
                .sum(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_value::DataValue;

    #[test]
    fn keep_alive_carries_nothing() {
        let m = NotificationMessage::keep_alive(5, DateTime::now());
        assert!(m.is_keep_alive());
        assert_eq!(m.sequence_number, 5);
        assert_eq!(m.notification_count(), 0);
    }

    #[test]
    fn data_change_carries_one_data_change_notification() {
        let notifications = vec![
            MonitoredItemNotification {
                client_handle: 100,
                value: DataValue::new(1),
            },
            MonitoredItemNotification {
                client_handle: 200,
                value: DataValue::new(2),
            },
        ];
        let m = NotificationMessage::data_change(1, DateTime::now(), notifications);
        assert!(!m.is_keep_alive());
        assert_eq!(m.notification_count(), 2);
        let data = m.notification_data.unwrap();
        assert_eq!(data.len(), 1);
        let items = data[0].monitored_items.as_ref().unwrap();
        assert_eq!(items[0].client_handle, 100);
        assert_eq!(items[1].client_handle, 200);
    }
}
