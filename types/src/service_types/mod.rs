//! The Publish service types. Only the server-authored fields appear; the
//! diagnostic info arrays of the full protocol are a session-layer concern
//! and are left to the transport.

mod notification_message;

use crate::{
    data_value::DataValue, date_time::DateTime, request_header::RequestHeader,
    response_header::ResponseHeader, status_code::StatusCode,
};

/// A single changed value belonging to one monitored item, identified to the
/// client by the handle it supplied at item creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredItemNotification {
    pub client_handle: u32,
    pub value: DataValue,
}

/// The one notification kind this server produces: a batch of changed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataChangeNotification {
    pub monitored_items: Option<Vec<MonitoredItemNotification>>,
}

/// The sequence-numbered payload of a publish response. A keep-alive carries
/// no notification data at all; a data-bearing message carries exactly one
/// `DataChangeNotification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NotificationMessage {
    pub sequence_number: u32,
    pub publish_time: DateTime,
    pub notification_data: Option<Vec<DataChangeNotification>>,
}

/// A client acknowledgement of a previously received notification message,
/// releasing it from the server's retransmission queue.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionAcknowledgement {
    pub subscription_id: u32,
    pub sequence_number: u32,
}

/// The client side of the publish rendezvous. Requests carry no payload of
/// their own beyond acknowledgements; they exist to be banked by the server
/// and answered when a subscription has something to say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PublishRequest {
    pub request_header: RequestHeader,
    pub subscription_acknowledgements: Option<Vec<SubscriptionAcknowledgement>>,
}

/// The server side of the publish rendezvous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PublishResponse {
    pub response_header: ResponseHeader,
    /// The subscription this response speaks for
    pub subscription_id: u32,
    /// Sequence numbers currently held for retransmission, newest first
    pub available_sequence_numbers: Option<Vec<u32>>,
    /// True when further notifications were queued than fitted in this response
    pub more_notifications: bool,
    pub notification_message: NotificationMessage,
    /// One status per acknowledgement in the request being answered
    pub results: Option<Vec<StatusCode>>,
}
