//! The subscription publish engine of an OPC UA server. A session banks the
//! publish requests its client sends in advance; subscriptions tick on their
//! publishing interval, drain the value queues of their monitored items into
//! notification messages, and consume a banked request to carry each message
//! back to the client. Sent messages are retained for retransmission until
//! the client acknowledges them or a configured bound evicts them.
//!
//! The transport, the sampling engine and the timer service are all external
//! collaborators, consumed through the narrow seams in [`comms`] and
//! [`scheduler`].

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate uapub_types;

pub mod comms;
pub mod config;
pub mod constants;
pub mod scheduler;
pub mod session;
pub mod subscriptions;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::comms::*;
    pub use crate::config::*;
    pub use crate::constants;
    pub use crate::scheduler::*;
    pub use crate::session::*;
    pub use crate::subscriptions::monitored_item::*;
    pub use crate::subscriptions::retransmission::*;
    pub use crate::subscriptions::subscription::*;
    pub use crate::subscriptions::subscriptions::*;
    pub use crate::subscriptions::*;
    pub use uapub_types::service_types::*;
    pub use uapub_types::*;
}
