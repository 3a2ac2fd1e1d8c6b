//! The transport seam. Chunking, signing and encrypting messages onto the
//! secure channel belongs to the transport; the publish engine only needs to
//! hand a finished response to the channel the session is bound to.

use std::sync::{Arc, RwLock};

use uapub_types::service_types::PublishResponse;

/// The server half of a secure channel, as seen by the publish engine. Sends
/// are fire and forget; transport failures are the transport's to report.
pub trait MessageSender {
    /// Queue `response` for symmetric transmission, answering the publish
    /// request identified by `request_id`.
    fn send_symmetric(&mut self, request_id: u32, response: PublishResponse);
}

/// Shared handle to the channel a session is currently bound to. The session
/// and the transport each hold one; a session that has lost its channel holds
/// none at all.
pub type MessageSenderRef = Arc<RwLock<dyn MessageSender + Send + Sync>>;
