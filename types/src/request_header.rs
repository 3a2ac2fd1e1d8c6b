use crate::date_time::DateTime;

/// The parameters common to every service request that matter to the publish
/// engine. The security and diagnostic fields of the full header belong to
/// the session layer and are not carried here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RequestHeader {
    /// Time the client sent the request
    pub timestamp: DateTime,
    /// Client-assigned handle echoed back in the matching response
    pub request_handle: u32,
    /// Number of milliseconds the client is prepared to wait, 0 for no hint
    pub timeout_hint: u32,
}

impl RequestHeader {
    pub fn new(request_handle: u32) -> RequestHeader {
        RequestHeader {
            timestamp: DateTime::now(),
            request_handle,
            timeout_hint: 0,
        }
    }
}
