use crate::{date_time::DateTime, request_header::RequestHeader, status_code::StatusCode};

/// The server-authored half of a service exchange's common parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseHeader {
    /// Time the response was created
    pub timestamp: DateTime,
    /// Handle copied from the request this response answers
    pub request_handle: u32,
    /// Overall result of the service call
    pub service_result: StatusCode,
}

impl ResponseHeader {
    /// A good response header for the supplied request, stamped now.
    pub fn new_good(request_header: &RequestHeader) -> ResponseHeader {
        ResponseHeader::new_service_result(request_header, StatusCode::Good)
    }

    pub fn new_service_result(
        request_header: &RequestHeader,
        service_result: StatusCode,
    ) -> ResponseHeader {
        ResponseHeader {
            timestamp: DateTime::now(),
            request_handle: request_header.request_handle,
            service_result,
        }
    }

    pub fn null() -> ResponseHeader {
        ResponseHeader::default()
    }
}
