//! Provides default constants for the engine limits. The configuration layer
//! starts from these and a deployment may tighten or relax them.

/// Maximum number of subscriptions a session is allowed to hold
pub const DEFAULT_MAX_SUBSCRIPTIONS: usize = 100;

/// Sanity floor applied to requested publishing intervals, in milliseconds
pub const MIN_PUBLISHING_INTERVAL_MS: f64 = 10.0;

/// Sent notification messages retained per subscription for retransmission.
/// 0 disables the bound.
pub const DEFAULT_MAX_RETRANSMISSION_QUEUE_SIZE: usize = 0;

/// Cap on the notifications assembled into a single publish response
pub const DEFAULT_MAX_NOTIFICATIONS_PER_PUBLISH: usize = 1000;

/// Silent publishing cycles before a keep-alive response is due
pub const DEFAULT_KEEP_ALIVE_COUNT: u32 = 10;

/// Publishing cycles without client activity before a subscription expires.
/// The Part 4 convention requires at least 3x the keep-alive count.
pub const DEFAULT_LIFETIME_COUNT: u32 = 30;

/// Publish requests banked per session before the oldest is shed
pub const DEFAULT_MAX_PENDING_PUBLISH_REQUESTS: usize = 20;

/// Age in milliseconds after which a banked publish request is answered
/// with a timeout
pub const DEFAULT_PUBLISH_REQUEST_TIMEOUT_MS: i64 = 30_000;
