//! Provides the limits that govern the publish engine, deserializable from
//! the server's configuration file.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::constants;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Maximum live subscriptions per session
    pub max_subscriptions: usize,
    /// Sent notification messages retained per subscription for
    /// retransmission. 0 means unbounded.
    pub max_retransmission_queue_size: usize,
    /// Hard cap applied to a subscription's requested notifications per
    /// publish. Requests of 0 revise to this value.
    pub max_notifications_per_publish: usize,
    /// Lower bound for revised publishing intervals in milliseconds
    pub min_publishing_interval_ms: f64,
    /// Publish requests banked per session before the oldest is shed
    pub max_pending_publish_requests: usize,
    /// Age in milliseconds after which a banked publish request is answered
    /// with BadTimeout
    pub publish_request_timeout_ms: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            max_subscriptions: constants::DEFAULT_MAX_SUBSCRIPTIONS,
            max_retransmission_queue_size: constants::DEFAULT_MAX_RETRANSMISSION_QUEUE_SIZE,
            max_notifications_per_publish: constants::DEFAULT_MAX_NOTIFICATIONS_PER_PUBLISH,
            min_publishing_interval_ms: constants::MIN_PUBLISHING_INTERVAL_MS,
            max_pending_publish_requests: constants::DEFAULT_MAX_PENDING_PUBLISH_REQUESTS,
            publish_request_timeout_ms: constants::DEFAULT_PUBLISH_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<ServerConfig, ()> {
        match File::open(path) {
            Ok(mut f) => {
                let mut s = String::new();
                if f.read_to_string(&mut s).is_err() {
                    error!("Cannot read configuration file {}", path.display());
                    return Err(());
                }
                match serde_json::from_str(&s) {
                    Ok(config) => Ok(config),
                    Err(err) => {
                        error!("Cannot deserialize configuration from {}, err = {}", path.display(), err);
                        Err(())
                    }
                }
            }
            Err(err) => {
                error!("Cannot open configuration file {}, err = {}", path.display(), err);
                Err(())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ()> {
        if !self.is_valid() {
            error!("Configuration is invalid and will not be saved");
            return Err(());
        }
        match File::create(path) {
            Ok(mut f) => {
                let s = serde_json::to_string_pretty(self).map_err(|_| ())?;
                if f.write_all(s.as_bytes()).is_err() {
                    error!("Cannot write configuration to file {}", path.display());
                    Err(())
                } else {
                    Ok(())
                }
            }
            Err(err) => {
                error!("Cannot create configuration file {}, err = {}", path.display(), err);
                Err(())
            }
        }
    }

    /// Test the configuration for nonsense values, logging each complaint.
    pub fn is_valid(&self) -> bool {
        let mut valid = true;
        if self.max_subscriptions == 0 {
            error!("Configuration error, max subscriptions is 0");
            valid = false;
        }
        if self.max_notifications_per_publish == 0 {
            error!("Configuration error, max notifications per publish is 0");
            valid = false;
        }
        if self.min_publishing_interval_ms <= 0.0 {
            error!("Configuration error, min publishing interval must be above 0");
            valid = false;
        }
        if self.max_pending_publish_requests == 0 {
            error!("Configuration error, max pending publish requests is 0");
            valid = false;
        }
        if self.publish_request_timeout_ms <= 0 {
            error!("Configuration error, publish request timeout must be above 0");
            valid = false;
        }
        valid
    }
}
