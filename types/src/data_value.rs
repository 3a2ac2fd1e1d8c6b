use crate::{date_time::DateTime, status_code::StatusCode, variant::Variant};

/// A value together with the status and timestamps the sampler attached to
/// it. Fields follow the OPC UA convention of being optional so that absent
/// parts are not encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataValue {
    /// The sampled value
    pub value: Option<Variant>,
    /// Status associated with the value. Absent means Good.
    pub status: Option<StatusCode>,
    /// Time the source produced the value
    pub source_timestamp: Option<DateTime>,
    /// Time the server observed the value
    pub server_timestamp: Option<DateTime>,
}

impl DataValue {
    /// A good value stamped with the current time for both timestamps.
    pub fn new<V>(value: V) -> DataValue
    where
        V: Into<Variant>,
    {
        let now = DateTime::now();
        DataValue {
            value: Some(value.into()),
            status: Some(StatusCode::Good),
            source_timestamp: Some(now),
            server_timestamp: Some(now),
        }
    }

    /// A value with no status or timestamps at all.
    pub fn value_only<V>(value: V) -> DataValue
    where
        V: Into<Variant>,
    {
        DataValue {
            value: Some(value.into()),
            status: None,
            source_timestamp: None,
            server_timestamp: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::Good)
    }

    pub fn is_valid(&self) -> bool {
        self.status().is_good()
    }
}
