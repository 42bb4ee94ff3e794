use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decoded payload delivered by the external barcode-decoding
/// collaborator. The payload is the raw decoded string; deduplication of
/// repeated scans of the same code is the collaborator's responsibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub payload: String,
    pub observed_at: DateTime<Utc>,
}

impl ScanEvent {
    pub fn now(payload: impl Into<String>) -> Self {
        Self { payload: payload.into(), observed_at: Utc::now() }
    }
}
