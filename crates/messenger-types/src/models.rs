use serde::{Deserialize, Serialize};

/// A stored message as handed out to callers.
///
/// `timestamp` is seconds since the Unix epoch. Ids are opaque strings
/// (32 lowercase hex characters for messages created by this service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub recipient_id: String,
    pub sender_id: String,
    pub timestamp: f64,
    pub message: String,
}
