use serde::{Deserialize, Serialize};

// -- Messages --

/// Body of `POST /messenger/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessageRequest {
    pub recipient_id: String,
    pub sender_id: String,
    pub message: String,
    /// `YYYY-MM-DD`; the message is stamped at local midnight of that day.
    /// Defaults to the time of insertion.
    #[serde(default)]
    pub date_sent: Option<String>,
}

/// Sparse update: `None` leaves the column untouched.
///
/// `timestamp` takes precedence over `date_sent` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagePatch {
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub date_sent: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MessagePatch {
    pub fn is_empty(&self) -> bool {
        self.recipient_id.is_none()
            && self.sender_id.is_none()
            && self.timestamp.is_none()
            && self.date_sent.is_none()
            && self.message.is_none()
    }
}

/// Query string of `GET /messenger/{recipient_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Query string of `DELETE /messenger/`: comma separated message ids.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub ids: String,
}

impl DeleteQuery {
    pub fn ids(&self) -> Vec<String> {
        self.ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Result of a write operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected: Option<usize>,
}

impl Confirmation {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            id: None,
            affected: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_affected(mut self, affected: usize) -> Self {
        self.affected = Some(affected);
        self
    }
}

// -- Errors --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
