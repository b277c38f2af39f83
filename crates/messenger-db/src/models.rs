/// A message exactly as stored. The service layer maps these onto
/// `messenger_types::models::Message`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRow {
    pub id: String,
    pub recipient_id: String,
    pub timestamp: f64,
    pub sender_id: String,
    pub message: String,
}

/// Columns a patch may touch. `id` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchField {
    RecipientId,
    SenderId,
    Timestamp,
    Message,
}

impl PatchField {
    pub const ALL: [PatchField; 4] = [
        PatchField::RecipientId,
        PatchField::SenderId,
        PatchField::Timestamp,
        PatchField::Message,
    ];

    pub fn column(self) -> &'static str {
        match self {
            PatchField::RecipientId => "recipient_id",
            PatchField::SenderId => "sender_id",
            PatchField::Timestamp => "timestamp",
            PatchField::Message => "message",
        }
    }
}
