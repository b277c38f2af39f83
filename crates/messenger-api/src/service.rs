use std::sync::Arc;

use thiserror::Error;

use messenger_db::{MessageRow, MessageStore, StoreError};
use messenger_types::api::{Confirmation, MessagePatch, MessageRequest};
use messenger_types::models::Message;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Pass-through layer between request shapes and the [`MessageStore`].
///
/// Calls block on the store; async callers should run them with
/// `spawn_blocking`.
#[derive(Clone)]
pub struct MessageService {
    store: Arc<MessageStore>,
}

impl MessageService {
    pub fn new(store: Arc<MessageStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn add_message(&self, request: &MessageRequest) -> Result<Confirmation> {
        let id = self.store.insert(
            &request.recipient_id,
            &request.sender_id,
            &request.message,
            request.date_sent.as_deref(),
        )?;
        Ok(Confirmation::new("Message added").with_id(id))
    }

    pub fn get_messages(
        &self,
        recipient_id: &str,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> Result<Vec<Message>> {
        let rows = self.store.select_by_recipient(recipient_id, from_date, to_date)?;
        Ok(rows.into_iter().map(to_view).collect())
    }

    pub fn update_message(&self, message_id: &str, patch: &MessagePatch) -> Result<Confirmation> {
        let updated = self.store.patch(message_id, patch)?;
        Ok(Confirmation::new("Message updated")
            .with_id(message_id)
            .with_affected(updated))
    }

    pub fn delete_messages(&self, message_ids: &[String]) -> Result<Confirmation> {
        let removed = self.store.delete(message_ids)?;
        Ok(Confirmation::new("Messages deleted").with_affected(removed))
    }

    pub fn get_all(&self) -> Result<Vec<Message>> {
        let rows = self.store.get_all()?;
        Ok(rows.into_iter().map(to_view).collect())
    }
}

fn to_view(row: MessageRow) -> Message {
    Message {
        id: row.id,
        recipient_id: row.recipient_id,
        sender_id: row.sender_id,
        timestamp: row.timestamp,
        message: row.message,
    }
}
