use messenger_types::api::MessagePatch;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use crate::MessageStore;
use crate::error::{ParseError, Result};
use crate::models::{MessageRow, PatchField};
use crate::timestamp::{self, to_timestamp};

/// Keeps `DELETE ... IN (...)` well under SQLite's bound-parameter limit.
const DELETE_CHUNK: usize = 500;

impl MessageStore {
    // -- Writes --

    /// Store a new message and return its generated id.
    ///
    /// `sent_at` is a `YYYY-MM-DD` date stamped at local midnight; without it
    /// the message is stamped with the current time.
    pub fn insert(
        &self,
        recipient_id: &str,
        sender_id: &str,
        message: &str,
        sent_at: Option<&str>,
    ) -> Result<String> {
        let ts = match sent_at {
            Some(date) => to_timestamp(date, false)?,
            None => timestamp::now(),
        };
        let id = Uuid::new_v4().simple().to_string();

        self.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, recipient_id, timestamp, sender_id, message) VALUES (?1, ?2, ?3, ?4, ?5)",
                    self.ident()
                ),
                params![id, recipient_id, ts, sender_id, message],
            )
            .map_err(|source| self.write_failed(source))?;
            Ok(())
        })?;

        debug!("Inserted message {} for {} into {}", id, recipient_id, self.table());
        Ok(id)
    }

    /// Update the columns set in `patch` on the row `message_id`.
    ///
    /// Each present field is written by its own statement; the statements
    /// share one transaction. Returns the number of rows updated, which is 0
    /// for an empty patch or an unknown id. Neither case is an error.
    pub fn patch(&self, message_id: &str, patch: &MessagePatch) -> Result<usize> {
        let changes = patch_changes(patch)?;
        if changes.is_empty() {
            debug!("Empty patch for message {}, nothing to do", message_id);
            return Ok(0);
        }

        let updated = self.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|source| self.write_failed(source))?;

            let mut updated = 0;
            for (field, value) in &changes {
                let sql = format!(
                    "UPDATE {} SET {} = ?1 WHERE id = ?2",
                    self.ident(),
                    field.column()
                );
                updated = tx
                    .execute(&sql, params![value, message_id])
                    .map_err(|source| self.write_failed(source))?;
            }

            tx.commit().map_err(|source| self.write_failed(source))?;
            Ok(updated)
        })?;

        if updated == 0 {
            debug!("Patch matched no message with id {}", message_id);
        } else {
            debug!("Patched {} field(s) of message {}", changes.len(), message_id);
        }
        Ok(updated)
    }

    /// Remove every message whose id is in `message_ids`. Unknown ids are
    /// ignored. Returns the number of rows removed.
    pub fn delete(&self, message_ids: &[String]) -> Result<usize> {
        if message_ids.is_empty() {
            return Ok(0);
        }

        let removed = self.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|source| self.write_failed(source))?;

            let mut removed = 0;
            for chunk in message_ids.chunks(DELETE_CHUNK) {
                let placeholders: Vec<String> = (1..=chunk.len()).map(|i| format!("?{}", i)).collect();
                let sql = format!(
                    "DELETE FROM {} WHERE id IN ({})",
                    self.ident(),
                    placeholders.join(", ")
                );
                removed += tx
                    .execute(&sql, params_from_iter(chunk.iter()))
                    .map_err(|source| self.write_failed(source))?;
            }

            tx.commit().map_err(|source| self.write_failed(source))?;
            Ok(removed)
        })?;

        debug!("Deleted {} of {} requested message(s)", removed, message_ids.len());
        Ok(removed)
    }

    // -- Reads --

    /// Messages for `recipient_id` with a timestamp in the inclusive range
    /// `[from_date 00:00:00, to_date 23:59:59]`, oldest first.
    ///
    /// A missing `from_date` means the epoch; a missing `to_date` means now.
    pub fn select_by_recipient(
        &self,
        recipient_id: &str,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> Result<Vec<MessageRow>> {
        let from_ts = match from_date {
            Some(date) => to_timestamp(date, false)?,
            None => 0.0,
        };
        let to_ts = match to_date {
            Some(date) => to_timestamp(date, true)?,
            None => timestamp::now(),
        };

        self.with_conn(|conn| {
            query_by_recipient(conn, self.ident(), recipient_id, from_ts, to_ts)
                .map_err(|source| self.read_failed(source))
        })
    }

    /// Every stored message, in no particular order.
    pub fn get_all(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_all(conn, self.ident()).map_err(|source| self.read_failed(source)))
    }
}

/// Resolve a patch into (column, value) pairs in a fixed column order.
fn patch_changes(patch: &MessagePatch) -> std::result::Result<Vec<(PatchField, Value)>, ParseError> {
    let timestamp = match (patch.timestamp, patch.date_sent.as_deref()) {
        (Some(ts), _) => Some(ts),
        (None, Some(date)) => Some(to_timestamp(date, false)?),
        (None, None) => None,
    };

    let changes = PatchField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = match field {
                PatchField::RecipientId => patch.recipient_id.clone().map(Value::Text),
                PatchField::SenderId => patch.sender_id.clone().map(Value::Text),
                PatchField::Timestamp => timestamp.map(Value::Real),
                PatchField::Message => patch.message.clone().map(Value::Text),
            };
            value.map(|value| (field, value))
        })
        .collect();

    Ok(changes)
}

fn query_by_recipient(
    conn: &Connection,
    ident: &str,
    recipient_id: &str,
    from_ts: f64,
    to_ts: f64,
) -> rusqlite::Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, recipient_id, timestamp, sender_id, message
         FROM {ident}
         WHERE recipient_id = ?1 AND timestamp BETWEEN ?2 AND ?3
         ORDER BY timestamp ASC"
    ))?;

    let rows = stmt
        .query_map(params![recipient_id, from_ts, to_ts], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn query_all(conn: &Connection, ident: &str) -> rusqlite::Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, recipient_id, timestamp, sender_id, message FROM {ident}"
    ))?;

    let rows = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        recipient_id: row.get(1)?,
        timestamp: row.get(2)?,
        sender_id: row.get(3)?,
        message: row.get(4)?,
    })
}
