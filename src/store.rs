//! Storage of chat-style records attached to a project room.
//!
//! Only the interface lives here, the real datastore is external. Ids are
//! normalized to [`RecordId`] before any lookup, so string and typed ids can
//! never disagree.

use std::{
    fmt::{self, Display},
    str::FromStr,
    sync::atomic::{AtomicU32, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use futures::lock::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque 12 byte id, written as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId([u8; 12]);

static COUNTER: AtomicU32 = AtomicU32::new(0);

impl RecordId {
    /// Seconds since the epoch, process id and a process wide counter.
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..8].copy_from_slice(&std::process::id().to_be_bytes());
        bytes[8..].copy_from_slice(&count.to_be_bytes());
        RecordId(bytes)
    }

    /// Parses either form a caller may hold, surrounding whitespace and case ignored.
    pub fn normalize(id: &str) -> Result<Self> {
        id.trim().parse()
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidRecordId(s.to_string()))?;
        Ok(RecordId(bytes))
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        RecordId::normalize(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_string()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub room_id: RecordId,
    pub user_id: RecordId,
    pub content: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    pub edited_at: Option<i64>,
}

#[async_trait::async_trait]
pub trait RecordStore {
    async fn create(&self, room: &str, user: &str, content: String, timestamp: i64) -> Result<Record>;

    /// Newest first, at most `limit`, only records older than `before` when given.
    async fn list(&self, room: &str, limit: usize, before: Option<i64>) -> Result<Vec<Record>>;

    async fn list_in_rooms(&self, rooms: &[&str]) -> Result<Vec<Record>>;

    async fn update(&self, room: &str, id: &str, content: String, timestamp: i64) -> Result<()>;

    async fn delete(&self, room: &str, id: &str) -> Result<()>;

    async fn delete_all(&self, room: &str) -> Result<()>;
}

/// In-process [`RecordStore`], records kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, room: &str, user: &str, content: String, timestamp: i64) -> Result<Record> {
        let record = Record {
            id: RecordId::generate(),
            room_id: RecordId::normalize(room)?,
            user_id: RecordId::normalize(user)?,
            content,
            timestamp,
            edited_at: None,
        };

        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self, room: &str, limit: usize, before: Option<i64>) -> Result<Vec<Record>> {
        let room = RecordId::normalize(room)?;
        let records = self.records.lock().await;

        let mut out: Vec<_> = records
            .iter()
            .filter(|x| x.room_id == room)
            .filter(|x| before.map_or(true, |before| x.timestamp < before))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out.truncate(limit);
        Ok(out)
    }

    async fn list_in_rooms(&self, rooms: &[&str]) -> Result<Vec<Record>> {
        let rooms = rooms
            .iter()
            .map(|x| RecordId::normalize(x))
            .collect::<Result<Vec<_>>>()?;
        let records = self.records.lock().await;

        Ok(records
            .iter()
            .filter(|x| rooms.contains(&x.room_id))
            .cloned()
            .collect())
    }

    async fn update(&self, room: &str, id: &str, content: String, timestamp: i64) -> Result<()> {
        let (room, id) = (RecordId::normalize(room)?, RecordId::normalize(id)?);
        let mut records = self.records.lock().await;

        let record = records
            .iter_mut()
            .find(|x| x.id == id && x.room_id == room)
            .ok_or(Error::RecordNotFound { room, id })?;
        record.content = content;
        record.edited_at = Some(timestamp);
        Ok(())
    }

    async fn delete(&self, room: &str, id: &str) -> Result<()> {
        let (room, id) = (RecordId::normalize(room)?, RecordId::normalize(id)?);
        let mut records = self.records.lock().await;

        let before = records.len();
        records.retain(|x| !(x.id == id && x.room_id == room));
        if records.len() == before {
            return Err(Error::RecordNotFound { room, id });
        }
        Ok(())
    }

    async fn delete_all(&self, room: &str) -> Result<()> {
        let room = RecordId::normalize(room)?;
        self.records.lock().await.retain(|x| x.room_id != room);
        Ok(())
    }
}
