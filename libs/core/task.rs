use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::session::AccountId;

pub type TaskId = String;

/// The three fixed board columns.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Doing, TaskStatus::Done];
}

/// Whether the last optimistic mutation touching this task has been
/// acknowledged by the store. Never persisted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SyncState {
    #[default]
    Confirmed,
    Pending,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Task {
    #[serde(with = "id_string")]
    pub id: TaskId,
    pub text: String,
    pub status: TaskStatus,
    #[serde(with = "id_string")]
    pub owner: AccountId,
    /// Position within the column. Rows written before ordering existed have
    /// no value and sort first.
    #[serde(default)]
    pub order: i64,
    #[serde(skip)]
    pub sync: SyncState,
}

/// Stores with serial primary keys hand ids back as numbers; we keep every
/// id as an opaque string.
pub(crate) mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(de::Error::custom(format!("invalid id: {other}"))),
        }
    }
}
