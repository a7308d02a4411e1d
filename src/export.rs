/// Chat export document model.
///
/// Mirrors the JSON produced by chat history exports: a `name` and an ordered
/// `messages` array of records tagged by `type`. Only the fields the
/// aggregation reads are modelled; everything else in a record is ignored.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, StatsError};

pub const ACTION_JOIN_BY_LINK: &str = "join_group_by_link";
pub const ACTION_INVITE_MEMBERS: &str = "invite_members";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatExport {
    pub name: String,
    pub messages: Vec<RawRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawRecord {
    Message(MessageRecord),
    Service(ServiceRecord),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageRecord {
    pub date: String,
    pub from_id: SenderId,
    #[serde(default)]
    pub from: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceRecord {
    /// Kept raw: only joins and invites need a valid date, every other
    /// service record is dropped without looking at it.
    #[serde(default)]
    pub date: Option<serde_json::Value>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Sender identifier as found in exports: numeric in older dumps,
/// `"user123"`-style strings in newer ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SenderId {
    Int(i64),
    Text(String),
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderId::Int(id) => write!(f, "{}", id),
            SenderId::Text(id) => f.write_str(id),
        }
    }
}

/// Composite sender key. A renamed user (same `from_id`, new `from`) is a
/// different identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SenderIdentity {
    pub from_id: SenderId,
    pub from: Option<String>,
}

impl SenderIdentity {
    pub fn display_name(&self) -> String {
        match &self.from {
            Some(name) => name.clone(),
            None => format!("(deleted account {})", self.from_id),
        }
    }
}

impl MessageRecord {
    pub fn identity(&self) -> SenderIdentity {
        SenderIdentity {
            from_id: self.from_id.clone(),
            from: self.from.clone(),
        }
    }
}

impl ServiceRecord {
    /// The record date as text. Missing or non-string dates are rejected.
    pub fn date_str(&self) -> Result<&str> {
        match &self.date {
            Some(serde_json::Value::String(date)) => Ok(date),
            Some(other) => Err(StatsError::invalid_input(format!(
                "service record '{}' has a non-string date: {}",
                self.action.as_deref().unwrap_or("?"),
                other
            ))),
            None => Err(StatsError::invalid_input(format!(
                "service record '{}' has no date",
                self.action.as_deref().unwrap_or("?")
            ))),
        }
    }
}

impl ChatExport {
    /// Reads and parses an export file. Only `.json` files are accepted.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(StatsError::invalid_input(format!(
                "Only JSON files are accepted: {}",
                path.display()
            )));
        }

        let file = std::fs::File::open(path).map_err(|source| StatsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let export = Self::from_reader(file)?;
        // The file handle is dropped here, before any aggregation runs.
        Ok(export)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(std::io::BufReader::new(reader)).map_err(invalid_json)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(invalid_json)
    }
}

fn invalid_json(err: serde_json::Error) -> StatsError {
    StatsError::InvalidInputFormat {
        reason: format!("not a chat export document ({})", err),
        source: Some(err),
    }
}
