use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier assigned to a contact by the store.
///
/// Ids are sequential integers internally but travel as decimal strings in
/// JSON, matching the document store's key convention. A path segment that
/// fails to parse back is a malformatted id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ContactId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(ContactId)
    }
}

impl From<u64> for ContactId {
    fn from(raw: u64) -> Self {
        ContactId(raw)
    }
}

impl Serialize for ContactId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A contact record stored in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-assigned unique identifier, immutable after creation
    pub id: ContactId,
    /// Display name, unique across the collection (case-insensitive)
    pub name: String,
    /// Phone number
    pub number: String,
}

impl Contact {
    pub fn new(
        id: impl Into<ContactId>,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: number.into(),
        }
    }
}

/// Incoming POST/PUT body. Both fields are optional at the wire level;
/// presence is checked by the directory, not by deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub number: Option<String>,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            number: Some(number.into()),
        }
    }
}

/// Snapshot backing the info page
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryInfo {
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}
