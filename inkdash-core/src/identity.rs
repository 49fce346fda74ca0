//! Identity types for inkdash data sources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Borrow;
use std::fmt;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// SHA-256 content hash, used to key rendered images by their capture.
pub type ContentHash = [u8; 32];

/// Stable identifier of a data source.
///
/// Any string is a valid id. The four ids the panel layout knows about are
/// described by [`SourceKind`]; everything else is carried as an extra.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The well-known kind of this source, if it has one.
    pub fn kind(&self) -> Option<SourceKind> {
        SourceKind::from_id(&self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<SourceKind> for SourceId {
    fn from(kind: SourceKind) -> Self {
        Self::new(kind.as_str())
    }
}

impl Borrow<str> for SourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sources with a dedicated slot in the [`crate::Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Weather,
    Financial,
    News,
    Calendar,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Weather,
        SourceKind::Financial,
        SourceKind::News,
        SourceKind::Calendar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Weather => "weather",
            SourceKind::Financial => "financial",
            SourceKind::News => "news",
            SourceKind::Calendar => "calendar",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == id)
    }
}

/// Compute SHA-256 hash of content.
pub fn compute_content_hash(content: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Lowercase hex rendering of a content hash.
pub fn content_hash_hex(hash: &ContentHash) -> String {
    hex::encode(hash)
}
