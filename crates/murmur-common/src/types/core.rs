use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::id::ConnectionId;

use super::color::ColorTag;

/// Name a client picked during the handshake.
///
/// The color tag is presentation only: equality, ordering and hashing look
/// at the plain name.
#[derive(Debug, Clone)]
pub struct DisplayName {
    name: String,
    tag: Option<ColorTag>,
}

impl DisplayName {
    /// Trims surrounding whitespace. Returns `None` if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            tag: None,
        })
    }

    pub fn with_tag(mut self, tag: Option<ColorTag>) -> Self {
        self.tag = tag;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<ColorTag> {
        self.tag
    }

    /// The name with its color applied, or the plain name when untagged.
    pub fn decorated(&self) -> String {
        match self.tag {
            Some(tag) => tag.paint(&self.name),
            None => self.name.clone(),
        }
    }

    pub fn render(&self, decorate: bool) -> String {
        if decorate {
            self.decorated()
        } else {
            self.name.clone()
        }
    }
}

impl PartialEq for DisplayName {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for DisplayName {}

impl PartialOrd for DisplayName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DisplayName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for DisplayName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One unit of fan-out. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    origin: Option<ConnectionId>,
    payload: String,
}

impl Message {
    /// A message relayed on behalf of a connected client.
    pub fn from_client(origin: ConnectionId, payload: impl Into<String>) -> Self {
        Self {
            origin: Some(origin),
            payload: payload.into(),
        }
    }

    /// A message generated by the server itself (joins, presence updates).
    pub fn announcement(payload: impl Into<String>) -> Self {
        Self {
            origin: None,
            payload: payload.into(),
        }
    }

    pub fn origin(&self) -> Option<ConnectionId> {
        self.origin
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}
