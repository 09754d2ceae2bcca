//! Ticket payload and the synchronization mechanism selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque ticket payload held by a pool.
///
/// The pool never interprets the text; two tickets are equal iff their text is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(String);

impl Ticket {
    /// Wrap a piece of text as a ticket.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the ticket text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the ticket and return its text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ticket {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Ticket {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for Ticket {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Synchronization strategy backing a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SyncMechanism {
    /// Single mutex plus condition variable.
    #[default]
    #[serde(rename = "MUTEX", alias = "SYNCHRONIZED")]
    Mutex,
    /// Reader/writer lock with poll-and-sleep consumption.
    #[serde(rename = "RWLOCK", alias = "RW_LOCK", alias = "REENTRANT_LOCK")]
    RwLock,
    /// Fixed-capacity message channel.
    #[serde(rename = "CHANNEL", alias = "BLOCKING_QUEUE")]
    Channel,
}

impl SyncMechanism {
    /// All mechanisms, in switch-menu order.
    pub const ALL: [Self; 3] = [Self::Mutex, Self::RwLock, Self::Channel];

    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mutex => "MUTEX",
            Self::RwLock => "RWLOCK",
            Self::Channel => "CHANNEL",
        }
    }
}

impl fmt::Display for SyncMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text names no known mechanism.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown synchronization mechanism `{0}` (expected MUTEX, RWLOCK or CHANNEL)")]
pub struct UnknownMechanism(pub String);

impl FromStr for SyncMechanism {
    type Err = UnknownMechanism;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MUTEX" | "SYNCHRONIZED" => Ok(Self::Mutex),
            "RWLOCK" | "RW_LOCK" | "REENTRANT_LOCK" => Ok(Self::RwLock),
            "CHANNEL" | "BLOCKING_QUEUE" => Ok(Self::Channel),
            _ => Err(UnknownMechanism(s.to_string())),
        }
    }
}
