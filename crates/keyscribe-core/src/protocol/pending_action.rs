use crate::{BridgeError, protocol::ActionKind};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin tag stamped on every action written by the extension.
pub const EXTENSION_ORIGIN: &str = "keyboard-extension";

/// A user intent waiting in the single-slot action mailbox.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    /// What the host should do.
    pub action: ActionKind,
    /// Free-form parameters, e.g. `prompt` for a start action.
    pub parameters: BTreeMap<String, String>,
    /// Write time; doubles as a uniqueness token for repeated intents.
    pub issued_at: DateTime<Utc>,
    /// Which process wrote the record.
    pub origin: String,
}

impl PendingAction {
    /// Build an action stamped with the current time.
    pub fn new(action: ActionKind, parameters: BTreeMap<String, String>) -> Self {
        Self {
            action,
            parameters,
            issued_at: Utc::now(),
            origin: EXTENSION_ORIGIN.to_string(),
        }
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

/// On-the-wire form of [`PendingAction`].
///
/// The action tag stays a plain string so a record written by a newer
/// extension still decodes and can be reported as an unknown action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionRecord {
    /// Action tag, see [`ActionKind::as_tag`].
    pub action: String,
    /// Action parameters.
    pub parameters: BTreeMap<String, String>,
    /// Write time.
    pub issued_at: DateTime<Utc>,
    /// Writer tag.
    pub origin: String,
}

impl From<&PendingAction> for ActionRecord {
    fn from(action: &PendingAction) -> Self {
        Self {
            action: action.action.as_tag().to_string(),
            parameters: action.parameters.clone(),
            issued_at: action.issued_at,
            origin: action.origin.clone(),
        }
    }
}

impl TryFrom<ActionRecord> for PendingAction {
    type Error = BridgeError;

    #[track_caller]
    fn try_from(record: ActionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            action: record.action.parse()?,
            parameters: record.parameters,
            issued_at: record.issued_at,
            origin: record.origin,
        })
    }
}
