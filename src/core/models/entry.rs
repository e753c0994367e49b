use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single key/value secret row.
///
/// `id` is assigned once and survives every edit; reconciliation
/// against an external list matches rows by `id`, never by `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    /// True once `value` holds ciphertext instead of plaintext.
    #[serde(default)]
    pub encrypted: bool,
    /// Required rows can be cleared but never removed.
    #[serde(default)]
    pub required: bool,
    /// Public key `value` was encrypted for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl Entry {
    /// Create a plaintext entry with a fresh random id.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            value: value.into(),
            encrypted: false,
            required: false,
            public_key: None,
        }
    }

    /// A blank row, used as the trailing "new row" affordance.
    pub fn empty() -> Self {
        Self::new("", "")
    }

    /// A required entry whose id is derived from its key, so the same
    /// required key maps to the same row across loads.
    pub fn required(key: &str) -> Self {
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()),
            required: true,
            ..Self::new(key, "")
        }
    }

    /// Both key and value are blank after trimming.
    pub fn is_completely_empty(&self) -> bool {
        self.key.trim().is_empty() && self.value.trim().is_empty()
    }
}

/// Per-render view of an entry. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub entry: Entry,
    /// Validation text for a repeated key in unique mode.
    pub message: Option<String>,
    /// Whether the key is defined in the reference set.
    /// `None` for empty rows or when no reference set was supplied.
    pub present: Option<bool>,
}

/// Everything the presentation layer needs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub entries: Vec<DisplayEntry>,
    pub can_submit: bool,
    pub can_discard: bool,
}
