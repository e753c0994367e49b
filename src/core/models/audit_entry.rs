use serde::{Deserialize, Serialize};

/// Actions that get recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Init,
    KeySetup,
    Import,
    Edit,
    Remove,
    Discard,
    Submit,
    Export,
}

/// A single entry in the audit log (JSON lines format).
///
/// Only key names are recorded, never values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub author: String,
    pub email: Option<String>,
    pub action: AuditAction,
    pub keys: Vec<String>,
    pub detail: Option<String>,
    pub state_hash: Option<String>,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::KeySetup => "key_setup",
            Self::Import => "import",
            Self::Edit => "edit",
            Self::Remove => "remove",
            Self::Discard => "discard",
            Self::Submit => "submit",
            Self::Export => "export",
        }
    }

    /// Actions that write `items.json` and record its hash.
    pub fn changes_items(&self) -> bool {
        matches!(self, Self::Init | Self::Remove | Self::Submit)
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Init,
            Self::KeySetup,
            Self::Import,
            Self::Edit,
            Self::Remove,
            Self::Discard,
            Self::Submit,
            Self::Export,
        ]
        .into_iter()
        .find(|action| action.as_str() == s)
        .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

/// Which audit entries `kvault log` shows. Empty fields match anything.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Case-insensitive substring of the author name or email.
    pub author: Option<String>,
    /// Exact key name that the entry touched.
    pub key: Option<String>,
    pub action: Option<AuditAction>,
}

impl AuditFilter {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.key.is_none() && self.action.is_none()
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        let author_ok = self.author.as_deref().is_none_or(|wanted| {
            let wanted = wanted.to_lowercase();
            entry.author.to_lowercase().contains(&wanted)
                || entry
                    .email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&wanted))
        });
        let key_ok = self
            .key
            .as_deref()
            .is_none_or(|key| entry.keys.iter().any(|k| k == key));
        let action_ok = self.action.as_ref().is_none_or(|a| *a == entry.action);

        author_ok && key_ok && action_ok
    }
}
