use std::collections::{BTreeSet, HashSet};

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::core::errors::{KvaultError, Result};
use crate::core::models::entry::{DisplayEntry, EditorView, Entry};
use crate::core::services::reconcile::{self, Command};
use crate::core::traits::cipher::EncryptionProvider;
use crate::core::traits::gateway::PersistenceGateway;

/// Message attached to a row whose key repeats an earlier row's key.
pub const DUPLICATE_KEY_MESSAGE: &str = "Key must be unique";

/// What `remove_or_clear` did with the resulting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The list was handed to the persistence gateway.
    Propagated,
    /// Duplicate keys remain, so the gateway was not called.
    Withheld,
}

/// What `submit` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// This many rows were encrypted and handed to the gateway.
    Submitted(usize),
    /// Duplicate keys exist; nothing happened.
    Blocked,
}

/// Serializable form of an editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub entries: Vec<Entry>,
    pub source: Vec<Entry>,
    pub dirty: bool,
}

/// In-memory state machine behind the secret key/value editor.
///
/// Owns the ordered rows, reconciles them against an external source,
/// flags duplicate keys and produces the encrypted list on submit.
/// All transitions go through [`reconcile::transition`], so the list
/// always ends in exactly one blank row.
#[derive(Debug, Clone)]
pub struct KeyValueEditor {
    entries: Vec<Entry>,
    source: Vec<Entry>,
    dirty: bool,
    unique: bool,
}

impl KeyValueEditor {
    /// An editor holding only the blank row.
    pub fn new(unique: bool) -> Self {
        Self {
            entries: reconcile::transition(&[], Command::Replace(Vec::new())),
            source: Vec::new(),
            dirty: false,
            unique,
        }
    }

    /// An editor loaded from `source`.
    pub fn with_source(source: Vec<Entry>, unique: bool) -> Self {
        let mut editor = Self::new(unique);
        editor.load(source);
        editor
    }

    /// Rebuild an editor from a saved session.
    pub fn restore(snapshot: EditorSnapshot, unique: bool) -> Self {
        Self {
            entries: reconcile::ensure_trailing_empty_row(snapshot.entries),
            source: snapshot.source,
            dirty: snapshot.dirty,
            unique,
        }
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            entries: self.entries.clone(),
            source: self.source.clone(),
            dirty: self.dirty,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The list passed to the most recent `load`.
    pub fn source(&self) -> &[Entry] {
        &self.source
    }

    /// True when there are edits since the last load or submit.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reconcile with a new external source and clear `dirty`.
    pub fn load(&mut self, source: Vec<Entry>) {
        self.entries = reconcile::transition(&self.entries, Command::Merge(source.clone()));
        self.source = source;
        self.dirty = false;
        tracing::debug!(rows = self.entries.len(), "editor loaded source");
    }

    /// Set the key and value of the row at `index`.
    ///
    /// Rows left completely empty anywhere in the list are dropped
    /// before the blank row is restored. Changing the value of an
    /// encrypted row makes it plaintext again.
    pub fn edit_field(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let current = self.entry_at(index)?;
        let key = key.into();
        let value = value.into();

        if current.required && current.key != key {
            return Err(KvaultError::RequiredKeyLocked {
                key: current.key.clone(),
            });
        }

        let mut next = self.entries.clone();
        let row = &mut next[index];
        if row.encrypted && row.value != value {
            row.encrypted = false;
            row.public_key = None;
        }
        row.key = key;
        row.value = value;
        next.retain(|e| !e.is_completely_empty());

        self.entries = reconcile::transition(&self.entries, Command::Replace(next));
        self.dirty = true;
        tracing::debug!(index, rows = self.entries.len(), "edited row");
        Ok(())
    }

    /// Throw away pending edits by merging the last loaded source again.
    pub fn discard(&mut self) {
        self.entries = reconcile::transition(&self.entries, Command::Merge(self.source.clone()));
        self.dirty = false;
        tracing::debug!(rows = self.entries.len(), "discarded edits");
    }

    /// Remove the row at `index`, or clear its value if it is required.
    ///
    /// The resulting list goes to `gateway` straight away unless
    /// duplicate keys remain, in which case the change stays local and
    /// the editor is marked dirty.
    pub fn remove_or_clear<G>(&mut self, index: usize, gateway: &G) -> Result<RemoveOutcome>
    where
        G: PersistenceGateway + ?Sized,
    {
        let target = self.entry_at(index)?;
        if target.is_completely_empty() {
            return Err(KvaultError::EmptyEntry { index });
        }
        let target_id = target.id;

        let mut next: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| !e.is_completely_empty())
            .cloned()
            .collect();

        if let Some(pos) = next.iter().position(|e| e.id == target_id) {
            if next[pos].required {
                next[pos].value.clear();
                next[pos].encrypted = false;
            } else {
                next.remove(pos);
            }
        }

        let new_state = reconcile::transition(&self.entries, Command::Replace(next.clone()));
        let outcome = if reconcile::has_duplicate_keys(&new_state) {
            self.dirty = true;
            RemoveOutcome::Withheld
        } else {
            gateway.items_changed(&next);
            RemoveOutcome::Propagated
        };

        self.entries = new_state;
        tracing::debug!(index, ?outcome, "removed or cleared row");
        Ok(outcome)
    }

    /// Encrypt every non-empty row for `public_key` and hand the result
    /// to `gateway`.
    ///
    /// A no-op returning [`SubmitOutcome::Blocked`] while duplicate keys
    /// exist. Encryptions run concurrently; if any of them fails the
    /// error is returned and the editor is left exactly as it was.
    pub async fn submit<P, G>(
        &mut self,
        provider: &P,
        public_key: &str,
        gateway: &G,
    ) -> Result<SubmitOutcome>
    where
        P: EncryptionProvider,
        G: PersistenceGateway + ?Sized,
    {
        if self.duplicate_keys_exist() {
            tracing::debug!("submit blocked by duplicate keys");
            return Ok(SubmitOutcome::Blocked);
        }

        let pending = self
            .entries
            .iter()
            .filter(|e| !e.is_completely_empty())
            .cloned()
            .map(|entry| seal(provider, public_key, entry));
        let sealed = try_join_all(pending).await?;

        gateway.items_changed(&sealed);
        let count = sealed.len();

        self.entries = reconcile::transition(&self.entries, Command::Replace(sealed));
        self.dirty = false;
        tracing::debug!(count, backend = provider.name(), "submitted rows");
        Ok(SubmitOutcome::Submitted(count))
    }

    /// True if any key, blank keys included, occurs more than once.
    pub fn duplicate_keys_exist(&self) -> bool {
        reconcile::has_duplicate_keys(&self.entries)
    }

    pub fn can_submit(&self) -> bool {
        self.dirty && !self.duplicate_keys_exist()
    }

    pub fn can_discard(&self) -> bool {
        self.dirty
    }

    /// Per-row validation and presence info, in list order.
    pub fn to_display_view(&self, reference_keys: Option<&BTreeSet<String>>) -> Vec<DisplayEntry> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.entries.len());

        self.entries
            .iter()
            .map(|entry| {
                let repeating = !seen.insert(entry.key.as_str());
                let empty = entry.is_completely_empty();

                DisplayEntry {
                    entry: entry.clone(),
                    message: (self.unique && repeating && !empty)
                        .then(|| DUPLICATE_KEY_MESSAGE.to_string()),
                    present: if empty {
                        None
                    } else {
                        reference_keys.map(|keys| keys.contains(&entry.key))
                    },
                }
            })
            .collect()
    }

    /// The display view plus the submit/discard affordances.
    pub fn view(&self, reference_keys: Option<&BTreeSet<String>>) -> EditorView {
        EditorView {
            entries: self.to_display_view(reference_keys),
            can_submit: self.can_submit(),
            can_discard: self.can_discard(),
        }
    }

    fn entry_at(&self, index: usize) -> Result<&Entry> {
        self.entries.get(index).ok_or(KvaultError::InvalidIndex {
            index,
            len: self.entries.len(),
        })
    }
}

/// Encrypt one row. Empty values never reach the provider and rows
/// that already hold ciphertext pass through untouched.
async fn seal<P: EncryptionProvider>(provider: &P, public_key: &str, mut entry: Entry) -> Result<Entry> {
    if entry.encrypted {
        return Ok(entry);
    }

    if !entry.value.is_empty() {
        entry.value = provider.encrypt(&entry.value, public_key).await?;
    }
    entry.encrypted = true;
    entry.public_key = Some(public_key.to_string());
    Ok(entry)
}
