use std::collections::HashSet;

use uuid::Uuid;

use crate::core::models::entry::Entry;

/// A state transition for the editor's entry list.
#[derive(Debug, Clone)]
pub enum Command {
    /// Reconcile the current list against an external source, by id.
    Merge(Vec<Entry>),
    /// Replace the list wholesale.
    Replace(Vec<Entry>),
}

/// Apply `command` to `state` and return the next list.
///
/// Every result ends in exactly one completely empty row. When the
/// previous list already ended in a blank row that the command did not
/// consume, that row keeps its id.
pub fn transition(state: &[Entry], command: Command) -> Vec<Entry> {
    let next = match command {
        Command::Merge(source) => merge(state, source),
        Command::Replace(items) => items,
    };

    let reusable: Option<Uuid> = state
        .last()
        .filter(|prev| prev.is_completely_empty() && !next.iter().any(|e| e.id == prev.id))
        .map(|prev| prev.id);

    ensure_trailing_empty_row_with(next, || match reusable {
        Some(id) => Entry {
            id,
            ..Entry::empty()
        },
        None => Entry::empty(),
    })
}

/// Append a blank row unless the list already ends in one.
pub fn ensure_trailing_empty_row(entries: Vec<Entry>) -> Vec<Entry> {
    ensure_trailing_empty_row_with(entries, Entry::empty)
}

fn ensure_trailing_empty_row_with(
    mut entries: Vec<Entry>,
    blank: impl FnOnce() -> Entry,
) -> Vec<Entry> {
    if entries.last().is_none_or(|e| !e.is_completely_empty()) {
        entries.push(blank());
    }
    entries
}

/// Keep non-empty rows the source still knows about, overwrite them in
/// place, and append source rows that are new. Blank source rows are
/// ignored.
fn merge(state: &[Entry], source: Vec<Entry>) -> Vec<Entry> {
    let source_ids: HashSet<Uuid> = source.iter().map(|e| e.id).collect();

    let mut result: Vec<Entry> = state
        .iter()
        .filter(|old| !old.is_completely_empty() && source_ids.contains(&old.id))
        .cloned()
        .collect();

    for incoming in source.into_iter().filter(|e| !e.is_completely_empty()) {
        match result.iter().position(|e| e.id == incoming.id) {
            Some(index) => result[index] = incoming,
            None => result.push(incoming),
        }
    }

    result
}

/// True if any key, blank keys included, occurs more than once.
/// Keys compare by exact string equality.
pub fn has_duplicate_keys(entries: &[Entry]) -> bool {
    let mut seen = HashSet::with_capacity(entries.len());
    entries.iter().any(|e| !seen.insert(e.key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn trailing_row_added_to_empty_list() {
        let result = ensure_trailing_empty_row(Vec::new());

        assert_eq!(result.len(), 1);
        assert!(result[0].is_completely_empty());
    }

    #[test]
    fn trailing_row_not_duplicated() {
        let result = ensure_trailing_empty_row(vec![Entry::new("A", "1"), Entry::empty()]);

        assert_eq!(keys(&result), vec!["A", ""]);
    }

    #[test]
    fn row_with_only_value_is_not_a_trailing_blank() {
        let result = ensure_trailing_empty_row(vec![Entry::new("", "orphan")]);

        assert_eq!(result.len(), 2);
        assert!(result[1].is_completely_empty());
    }

    #[test]
    fn merge_overwrites_by_id_in_place() {
        let a = Entry::new("A", "1");
        let b = Entry::new("B", "2");
        let state = vec![a.clone(), b.clone(), Entry::empty()];

        let updated_a = Entry {
            value: "changed".into(),
            ..a.clone()
        };
        let result = transition(&state, Command::Merge(vec![b.clone(), updated_a]));

        assert_eq!(keys(&result), vec!["A", "B", ""]);
        assert_eq!(result[0].id, a.id);
        assert_eq!(result[0].value, "changed");
    }

    #[test]
    fn merge_drops_rows_missing_from_source_and_appends_new_ones() {
        let a = Entry::new("A", "1");
        let local_only = Entry::new("LOCAL", "x");
        let state = vec![a.clone(), local_only, Entry::empty()];

        let c = Entry::new("C", "3");
        let result = transition(&state, Command::Merge(vec![a, c]));

        assert_eq!(keys(&result), vec!["A", "C", ""]);
    }

    #[test]
    fn merge_ignores_blank_source_rows() {
        let a = Entry::new("A", "1");
        let result = transition(&[], Command::Merge(vec![Entry::empty(), a]));

        assert_eq!(keys(&result), vec!["A", ""]);
    }

    #[test]
    fn blank_row_identity_survives_transitions() {
        let a = Entry::new("A", "1");
        let state = transition(&[], Command::Merge(vec![a.clone()]));
        let blank_id = state[1].id;

        let next = transition(&state, Command::Replace(vec![a]));

        assert_eq!(next[1].id, blank_id);
    }

    #[test]
    fn consumed_blank_row_gets_a_fresh_successor() {
        let state = transition(&[], Command::Replace(Vec::new()));
        let typed_into = Entry {
            key: "NEW".into(),
            value: "v".into(),
            ..state[0].clone()
        };

        let next = transition(&state, Command::Replace(vec![typed_into.clone()]));

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].id, typed_into.id);
        assert_ne!(next[1].id, typed_into.id);
    }

    #[test]
    fn duplicate_detection_is_exact() {
        assert!(has_duplicate_keys(&[Entry::new("A", "1"), Entry::new("A", "2")]));
        assert!(!has_duplicate_keys(&[Entry::new("A", "1"), Entry::new("a", "2")]));
        assert!(!has_duplicate_keys(&[Entry::new("A", "1"), Entry::new("A ", "2")]));
    }

    #[test]
    fn duplicate_detection_counts_blank_keys() {
        assert!(has_duplicate_keys(&[Entry::new("", "orphan"), Entry::empty()]));
        assert!(!has_duplicate_keys(&[Entry::new("A", "1"), Entry::empty()]));
    }
}
