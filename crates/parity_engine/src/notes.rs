//! Human-authored notes attached to report rows.

use std::collections::BTreeMap;

/// Segment that scopes a note to the top of the report.
pub const ROOT_SEGMENT: &str = "root";

/// Finds the note written for a symbol path.
pub trait NoteLookup {
    /// Returns the note stored for exactly `path`, if any.
    fn exact(&self, path: &[String]) -> Option<&str>;

    /// Returns the note for `path`, falling back to the same path under
    /// [`ROOT_SEGMENT`].
    fn note(&self, path: &[String]) -> Option<&str> {
        if let Some(note) = self.exact(path) {
            return Some(note);
        }
        let mut rooted = Vec::with_capacity(path.len() + 1);
        rooted.push(ROOT_SEGMENT.to_string());
        rooted.extend_from_slice(path);
        self.exact(&rooted)
    }
}

/// A lookup with no notes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNotes;

impl NoteLookup for NoNotes {
    fn exact(&self, _path: &[String]) -> Option<&str> {
        None
    }
}

/// Notes keyed by dotted symbol paths such as `window.showMessage`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notes {
    entries: BTreeMap<String, String>,
}

impl Notes {
    /// Creates an empty set of notes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a note.
    #[must_use]
    pub fn with_note(mut self, path: impl Into<String>, note: impl Into<String>) -> Self {
        self.insert(path, note);
        self
    }

    /// Adds or replaces the note of a dotted path.
    pub fn insert(&mut self, path: impl Into<String>, note: impl Into<String>) {
        self.entries.insert(path.into(), note.into());
    }

    /// Returns the number of notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(dotted path, note)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl NoteLookup for Notes {
    fn exact(&self, path: &[String]) -> Option<&str> {
        self.entries.get(&path.join(".")).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Notes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut notes = Self::new();
        for (path, note) in iter {
            notes.insert(path, note);
        }
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn exact_match_wins() {
        let notes = Notes::new()
            .with_note("Widget.render", "exact")
            .with_note("root.Widget.render", "rooted");
        assert_eq!(notes.note(&path(&["Widget", "render"])), Some("exact"));
    }

    #[test]
    fn falls_back_to_root_scope() {
        let notes: Notes = [("root.Widget", "rooted")].into_iter().collect();
        assert_eq!(notes.note(&path(&["Widget"])), Some("rooted"));
        assert_eq!(notes.note(&path(&["Other"])), None);
    }

    #[test]
    fn empty_lookup_has_no_notes() {
        assert_eq!(NoNotes.note(&path(&["anything"])), None);
    }
}
