//! Document library domain model.
//!
//! The library is the session's view of which documents the backend knows
//! about. Names are the natural key and stay unique at all times.

use serde::{Deserialize, Serialize};

/// One entry in the document library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Uploaded filename, unique within the library
    pub name: String,
    /// Informational only; the backend does not report per-file counts
    #[serde(default)]
    pub chunk_count: u32,
}

impl DocumentRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chunk_count: 0,
        }
    }
}

/// Ordered, name-keyed set of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLibrary {
    entries: Vec<DocumentRef>,
}

impl DocumentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole set with the backend's authoritative list.
    ///
    /// Chunk counts reset to 0. Repeated names collapse onto their first
    /// occurrence.
    pub fn replace_all<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.clear();
        self.merge(names);
    }

    /// Merges freshly uploaded names.
    ///
    /// An existing entry with the same name is replaced where it stands;
    /// unknown names are appended in arrival order.
    pub fn merge<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let entry = DocumentRef::new(name);
            match self.position(&entry.name) {
                Some(index) => self.entries[index] = entry,
                None => self.entries.push(entry),
            }
        }
    }

    /// Drops the local entry. Returns `true` when one was present.
    ///
    /// The backend keeps the document; see `LibraryService::remove`.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&DocumentRef> {
        self.entries.iter().find(|doc| doc.name == name)
    }

    pub fn entries(&self) -> &[DocumentRef] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|doc| doc.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|doc| doc.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(library: &DocumentLibrary) -> Vec<&str> {
        library.names().collect()
    }

    #[test]
    fn test_merge_appends_new_names_in_arrival_order() {
        let mut library = DocumentLibrary::new();
        library.merge(["a.pdf", "b.pdf"]);
        library.merge(["c.pdf"]);

        assert_eq!(names(&library), vec!["a.pdf", "b.pdf", "c.pdf"]);
        assert!(library.entries().iter().all(|doc| doc.chunk_count == 0));
    }

    #[test]
    fn test_merge_replaces_existing_in_place() {
        let mut library = DocumentLibrary::new();
        library.merge(["a.pdf", "b.pdf", "c.pdf"]);
        library.merge(["b.pdf", "d.pdf"]);

        assert_eq!(names(&library), vec!["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);
    }

    #[test]
    fn test_merge_never_duplicates_within_one_batch() {
        let mut library = DocumentLibrary::new();
        library.merge(["a.pdf", "a.pdf", "b.pdf", "a.pdf"]);

        assert_eq!(names(&library), vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_replace_all_is_idempotent() {
        let mut library = DocumentLibrary::new();
        library.merge(["local-only.pdf"]);

        library.replace_all(["x.pdf", "y.pdf"]);
        let first = library.clone();
        library.replace_all(["x.pdf", "y.pdf"]);

        assert_eq!(library, first);
        assert_eq!(names(&library), vec!["x.pdf", "y.pdf"]);
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut library = DocumentLibrary::new();
        library.merge(["a.pdf", "b.pdf"]);

        assert!(library.remove("a.pdf"));
        assert!(!library.remove("a.pdf"));
        assert_eq!(names(&library), vec!["b.pdf"]);
    }
}
