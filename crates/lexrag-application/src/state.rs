use lexrag_core::library::DocumentLibrary;
use lexrag_core::message::Transcript;

/// Everything a session knows. Lives only in memory.
///
/// Owned by `SessionController`; the engines receive it by reference for
/// the duration of one call. The busy flag lives beside it as a `BusyGate`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub transcript: Transcript,
    pub library: DocumentLibrary,
    /// Every name merged locally, in merge order. Its length is the merge
    /// generation a library load is measured against.
    merged: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges uploaded names into the library and records them.
    pub fn merge_documents<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.library.merge(names.iter().cloned());
        self.merged.extend(names);
    }

    pub fn merge_generation(&self) -> usize {
        self.merged.len()
    }

    /// Applies a backend list fetched when the merge generation was
    /// `generation`. Names merged since then are kept, since the list may
    /// predate them.
    pub fn reconcile_library(&mut self, server: Vec<String>, generation: usize) {
        self.library.replace_all(server);
        let recent = self.merged.get(generation..).unwrap_or_default();
        self.library.merge(recent.iter().cloned());
    }
}
