use std::fmt;

/// Identity of one rendered list entry.
///
/// Ids are handed out in increasing order and never reused, not even after a
/// reset, so two entries with the same path stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    id: EntryId,
    path: String,
    selected: bool,
}

impl FolderEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Ordered backup source folders as shown in the UI list.
///
/// Insertion order is display order. Paths are not deduplicated: the same
/// path added twice yields two independently selectable entries.
#[derive(Debug, Default)]
pub struct SelectionList {
    entries: Vec<FolderEntry>,
    next_id: u64,
}

impl SelectionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unselected entry and return its id.
    pub fn add(&mut self, path: impl Into<String>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(FolderEntry {
            id,
            path: path.into(),
            selected: false,
        });
        id
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Flip the selection of the first entry (in display order) showing `path`.
    ///
    /// Returns `false` when no entry has that path.
    pub fn toggle_selection(&mut self, path: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.path == path) {
            Some(entry) => {
                entry.selected = !entry.selected;
                true
            }
            None => false,
        }
    }

    /// Flip the selection of exactly one rendered entry.
    pub fn toggle_entry(&mut self, id: EntryId) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.selected = !entry.selected;
                true
            }
            None => false,
        }
    }

    /// Remove every selected entry, returning their paths in display order.
    pub fn remove_selected(&mut self) -> Vec<String> {
        if !self.entries.iter().any(|e| e.selected) {
            return Vec::new();
        }

        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|e| e.selected);
        self.entries = kept;
        removed.into_iter().map(|e| e.path).collect()
    }

    pub fn get(&self, id: EntryId) -> Option<&FolderEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[FolderEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &FolderEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn selected_paths(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.path.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a SelectionList {
    type Item = &'a FolderEntry;
    type IntoIter = std::slice::Iter<'a, FolderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
