//! Task list editor
//!
//! Owns the ordered list of task descriptions the user is typing. Entries may
//! be blank while editing; only [`TaskList::valid_tasks`] decides what gets
//! submitted. The list never drops below one entry.

use tracing::{debug, warn};

/// One editable task-description slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEntry {
    text: String,
}

impl TaskEntry {
    /// Create an entry holding the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Raw text as typed, untrimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the entry would be dropped from the submission
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Ordered list of task entries being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    entries: Vec<TaskEntry>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList {
    /// Create a list with a single blank entry
    pub fn new() -> Self {
        Self {
            entries: vec![TaskEntry::default()],
        }
    }

    /// Seed a list from existing texts
    ///
    /// An empty iterator still yields one blank entry.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<TaskEntry> = texts.into_iter().map(TaskEntry::new).collect();
        if entries.is_empty() {
            return Self::new();
        }
        Self { entries }
    }

    /// Number of entries, blank ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true while the one-entry invariant holds
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in display order
    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    /// Entry at `index`, if any
    pub fn get(&self, index: usize) -> Option<&TaskEntry> {
        self.entries.get(index)
    }

    /// Whether the remove action is currently allowed
    pub fn can_remove(&self) -> bool {
        self.entries.len() > 1
    }

    /// Append a blank entry and return its index
    pub fn add_entry(&mut self) -> usize {
        self.entries.push(TaskEntry::default());
        let index = self.entries.len() - 1;
        debug!(index, "TaskList::add_entry: appended blank entry");
        index
    }

    /// Replace the text of the entry at `index`
    ///
    /// No trimming happens here; blank and whitespace-only text is legal while
    /// editing. Returns false (and logs) if `index` is out of range.
    pub fn update_entry(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.text = text.into();
                true
            }
            None => {
                warn!(index, len = self.entries.len(), "TaskList::update_entry: index out of range");
                false
            }
        }
    }

    /// Remove the entry at `index`, shifting later entries down
    ///
    /// No-op when only one entry remains. Returns true if an entry was removed.
    pub fn remove_entry(&mut self, index: usize) -> bool {
        if !self.can_remove() {
            debug!(index, "TaskList::remove_entry: last entry kept");
            return false;
        }
        if index >= self.entries.len() {
            warn!(index, len = self.entries.len(), "TaskList::remove_entry: index out of range");
            return false;
        }
        self.entries.remove(index);
        debug!(index, len = self.entries.len(), "TaskList::remove_entry: removed");
        true
    }

    /// Trimmed, non-blank task texts in list order
    pub fn valid_tasks(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// True when nothing would be submitted
    pub fn is_blank(&self) -> bool {
        self.entries.iter().all(TaskEntry::is_blank)
    }
}
