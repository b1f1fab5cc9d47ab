//! The exam library.
//!
//! Holds the ordered list of imported entries (most recent first) and writes
//! the whole list back to its storage slot after every change. Storage
//! failures never lose the in-memory state: the library keeps working and
//! reports that it is running in degraded mode.

use chalkboard_core::import::import_bank;
use chalkboard_core::{ExamEntry, ImportError, LibraryEntry, PartitionPolicy};

use crate::backend::KeyValueStore;
use crate::migrate::{decode_library, encode_library};

/// Default name of the storage slot.
pub const DEFAULT_STORAGE_KEY: &str = "chalk_exam_library_v2";

/// Whether the last write reached durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Durable,
    /// The write was rejected; changes live only in memory.
    Degraded,
}

impl Persistence {
    pub fn is_degraded(self) -> bool {
        self == Persistence::Degraded
    }
}

/// What happened when the library was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing was stored yet.
    Empty,
    /// Entries were read; `migrated` of them used the pre-folder schema and
    /// `skipped` unreadable ones were dropped.
    Loaded {
        entries: usize,
        migrated: usize,
        skipped: usize,
    },
    /// Stored data was unreadable; the library starts empty.
    Recovered { reason: String },
}

/// Result of an import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The entry that was added to the front of the library.
    pub entry: LibraryEntry,
    pub persistence: Persistence,
}

/// Result of removing a part from a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildRemoval {
    /// The folder became empty and was removed as well.
    pub folder_removed: bool,
    pub persistence: Persistence,
}

/// The persisted collection of exams and folders.
pub struct Library {
    store: Box<dyn KeyValueStore>,
    key: String,
    policy: PartitionPolicy,
    entries: Vec<LibraryEntry>,
    degraded: bool,
    load_status: LoadStatus,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("store", &self.store.name())
            .field("key", &self.key)
            .field("policy", &self.policy)
            .field("entries", &self.entries.len())
            .field("degraded", &self.degraded)
            .finish()
    }
}

impl Library {
    /// Open the library stored under `key`.
    ///
    /// Unreadable data is logged and replaced by an empty library; see
    /// [`Library::load_status`].
    pub fn open(store: Box<dyn KeyValueStore>, key: &str, policy: PartitionPolicy) -> Self {
        let (entries, load_status) = match store.get(key) {
            Ok(None) => (Vec::new(), LoadStatus::Empty),
            Ok(Some(raw)) => match decode_library(&raw) {
                Ok(decoded) => {
                    tracing::debug!(
                        store = store.name(),
                        entries = decoded.entries.len(),
                        migrated = decoded.migrated,
                        skipped = decoded.skipped,
                        "library loaded"
                    );
                    if decoded.skipped > 0 {
                        tracing::warn!(
                            skipped = decoded.skipped,
                            "some stored entries were unreadable and will be dropped on the next save"
                        );
                    }
                    let status = LoadStatus::Loaded {
                        entries: decoded.entries.len(),
                        migrated: decoded.migrated,
                        skipped: decoded.skipped,
                    };
                    (decoded.entries, status)
                }
                Err(e) => {
                    tracing::warn!("failed to load library, starting empty: {e}");
                    (Vec::new(), LoadStatus::Recovered { reason: e.to_string() })
                }
            },
            Err(e) => {
                tracing::warn!("failed to read library slot, starting empty: {e}");
                (Vec::new(), LoadStatus::Recovered { reason: e.to_string() })
            }
        };

        Self {
            store,
            key: key.to_string(),
            policy,
            entries,
            degraded: false,
            load_status,
        }
    }

    /// Entries, most recently added first.
    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Returns `true` if the last write failed and changes are session-only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Find a root entry by id.
    pub fn entry(&self, id: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Find an exam by id, at the root or inside a folder.
    pub fn find_exam(&self, id: &str) -> Option<&ExamEntry> {
        self.entries.iter().find_map(|entry| match entry {
            LibraryEntry::Exam(exam) if exam.id == id => Some(exam),
            LibraryEntry::Exam(_) => None,
            LibraryEntry::Folder(folder) => folder.children.iter().find(|c| c.id == id),
        })
    }

    /// Import a bank and add it to the front of the library.
    ///
    /// Parse failures leave the library untouched.
    pub fn import(&mut self, raw: &str, name: &str) -> Result<ImportOutcome, ImportError> {
        let entry = import_bank(raw, name, self.policy)?;
        match &entry {
            LibraryEntry::Exam(exam) => tracing::info!(
                id = %exam.id,
                name = %exam.name,
                questions = exam.data.items.len(),
                "imported exam"
            ),
            LibraryEntry::Folder(folder) => tracing::info!(
                id = %folder.id,
                name = %folder.name,
                parts = folder.children.len(),
                "imported bank as folder"
            ),
        }

        self.entries.insert(0, entry.clone());
        let persistence = self.persist();
        Ok(ImportOutcome { entry, persistence })
    }

    /// Remove a root entry (an exam or a whole folder).
    ///
    /// Returns `None` if no entry has this id.
    pub fn delete_entry(&mut self, id: &str) -> Option<Persistence> {
        let pos = self.entries.iter().position(|entry| entry.id() == id)?;
        let removed = self.entries.remove(pos);
        tracing::info!(id, name = removed.name(), "deleted library entry");
        Some(self.persist())
    }

    /// Remove one part of a folder. A folder left without parts is removed.
    ///
    /// Returns `None` if the folder or the part does not exist.
    pub fn delete_child(&mut self, folder_id: &str, child_id: &str) -> Option<ChildRemoval> {
        let folder = self.entries.iter_mut().find_map(|entry| match entry {
            LibraryEntry::Folder(folder) if folder.id == folder_id => Some(folder),
            _ => None,
        })?;
        let pos = folder.children.iter().position(|child| child.id == child_id)?;
        folder.children.remove(pos);
        tracing::info!(folder_id, child_id, "deleted folder part");

        let before = self.entries.len();
        self.entries.retain(|entry| match entry {
            LibraryEntry::Exam(_) => true,
            LibraryEntry::Folder(folder) => !folder.children.is_empty(),
        });
        let folder_removed = self.entries.len() < before;
        if folder_removed {
            tracing::info!(folder_id, "removed empty folder");
        }

        Some(ChildRemoval {
            folder_removed,
            persistence: self.persist(),
        })
    }

    /// Remove every entry.
    pub fn clear(&mut self) -> Persistence {
        tracing::info!(entries = self.entries.len(), "clearing library");
        self.entries.clear();
        self.persist()
    }

    /// Write the whole list to the storage slot.
    fn persist(&mut self) -> Persistence {
        let result =
            encode_library(&self.entries).and_then(|json| self.store.set(&self.key, &json));
        match result {
            Ok(()) => {
                self.degraded = false;
                Persistence::Durable
            }
            Err(e) => {
                tracing::warn!(
                    store = self.store.name(),
                    "failed to save library, changes are kept in memory only: {e}"
                );
                self.degraded = true;
                Persistence::Degraded
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;

    fn bank(count: usize) -> String {
        let items: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"id":{i},"type":"填空","title":"Q{i}","correctAnswer":["a"]}}"#))
            .collect();
        format!(r#"{{"source":"t","ts":1,"items":[{}]}}"#, items.join(","))
    }

    fn library() -> Library {
        Library::open(
            Box::new(MemoryStore::new()),
            DEFAULT_STORAGE_KEY,
            PartitionPolicy::default(),
        )
    }

    #[test]
    fn open_empty() {
        let lib = library();
        assert!(lib.is_empty());
        assert_eq!(lib.load_status(), &LoadStatus::Empty);
        assert!(!lib.is_degraded());
    }

    #[test]
    fn import_prepends() {
        let mut lib = library();
        lib.import(&bank(3), "first").unwrap();
        let outcome = lib.import(&bank(4), "second").unwrap();
        assert_eq!(outcome.persistence, Persistence::Durable);
        let names: Vec<&str> = lib.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, ["second", "first"]);
    }

    #[test]
    fn failed_import_changes_nothing() {
        let mut lib = library();
        lib.import(&bank(1), "keep").unwrap();
        let err = lib.import("garbage", "bad").unwrap_err();
        assert_eq!(err.kind(), chalkboard_core::ErrorKind::ParseFailure);
        assert_eq!(lib.entries().len(), 1);
    }

    #[test]
    fn find_exam_searches_folders() {
        let mut lib = library();
        let outcome = lib.import(&bank(60), "big").unwrap();
        let LibraryEntry::Folder(folder) = outcome.entry else {
            panic!("expected folder");
        };
        let part = &folder.children[1];
        assert_eq!(lib.find_exam(&part.id).map(|e| e.data.items.len()), Some(10));
        assert!(lib.find_exam(&folder.id).is_none());
        assert!(lib.entry(&folder.id).is_some());
    }

    #[test]
    fn deleting_last_child_removes_folder() {
        let mut lib = library();
        lib.import(&bank(2), "single").unwrap();
        let LibraryEntry::Folder(folder) = lib.import(&bank(51), "big").unwrap().entry else {
            panic!("expected folder");
        };
        assert_eq!(folder.children.len(), 2);

        let first = lib.delete_child(&folder.id, &folder.children[0].id).unwrap();
        assert!(!first.folder_removed);
        assert_eq!(lib.entries().len(), 2);

        let second = lib.delete_child(&folder.id, &folder.children[1].id).unwrap();
        assert!(second.folder_removed);
        assert_eq!(lib.entries().len(), 1);
        assert!(lib.entry(&folder.id).is_none());
    }

    #[test]
    fn delete_missing_is_none() {
        let mut lib = library();
        lib.import(&bank(2), "single").unwrap();
        let id = lib.entries()[0].id().to_string();
        assert!(lib.delete_entry("nope").is_none());
        assert!(lib.delete_child(&id, "nope").is_none());
        assert_eq!(lib.delete_entry(&id), Some(Persistence::Durable));
        assert!(lib.is_empty());
    }

    #[test]
    fn quota_failure_degrades_but_keeps_entries() {
        let mut lib = Library::open(
            Box::new(MemoryStore::with_quota(64)),
            DEFAULT_STORAGE_KEY,
            PartitionPolicy::default(),
        );
        let outcome = lib.import(&bank(20), "too big").unwrap();
        assert_eq!(outcome.persistence, Persistence::Degraded);
        assert!(lib.is_degraded());
        assert_eq!(lib.entries().len(), 1);

        // Shrinking the library makes the write fit again.
        assert_eq!(lib.clear(), Persistence::Durable);
        assert!(!lib.is_degraded());
    }
}
