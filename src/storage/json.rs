//! JSON file-based storage backend.
//!
//! All collections live in one human-readable JSON file, loaded into memory on
//! open and rewritten atomically (write-to-temp + rename) after every change.
//! Filtering, sorting and slicing happen in memory, which is fine for the few
//! thousand records a school keeps per collection.

use crate::domain::error::{RegistrarError, Result};
use crate::domain::{Entity, RecordId};
use crate::storage::backend::Repository;
use crate::storage::query::{ListQuery, RecordPage};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const STORAGE_VERSION: u32 = 1;

/// JSON storage container format.
///
/// Records are kept as raw JSON values per collection so one file can hold
/// every record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    /// Collection name → record id → record.
    #[serde(default)]
    collections: BTreeMap<String, BTreeMap<RecordId, serde_json::Value>>,

    /// Highest id handed out per collection. Ids are never reused.
    #[serde(default)]
    last_ids: BTreeMap<String, RecordId>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            collections: BTreeMap::new(),
            last_ids: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// `Send` but not `Sync`; it is owned by the worker thread.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "collections": {
///     "books": {
///       "1": { "id": 1, "school": "north-high", "title": "Dune", "author": "Frank Herbert",
///              "category": "Fiction", "status": "NotIssued" }
///     }
///   },
///   "last_ids": { "books": 1 }
/// }
/// ```
#[derive(Debug)]
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    /// Set when `data` differs from the file on disk.
    dirty: bool,
}

impl JsonStorage {
    /// Opens the store at `file_path`, creating parent directories and an
    /// empty store if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but cannot be read or parsed.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| RegistrarError::Storage(format!("failed to parse {}: {e}", path.display())))?;

        if data.version > STORAGE_VERSION {
            return Err(RegistrarError::Storage(format!(
                "unsupported storage version {} (expected {STORAGE_VERSION} or older)",
                data.version
            )));
        }

        tracing::debug!(
            version = data.version,
            collections = data.collections.len(),
            "loaded storage data"
        );
        Ok(data)
    }

    /// Writes the store to disk if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temporary write or the rename fails.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| RegistrarError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn records<E: Entity>(&self) -> Result<Vec<E>> {
        self.data
            .collections
            .get(E::COLLECTION)
            .map(|collection| {
                collection
                    .values()
                    .map(|value| E::deserialize(value).map_err(RegistrarError::from))
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn put<E: Entity>(&mut self, record: &E) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.data
            .collections
            .entry(E::COLLECTION.to_string())
            .or_default()
            .insert(record.id(), value);
        self.dirty = true;
        Ok(())
    }

    fn next_id<E: Entity>(&mut self) -> RecordId {
        let last = self.data.last_ids.entry(E::COLLECTION.to_string()).or_insert(0);
        *last += 1;
        *last
    }
}

/// Whether `record` matches every whitespace-separated token of `filter`.
fn matches_filter<E: Entity>(record: &E, tokens: &[String], matcher: &SkimMatcherV2) -> bool {
    let text = record.search_text().to_lowercase();
    tokens.iter().all(|token| matcher.fuzzy_match(&text, token).is_some())
}

/// Orders by the sort key, records without a value last, then by id.
fn compare<E: Entity>(a: &E, b: &E, query: &ListQuery) -> Ordering {
    let by_key = query.sort.column.as_deref().map_or(Ordering::Equal, |key| {
        match (a.sort_value(key), b.sort_value(key)) {
            (Some(x), Some(y)) => query.sort.direction.apply(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    by_key.then_with(|| a.id().cmp(&b.id()))
}

impl<E: Entity> Repository<E> for JsonStorage {
    fn list(&self, query: &ListQuery) -> Result<RecordPage<E>> {
        let _span = tracing::debug_span!("json_list",
            collection = E::COLLECTION,
            school = %query.school,
            page = query.page,
            page_size = query.page_size
        )
        .entered();

        if query.page_size == 0 {
            return Err(RegistrarError::Storage("page size must be positive".to_string()));
        }

        let tokens: Vec<String> = query
            .filter
            .as_deref()
            .map(|f| f.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default();
        let matcher = SkimMatcherV2::default();

        let mut records: Vec<E> = self
            .records::<E>()?
            .into_iter()
            .filter(|r| r.school() == query.school)
            .filter(|r| tokens.is_empty() || matches_filter(r, &tokens, &matcher))
            .collect();

        records.sort_by(|a, b| compare(a, b, query));

        let total = records.len();
        let rows: Vec<E> = records
            .into_iter()
            .skip(query.offset())
            .take(query.page_size)
            .collect();

        tracing::debug!(rows = rows.len(), total, "listed records");
        Ok(RecordPage { rows, total })
    }

    fn create(&mut self, mut record: E) -> Result<E> {
        let _span = tracing::debug_span!("json_create", collection = E::COLLECTION).entered();

        let id = self.next_id::<E>();
        record.set_id(id);
        self.put(&record)?;
        self.flush()?;

        tracing::debug!(id, "record created");
        Ok(record)
    }

    fn update(&mut self, id: RecordId, patch: E::Patch) -> Result<bool> {
        let _span = tracing::debug_span!("json_update", collection = E::COLLECTION, id).entered();

        let Some(value) = self.data.collections.get(E::COLLECTION).and_then(|c| c.get(&id)) else {
            tracing::debug!("record not found");
            return Ok(false);
        };

        let mut record = E::deserialize(value)?;
        record.apply(patch);
        self.put(&record)?;
        self.flush()?;
        Ok(true)
    }

    fn delete(&mut self, id: RecordId) -> Result<bool> {
        let _span = tracing::debug_span!("json_delete", collection = E::COLLECTION, id).entered();

        let removed = self
            .data
            .collections
            .get_mut(E::COLLECTION)
            .and_then(|c| c.remove(&id))
            .is_some();

        if removed {
            self.dirty = true;
            self.flush()?;
        }
        tracing::debug!(removed, "delete finished");
        Ok(removed)
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.flush() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Book, BookPatch, BookStatus, Expense, SchoolContext};
    use crate::table::SortState;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> JsonStorage {
        JsonStorage::new(dir.path().join("nested").join("records.json")).unwrap()
    }

    fn school() -> SchoolContext {
        SchoolContext::new("north-high").unwrap()
    }

    fn add_books(storage: &mut JsonStorage, titles: &[&str]) {
        for title in titles {
            Repository::<Book>::create(storage, Book::new("north-high", *title, "Anon", "Fiction")).unwrap();
        }
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        let a = storage.create(Book::new("north-high", "A", "x", "y")).unwrap();
        let b = storage.create(Book::new("north-high", "B", "x", "y")).unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(Repository::<Book>::delete(&mut storage, 2).unwrap());
        let c = storage.create(Book::new("north-high", "C", "x", "y")).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn list_is_scoped_to_the_school() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        add_books(&mut storage, &["Dune"]);
        storage.create(Book::new("south-high", "Emma", "Austen", "Classic")).unwrap();

        let page: RecordPage<Book> = storage.list(&ListQuery::new(&school())).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].title, "Dune");
    }

    #[test]
    fn list_sorts_then_slices() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        add_books(&mut storage, &["c", "a", "e", "b", "d"]);

        let mut query = ListQuery::new(&school()).sort(SortState::descending("title"));
        query.page = 2;
        query.page_size = 2;
        let page: RecordPage<Book> = storage.list(&query).unwrap();
        let titles: Vec<_> = page.rows.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["c", "b"]);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn page_past_the_end_still_reports_total() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        add_books(&mut storage, &["a", "b", "c"]);

        let mut query = ListQuery::new(&school());
        query.page = 9;
        let page: RecordPage<Book> = storage.list(&query).unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn filter_matches_fuzzily() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        add_books(&mut storage, &["The Hobbit", "Dune", "Hamlet"]);

        let page: RecordPage<Book> = storage.list(&ListQuery::new(&school()).filter("hbt")).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].title, "The Hobbit");
    }

    #[test]
    fn update_applies_patch_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        {
            let mut storage = JsonStorage::new(path.clone()).unwrap();
            add_books(&mut storage, &["Dune"]);
            assert!(Repository::<Book>::update(&mut storage, 1, BookPatch::status(BookStatus::Issued)).unwrap());
            assert!(!Repository::<Book>::update(&mut storage, 99, BookPatch::default()).unwrap());
        }

        let storage = JsonStorage::new(path).unwrap();
        let page: RecordPage<Book> = storage.list(&ListQuery::new(&school())).unwrap();
        assert_eq!(page.rows[0].status, BookStatus::Issued);
    }

    #[test]
    fn collections_are_independent() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        add_books(&mut storage, &["Dune"]);
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let expense = storage
            .create(Expense::new("north-high", "Chalk", "Supplies", 450, date))
            .unwrap();
        assert_eq!(expense.id, 1);

        let page: RecordPage<Expense> = storage.list(&ListQuery::new(&school())).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn zero_page_size_is_an_error() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let mut query = ListQuery::new(&school());
        query.page_size = 0;
        assert!(Repository::<Book>::list(&storage, &query).is_err());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonStorage::new(path), Err(RegistrarError::Storage(_))));
    }
}
