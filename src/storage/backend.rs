//! Storage backend abstraction.
//!
//! [`Repository`] is the data-source contract behind every table screen:
//! list one page, create, update and delete. It is generic over the record
//! type so one backend can serve every collection, and [`RecordStore`] bundles
//! the collections the plugin shows so the worker can hold a single trait
//! object.

use crate::domain::error::Result;
use crate::domain::{Administrator, Book, Entity, Expense, RecordId};
use crate::storage::query::{ListQuery, RecordPage};

/// Persistence for one record type.
///
/// # Examples
///
/// ```no_run
/// use registrar::domain::{Book, SchoolContext};
/// use registrar::storage::{JsonStorage, ListQuery, RecordPage, Repository};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/records.json"))?;
/// let school = SchoolContext::new("north-high").unwrap();
/// let page: RecordPage<Book> = storage.list(&ListQuery::new(&school).filter("dune"))?;
/// println!("{} of {}", page.rows.len(), page.total);
/// # Ok::<(), registrar::domain::RegistrarError>(())
/// ```
pub trait Repository<E: Entity> {
    /// Returns the requested page of records of `query.school` matching the
    /// filter, in the requested order, and the total number of matches.
    ///
    /// A page past the end yields no rows but still reports the total.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the page size is zero.
    fn list(&self, query: &ListQuery) -> Result<RecordPage<E>>;

    /// Stores a new record and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn create(&mut self, record: E) -> Result<E>;

    /// Applies `patch` to record `id`. Returns `false` if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    fn update(&mut self, id: RecordId, patch: E::Patch) -> Result<bool>;

    /// Removes record `id`. Returns `false` if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete(&mut self, id: RecordId) -> Result<bool>;
}

/// A backend serving every collection the plugin shows.
pub trait RecordStore:
    Repository<Book> + Repository<Administrator> + Repository<Expense> + Send
{
}

impl<S> RecordStore for S where
    S: Repository<Book> + Repository<Administrator> + Repository<Expense> + Send
{
}
