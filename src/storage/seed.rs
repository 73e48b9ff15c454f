//! Demo records for trying the plugin on an empty store.

use crate::domain::error::Result;
use crate::domain::{Administrator, AdminStatus, Book, BookStatus, Entity, Expense, SchoolContext};
use crate::storage::backend::{RecordStore, Repository};
use crate::storage::query::{ListQuery, RecordPage};
use chrono::NaiveDate;

const BOOKS: &[(&str, &str, &str, bool)] = &[
    ("Dune", "Frank Herbert", "Fiction", false),
    ("A Brief History of Time", "Stephen Hawking", "Science", true),
    ("The Hobbit", "J. R. R. Tolkien", "Fiction", false),
    ("Things Fall Apart", "Chinua Achebe", "Literature", true),
    ("Cosmos", "Carl Sagan", "Science", false),
    ("Hamlet", "William Shakespeare", "Drama", false),
    ("The Origin of Species", "Charles Darwin", "Science", false),
    ("Pride and Prejudice", "Jane Austen", "Literature", true),
    ("Algebra I", "Dept. of Mathematics", "Textbook", false),
    ("World Atlas", "National Geographic", "Reference", false),
    ("Beloved", "Toni Morrison", "Literature", false),
    ("The Selfish Gene", "Richard Dawkins", "Science", true),
];

const ADMINISTRATORS: &[(&str, &str, &str, bool)] = &[
    ("Amara Okafor", "amara.okafor@school.test", "Principal", false),
    ("Li Wei", "li.wei@school.test", "Bursar", false),
    ("Sofia Marquez", "sofia.marquez@school.test", "Librarian", false),
    ("Tomasz Nowak", "tomasz.nowak@school.test", "Registrar", true),
    ("Priya Raman", "priya.raman@school.test", "Vice Principal", false),
];

const EXPENSES: &[(&str, &str, i64, (i32, u32, u32))] = &[
    ("Chalk and markers", "Supplies", 4_550, (2024, 9, 2)),
    ("Lab glassware", "Science", 32_000, (2024, 9, 10)),
    ("Library subscriptions", "Library", 120_000, (2024, 9, 15)),
    ("Bus maintenance", "Transport", 87_525, (2024, 10, 1)),
    ("Sports day catering", "Events", 45_000, (2024, 10, 12)),
    ("Printer toner", "Supplies", 9_999, (2024, 10, 20)),
    ("Roof repair", "Facilities", 250_000, (2024, 11, 3)),
];

fn is_empty<E: Entity, S: Repository<E> + ?Sized>(store: &S, context: &SchoolContext) -> Result<bool> {
    let mut query = ListQuery::new(context);
    query.page_size = 1;
    let page: RecordPage<E> = store.list(&query)?;
    Ok(page.total == 0)
}

/// Fills `context`'s collections with demo records if all of them are empty.
/// Returns the number of records created.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn seed_demo_data(store: &mut dyn RecordStore, context: &SchoolContext) -> Result<usize> {
    let _span = tracing::debug_span!("seed_demo_data", school = %context.school_id).entered();

    let empty = is_empty::<Book, _>(&*store, context)?
        && is_empty::<Administrator, _>(&*store, context)?
        && is_empty::<Expense, _>(&*store, context)?;
    if !empty {
        tracing::debug!("store already has records, skipping seed");
        return Ok(0);
    }

    let school = context.school_id.as_str();
    let mut created = 0;

    for &(title, author, category, issued) in BOOKS {
        let mut book = Book::new(school, title, author, category);
        if issued {
            book.status = BookStatus::Issued;
        }
        Repository::<Book>::create(&mut *store, book)?;
        created += 1;
    }

    for &(name, email, role, suspended) in ADMINISTRATORS {
        let mut admin = Administrator::new(school, name, email, role);
        if suspended {
            admin.status = AdminStatus::Suspended;
        }
        Repository::<Administrator>::create(&mut *store, admin)?;
        created += 1;
    }

    for &(title, category, amount, (y, m, d)) in EXPENSES {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            tracing::error!(title, "skipping demo expense with invalid date");
            continue;
        };
        Repository::<Expense>::create(&mut *store, Expense::new(school, title, category, amount, date))?;
        created += 1;
    }

    tracing::info!(created, "seeded demo data");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    #[test]
    fn seeds_once() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("records.json")).unwrap();
        let school = SchoolContext::new("north-high").unwrap();

        let created = seed_demo_data(&mut storage, &school).unwrap();
        assert_eq!(created, BOOKS.len() + ADMINISTRATORS.len() + EXPENSES.len());
        assert_eq!(seed_demo_data(&mut storage, &school).unwrap(), 0);

        let page: RecordPage<Administrator> = storage.list(&ListQuery::new(&school)).unwrap();
        assert_eq!(page.total, ADMINISTRATORS.len());
    }
}
