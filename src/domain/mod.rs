//! Domain layer: records, the school context and errors.
//!
//! Nothing here depends on Zellij or on how records are stored.
//!
//! - [`error`]: Error types and result aliases
//! - [`record`]: Book, administrator and expense records plus the [`Entity`] trait
//! - [`context`]: The signed-in school

pub mod context;
pub mod error;
pub mod record;

pub use context::SchoolContext;
pub use error::{RegistrarError, Result};
pub use record::{
    AdminStatus, Administrator, AdministratorPatch, Book, BookPatch, BookStatus, Entity, Expense,
    ExpensePatch, RecordId, SortValue,
};
