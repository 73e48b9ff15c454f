//! Storage layer: the data source behind every table screen.
//!
//! - `backend`: the [`Repository`] trait and the [`RecordStore`] bundle
//! - `query`: [`ListQuery`] and [`RecordPage`]
//! - `json`: JSON file storage implementing every repository
//! - `seed`: demo records for an empty store

pub mod backend;
pub mod json;
pub mod query;
pub mod seed;

pub use backend::{RecordStore, Repository};
pub use json::JsonStorage;
pub use query::{ListQuery, RecordPage};
pub use seed::seed_demo_data;
