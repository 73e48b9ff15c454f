//! School-administration records shown by the plugin's screens.
//!
//! Every record type implements [`Entity`], which is all the storage layer
//! needs to persist, scope, search and sort it. Records belong to exactly one
//! school; listing is always scoped to the current [`SchoolContext`](super::SchoolContext).

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage identifier of a record. `0` means "not stored yet".
pub type RecordId = u64;

/// A comparable value extracted from a record for a sort key.
///
/// Text compares case-insensitively. Values of different kinds never meet in
/// practice since one sort key always yields one kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }
}

/// A persistable, school-scoped record.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Name of the storage collection holding this record type.
    const COLLECTION: &'static str;

    /// Partial update accepted by [`Entity::apply`].
    type Patch: fmt::Debug + Serialize + DeserializeOwned;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    /// School the record belongs to.
    fn school(&self) -> &str;

    /// Value used when sorting by `key`, or `None` if the key is unknown.
    fn sort_value(&self, key: &str) -> Option<SortValue>;

    /// Text the search filter is matched against.
    fn search_text(&self) -> String;

    fn apply(&mut self, patch: Self::Patch);
}

/// Circulation status of a library book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookStatus {
    Issued,
    #[default]
    NotIssued,
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issued => f.write_str("Issued"),
            Self::NotIssued => f.write_str("Not Issued"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: RecordId,
    pub school: String,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub status: BookStatus,
}

impl Book {
    pub fn new(
        school: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            school: school.into(),
            title: title.into(),
            author: author.into(),
            category: category.into(),
            status: BookStatus::NotIssued,
        }
    }

    #[must_use]
    pub fn is_issued(&self) -> bool {
        self.status == BookStatus::Issued
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,
}

impl BookPatch {
    #[must_use]
    pub fn status(status: BookStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Entity for Book {
    const COLLECTION: &'static str = "books";
    type Patch = BookPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn school(&self) -> &str {
        &self.school
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "title" => Some(SortValue::text(&self.title)),
            "author" => Some(SortValue::text(&self.author)),
            "category" => Some(SortValue::text(&self.category)),
            "status" => Some(SortValue::text(&self.status.to_string())),
            _ => None,
        }
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.author, self.category)
    }

    fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdminStatus {
    #[default]
    Active,
    Suspended,
}

impl fmt::Display for AdminStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Suspended => f.write_str("Suspended"),
        }
    }
}

/// A school staff account with administrative access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Administrator {
    #[serde(default)]
    pub id: RecordId,
    pub school: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub status: AdminStatus,
}

impl Administrator {
    pub fn new(
        school: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            school: school.into(),
            name: name.into(),
            email: email.into(),
            role: role.into(),
            status: AdminStatus::Active,
        }
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.status == AdminStatus::Suspended
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AdminStatus>,
}

impl AdministratorPatch {
    #[must_use]
    pub fn status(status: AdminStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Entity for Administrator {
    const COLLECTION: &'static str = "administrators";
    type Patch = AdministratorPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn school(&self) -> &str {
        &self.school
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "name" => Some(SortValue::text(&self.name)),
            "email" => Some(SortValue::text(&self.email)),
            "role" => Some(SortValue::text(&self.role)),
            "status" => Some(SortValue::text(&self.status.to_string())),
            _ => None,
        }
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.email, self.role)
    }

    fn apply(&mut self, patch: AdministratorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// A school expense. Amounts are stored in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default)]
    pub id: RecordId,
    pub school: String,
    pub title: String,
    pub category: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(
        school: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        amount_cents: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            school: school.into(),
            title: title.into(),
            category: category.into(),
            amount_cents,
            date,
        }
    }

    /// Amount formatted as units and cents, e.g. `1250.05`.
    #[must_use]
    pub fn formatted_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let cents = self.amount_cents.unsigned_abs();
        format!("{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Entity for Expense {
    const COLLECTION: &'static str = "expenses";
    type Patch = ExpensePatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn school(&self) -> &str {
        &self.school
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "title" => Some(SortValue::text(&self.title)),
            "category" => Some(SortValue::text(&self.category)),
            "amount" => Some(SortValue::Integer(self.amount_cents)),
            "date" => Some(SortValue::Date(self.date)),
            _ => None,
        }
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.title, self.category)
    }

    fn apply(&mut self, patch: ExpensePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(amount) = patch.amount_cents {
            self.amount_cents = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}
