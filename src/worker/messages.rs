//! Plugin ↔ worker protocol.
//!
//! The plugin thread never touches storage. It posts a [`WorkerMessage`] and
//! receives a [`WorkerResponse`], both serialized as JSON. Messages carry a
//! [`TraceContext`] so worker spans join the trace of the plugin span that
//! sent them.

use crate::domain::{
    Administrator, AdministratorPatch, Book, BookPatch, Expense, ExpensePatch, RecordId,
};
use crate::storage::ListQuery;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span the worker span should hang under.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry ids of the current tracing span.
    ///
    /// Returns `None` when no valid span is active, e.g. with tracing disabled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        span_context.is_valid().then(|| Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Record collection a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Books,
    Administrators,
    Expenses,
}

/// Loaded rows of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenRows {
    Books(Vec<Book>),
    Administrators(Vec<Administrator>),
    Expenses(Vec<Expense>),
}

impl ScreenRows {
    #[must_use]
    pub const fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Books => Self::Books(Vec::new()),
            EntityKind::Administrators => Self::Administrators(Vec::new()),
            EntityKind::Expenses => Self::Expenses(Vec::new()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Books(_) => EntityKind::Books,
            Self::Administrators(_) => EntityKind::Administrators,
            Self::Expenses(_) => EntityKind::Expenses,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Books(rows) => rows.len(),
            Self::Administrators(rows) => rows.len(),
            Self::Expenses(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A partial update of one collection's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordPatch {
    Book(BookPatch),
    Administrator(AdministratorPatch),
    Expense(ExpensePatch),
}

impl RecordPatch {
    #[must_use]
    pub const fn entity(&self) -> EntityKind {
        match self {
            Self::Book(_) => EntityKind::Books,
            Self::Administrator(_) => EntityKind::Administrators,
            Self::Expense(_) => EntityKind::Expenses,
        }
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    open(Open { data_file: String }),
    list(List { entity: EntityKind, query: ListQuery, generation: u64 }),
    update(Update { ids: Vec<RecordId>, patch: RecordPatch }),
    delete(Delete { entity: EntityKind, ids: Vec<RecordId> }),
    seed(Seed { school: String }),
}

/// Requests from the plugin thread to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Use `data_file` as the record store. Sent once on load, before any request.
    Open {
        data_file: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch one page of a collection.
    List {
        entity: EntityKind,
        query: ListQuery,
        /// Echoed back so the plugin can drop responses to superseded requests.
        generation: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Apply one patch to every record in `ids`.
    Update {
        ids: Vec<RecordId>,
        patch: RecordPatch,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    Delete {
        entity: EntityKind,
        ids: Vec<RecordId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fill an empty store with demo records for `school`.
    Seed {
        school: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Open { trace_context, .. }
            | Self::List { trace_context, .. }
            | Self::Update { trace_context, .. }
            | Self::Delete { trace_context, .. }
            | Self::Seed { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short operation name for logs and error reports.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open store",
            Self::List { .. } => "list records",
            Self::Update { .. } => "update records",
            Self::Delete { .. } => "delete records",
            Self::Seed { .. } => "seed demo data",
        }
    }
}

/// Responses from the worker thread back to the plugin thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    Opened {
        path: String,
    },

    /// One page of records and the number of records matching the query.
    Listed {
        generation: u64,
        rows: ScreenRows,
        total: usize,
    },

    Updated {
        entity: EntityKind,
        count: usize,
    },

    Deleted {
        entity: EntityKind,
        count: usize,
    },

    Seeded {
        count: usize,
    },

    /// The request failed; nothing was changed.
    Failed {
        operation: String,
        message: String,
        /// Generation of the failed `List` request, if it was one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generation: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_skip_absent_trace_context() {
        let message = WorkerMessage::delete(EntityKind::Books, vec![3, 4]);
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"Delete":{"entity":"Books","ids":[3,4]}}"#);
        assert_eq!(serde_json::from_str::<WorkerMessage>(&json).unwrap(), message);
    }

    #[test]
    fn patch_knows_its_collection() {
        let patch = RecordPatch::Book(BookPatch::default());
        assert_eq!(patch.entity(), EntityKind::Books);
        assert_eq!(ScreenRows::empty(EntityKind::Expenses).kind(), EntityKind::Expenses);
    }
}
