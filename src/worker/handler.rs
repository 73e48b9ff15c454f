//! Worker-side request handling.
//!
//! [`RegistrarWorker`] owns the record store and turns each
//! [`WorkerMessage`] into exactly one [`WorkerResponse`]. It does not talk to
//! Zellij itself; the plugin binary feeds it payloads and posts back what it
//! returns, which keeps this module testable on the host.

use crate::domain::error::{RegistrarError, Result};
use crate::domain::{Administrator, Book, Entity, Expense, RecordId, SchoolContext};
use crate::infrastructure::paths;
use crate::storage::{seed_demo_data, JsonStorage, ListQuery, RecordPage, RecordStore, Repository};
use crate::worker::messages::{EntityKind, RecordPatch, ScreenRows};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::path::PathBuf;

/// File name of the record store inside the plugin data directory.
pub const DEFAULT_DATA_FILE: &str = "records.json";

/// Worker thread state. The store is opened lazily on the first request.
#[derive(Default)]
pub struct RegistrarWorker {
    storage: Option<Box<dyn RecordStore>>,
    data_file: Option<PathBuf>,
}

impl std::fmt::Debug for RegistrarWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarWorker")
            .field("open", &self.storage.is_some())
            .field("data_file", &self.data_file)
            .finish()
    }
}

fn list_page<E, S>(store: &S, query: &ListQuery) -> Result<RecordPage<E>>
where
    E: Entity,
    S: Repository<E> + ?Sized,
{
    store.list(query)
}

fn update_each<E, S>(store: &mut S, ids: &[RecordId], patch: &E::Patch) -> Result<usize>
where
    E: Entity,
    E::Patch: Clone,
    S: Repository<E> + ?Sized,
{
    let mut count = 0;
    for &id in ids {
        if store.update(id, patch.clone())? {
            count += 1;
        }
    }
    Ok(count)
}

fn delete_each<E, S>(store: &mut S, ids: &[RecordId]) -> Result<usize>
where
    E: Entity,
    S: Repository<E> + ?Sized,
{
    let mut count = 0;
    for &id in ids {
        if store.delete(id)? {
            count += 1;
        }
    }
    Ok(count)
}

impl RegistrarWorker {
    fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| paths::get_data_dir().join(DEFAULT_DATA_FILE))
    }

    fn storage(&mut self) -> Result<&mut (dyn RecordStore + 'static)> {
        if self.storage.is_none() {
            let store = JsonStorage::new(self.data_file())?;
            self.storage = Some(Box::new(store));
        }
        self.storage
            .as_deref_mut()
            .ok_or_else(|| RegistrarError::Worker("storage not initialized".to_string()))
    }

    fn open(&mut self, data_file: &str) -> Result<WorkerResponse> {
        let path = paths::resolve_data_file(data_file);
        let store = JsonStorage::new(path.clone())?;
        self.storage = Some(Box::new(store));
        self.data_file = Some(path.clone());
        Ok(WorkerResponse::Opened {
            path: path.display().to_string(),
        })
    }

    fn list(&mut self, entity: EntityKind, query: &ListQuery, generation: u64) -> Result<WorkerResponse> {
        let store = self.storage()?;
        let (rows, total) = match entity {
            EntityKind::Books => {
                let page = list_page::<Book, _>(&*store, query)?;
                (ScreenRows::Books(page.rows), page.total)
            }
            EntityKind::Administrators => {
                let page = list_page::<Administrator, _>(&*store, query)?;
                (ScreenRows::Administrators(page.rows), page.total)
            }
            EntityKind::Expenses => {
                let page = list_page::<Expense, _>(&*store, query)?;
                (ScreenRows::Expenses(page.rows), page.total)
            }
        };
        tracing::debug!(rows = rows.len(), total, generation, "records listed");
        Ok(WorkerResponse::Listed { generation, rows, total })
    }

    fn update(&mut self, ids: &[RecordId], patch: &RecordPatch) -> Result<WorkerResponse> {
        let store = self.storage()?;
        let count = match patch {
            RecordPatch::Book(p) => update_each::<Book, _>(store, ids, p)?,
            RecordPatch::Administrator(p) => update_each::<Administrator, _>(store, ids, p)?,
            RecordPatch::Expense(p) => update_each::<Expense, _>(store, ids, p)?,
        };
        Ok(WorkerResponse::Updated {
            entity: patch.entity(),
            count,
        })
    }

    fn delete(&mut self, entity: EntityKind, ids: &[RecordId]) -> Result<WorkerResponse> {
        let store = self.storage()?;
        let count = match entity {
            EntityKind::Books => delete_each::<Book, _>(store, ids)?,
            EntityKind::Administrators => delete_each::<Administrator, _>(store, ids)?,
            EntityKind::Expenses => delete_each::<Expense, _>(store, ids)?,
        };
        Ok(WorkerResponse::Deleted { entity, count })
    }

    fn seed(&mut self, school: &str) -> Result<WorkerResponse> {
        let context = SchoolContext::new(school)
            .ok_or_else(|| RegistrarError::Config("cannot seed without a school".to_string()))?;
        let count = seed_demo_data(self.storage()?, &context)?;
        Ok(WorkerResponse::Seeded { count })
    }

    /// Attaches the sender's trace context so this thread's spans join its trace.
    ///
    /// The returned guard must live as long as the handling span.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }

    /// Handles one request. Failures become [`WorkerResponse::Failed`].
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let operation = message.operation();
        let _span = tracing::debug_span!("worker_handle_message", operation).entered();

        let generation = match &message {
            WorkerMessage::List { generation, .. } => Some(*generation),
            _ => None,
        };

        let result = match message {
            WorkerMessage::Open { data_file, .. } => self.open(&data_file),
            WorkerMessage::List { entity, query, generation, .. } => self.list(entity, &query, generation),
            WorkerMessage::Update { ids, patch, .. } => self.update(&ids, &patch),
            WorkerMessage::Delete { entity, ids, .. } => self.delete(entity, &ids),
            WorkerMessage::Seed { school, .. } => self.seed(&school),
        };

        result.unwrap_or_else(|e| {
            tracing::error!(operation, error = %e, "worker request failed");
            WorkerResponse::Failed {
                operation: operation.to_string(),
                message: e.to_string(),
                generation,
            }
        })
    }

    /// Decodes a JSON request, handles it and encodes the response.
    ///
    /// Returns `None` if the response cannot be serialized. A malformed request
    /// is answered with [`WorkerResponse::Failed`].
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let response = match serde_json::from_str::<WorkerMessage>(payload) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                tracing::error!(error = %e, "failed to deserialize worker message");
                WorkerResponse::Failed {
                    operation: "decode request".to_string(),
                    message: e.to_string(),
                    generation: None,
                }
            }
        };

        serde_json::to_string(&response)
            .map_err(|e| tracing::error!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}
