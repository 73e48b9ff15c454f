//! Background worker: all storage I/O runs here, off the render thread.
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: request handling over the record store

pub mod handler;
pub mod messages;

pub use handler::{RegistrarWorker, DEFAULT_DATA_FILE};
pub use messages::{EntityKind, RecordPatch, ScreenRows, TraceContext, WorkerMessage, WorkerResponse};
