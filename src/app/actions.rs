//! Side effects produced by the event handler.
//!
//! `handle_event` never calls into Zellij. It returns actions and the plugin
//! runtime executes them in order. Table callbacks produce the same type, so
//! clicking "Delete" on a row is just a list of actions to run.

use crate::worker::WorkerMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hide the plugin pane.
    CloseFocus,

    PostToWorker(WorkerMessage),
}
