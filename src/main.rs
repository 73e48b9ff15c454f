//! Zellij plugin wrapper and entry point.
//!
//! The thin layer between the Registrar library and Zellij: it implements
//! `ZellijPlugin` and `ZellijWorker`, maps keys to library events and runs the
//! actions the library returns. Nothing else in the crate calls Zellij.
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling
//! │  └──────────────────┘   │
//! │          │ JSON         │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │  Worker          │   │  ← Record store
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Keybindings
//!
//! Normal mode, and search mode once the results have focus:
//! - `j`/`Down`, `k`/`Up`: Move the cursor
//! - `space`: Toggle the focused row, `a`: toggle all, `c`: clear selection
//! - `1`–`9`: Sort by column n
//! - `h`/`Left`, `l`/`Right`: Previous / next page
//! - `+`, `-`: Grow / shrink the page size
//! - `Enter`: First available row action; `x`, `X`: second and third action
//! - `b`: Bulk action over the selection
//! - `/`: Search
//!
//! Normal mode only:
//! - `Tab`: Next screen
//! - `L`: Sign out / sign in
//! - `r`: Reload the page
//! - `Esc`: Dismiss the notification
//! - `q`: Close plugin
//!
//! While typing a search: characters edit the query, `Enter` moves focus to
//! the results, `Esc` clears the search.

#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use registrar::worker::{RegistrarWorker, WorkerMessage, WorkerResponse, DEFAULT_DATA_FILE};
use registrar::{handle_event, Action, Config, Event, InputMode, SearchFocus};

register_plugin!(State);
register_worker!(Worker, registrar_worker, REGISTRAR_WORKER);

/// Worker name used for routing in both directions.
const WORKER_NAME: &str = "registrar";

struct State {
    app: registrar::AppState,

    /// Record store path sent to the worker once permissions are granted.
    data_file: String,

    seed_demo_data: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: registrar::AppState::default(),
            data_file: DEFAULT_DATA_FILE.to_string(),
            seed_demo_data: false,
        }
    }
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        registrar::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(config = ?config, "parsed configuration");
        match registrar::initialize(&config) {
            Ok(app) => self.app = app,
            Err(e) => tracing::error!(error = %e, "failed to initialize, keeping defaults"),
        }
        self.data_file = config.data_file.unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
        self.seed_demo_data = config.seed_demo_data;

        request_permission(&[PermissionType::ReadApplicationState, PermissionType::FullHdAccess]);
        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                return self.handle_permission_result(permissions);
            }
            _ => return false,
        };

        self.dispatch(&our_event)
    }

    fn render(&mut self, rows: usize, cols: usize) {
        print!("{}", registrar::ui::render(&self.app, rows, cols));
    }
}

impl State {
    fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for a in actions {
                    Self::execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::error!(error = %e, "error handling event");
                self.app.notify_error(e.to_string());
                true
            }
        }
    }

    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::CursorDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::CursorUp);
        }

        match self.app.input_mode {
            InputMode::Search(SearchFocus::Typing) => Some(match key.bare_key {
                BareKey::Esc => Event::ExitSearch,
                BareKey::Enter => Event::FocusResults,
                BareKey::Down => Event::CursorDown,
                BareKey::Up => Event::CursorUp,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            }),
            InputMode::Search(SearchFocus::Navigating) => match key.bare_key {
                BareKey::Esc => Some(Event::ExitSearch),
                BareKey::Char('/') => Some(Event::FocusSearchBar),
                bare_key => Self::map_table_key(bare_key),
            },
            InputMode::Normal => match key.bare_key {
                BareKey::Esc => Some(Event::Dismiss),
                BareKey::Char('q') => Some(Event::CloseFocus),
                BareKey::Char('/') => Some(Event::SearchMode),
                BareKey::Tab => Some(Event::NextScreen),
                BareKey::Char('L') => Some(Event::ToggleSignIn),
                BareKey::Char('r') => Some(Event::Refresh),
                bare_key => Self::map_table_key(bare_key),
            },
        }
    }

    /// Keys that drive the table in normal mode and while browsing results.
    fn map_table_key(bare_key: BareKey) -> Option<Event> {
        Some(match bare_key {
            BareKey::Down | BareKey::Char('j') => Event::CursorDown,
            BareKey::Up | BareKey::Char('k') => Event::CursorUp,
            BareKey::Char(' ') => Event::ToggleRow,
            BareKey::Char('a') => Event::ToggleAll,
            BareKey::Char('c') => Event::ClearSelection,
            BareKey::Char(c @ '1'..='9') => Event::SortColumn(c as usize - '1' as usize),
            BareKey::Left | BareKey::Char('h') => Event::PreviousPage,
            BareKey::Right | BareKey::Char('l') => Event::NextPage,
            BareKey::Char('+' | '=') => Event::GrowPage,
            BareKey::Char('-') => Event::ShrinkPage,
            BareKey::Enter => Event::PrimaryRowAction,
            BareKey::Char('x') => Event::RowAction(1),
            BareKey::Char('X') => Event::RowAction(2),
            BareKey::Char('b') => Event::BulkAction(0),
            _ => return None,
        })
    }

    fn handle_permission_result(&mut self, permissions: PermissionStatus) -> bool {
        match permissions {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted - opening record store");
                Self::post_worker_message(&WorkerMessage::open(self.data_file.clone()));
                if self.seed_demo_data {
                    if let Some(school) = self.app.school.clone() {
                        Self::post_worker_message(&WorkerMessage::seed(school));
                    }
                }
                self.dispatch(&Event::Refresh)
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - records cannot be loaded");
                self.app.notify_error("Permissions denied; records cannot be loaded");
                true
            }
        }
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }
        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::error!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(operation = message.operation(), payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize worker message");
            }
        }
    }

    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::PostToWorker(ref message) => Self::post_worker_message(message),
        }
    }
}

/// Tracks whether worker tracing has been initialized.
static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Worker thread entry. Zellij requires the worker to be serializable; the
/// record store is not, so it is skipped and rebuilt lazily.
#[derive(Default, Serialize, Deserialize)]
struct Worker {
    #[serde(skip)]
    inner: RegistrarWorker,
}

impl ZellijWorker<'_> for Worker {
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            registrar::observability::init_tracing(&Config::default());
        }

        if let Some(payload) = self.inner.handle_payload(&payload) {
            post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            });
        }
    }
}
