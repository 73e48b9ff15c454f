//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (main.rs) and the table, storage and
//! worker layers. Data flows one way:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input modes and screens
//! - [`screens`]: The data table behind each screen
//! - [`state`]: Application state, refresh protocol and view model computation
//!
//! # Example
//!
//! ```rust
//! use registrar::app::{handle_event, AppState, Event};
//! use registrar::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default(), Some("north-high".to_string()), 10)?;
//! let (_render, actions) = handle_event(&mut state, &Event::Refresh)?;
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), registrar::RegistrarError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod screens;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, Screen, SearchFocus};
pub use screens::ColumnSizes;
pub use state::{AppState, Notification, NotificationLevel, PAGE_SIZE_STEPS};
