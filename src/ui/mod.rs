//! Terminal rendering.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI frame
//! ```
//!
//! - [`viewmodel`]: Display-ready frame data
//! - [`renderer`]: Entry point choosing the layout
//! - [`components`]: One renderer per screen region
//! - [`helpers`]: Cursor positioning, truncation, match highlighting
//! - [`theme`]: Color themes and escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{FooterInfo, HeaderInfo, NotificationInfo, SearchBarInfo, TabInfo, UIViewModel};
