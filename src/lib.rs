//! Registrar: a Zellij plugin for browsing and managing school records.
//!
//! Registrar shows a school's books, administrators and expenses as paged
//! tables built on one generic [`table::DataTable`]:
//! - Sortable columns with a three-state sort cycle per column
//! - Row checkboxes with a select-all header and bulk actions
//! - Per-row actions shown only for records that qualify
//! - Server-side paging, sorting and fuzzy search against a JSON record store
//! - Storage on a Zellij worker thread so the UI never blocks

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling and refresh protocol              │
//! │  - Screen tables (books, administrators, expenses)  │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Table Core    │   │ Worker Layer  │
//! │ (ui/)         │   │ (table/)      │   │ (worker/)     │
//! │ - Rendering   │   │ - Columns     │   │ - IPC bridge  │
//! │ - Theming     │   │ - Sort/Select │   │ - Storage     │
//! │ - Components  │   │ - Pagination  │   │   (storage/)  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (records, school context, errors),          │
//! │  infrastructure (paths) and observability           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/registrar.wasm" {
//!         school "north-high"
//!         page_size "20"
//!         theme "catppuccin-latte"
//!         data_file "~/school/records.json"
//!         seed_demo_data "true"
//!         column_sizes "email=sm,title=lg"
//!         trace_level "debug"
//!     }
//! }
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Plugin Load** (`main.rs`): parse [`Config`], initialize tracing,
//!    build [`AppState`], request permissions and subscribe to events
//! 2. **Permissions Granted**: open the record store on the worker, seed it
//!    if asked to, and request the first page
//! 3. **Worker Processing**: answer each request with one response
//! 4. **Rendering**: compute the view model and draw the frame
//!
//! # Example
//!
//! ```rust
//! use registrar::{handle_event, initialize, Config, Event};
//!
//! let config = Config {
//!     school: Some("north-high".to_string()),
//!     ..Default::default()
//! };
//! let mut state = initialize(&config)?;
//!
//! let (_render, actions) = handle_event(&mut state, &Event::Refresh)?;
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), registrar::RegistrarError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod table;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, ColumnSizes, Event, InputMode, Screen, SearchFocus};
pub use domain::{RegistrarError, Result, SchoolContext};
pub use ui::Theme;

use std::collections::BTreeMap;
use table::{ColumnSize, DEFAULT_PAGE_SIZE};

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// School to sign in to. Without one the plugin starts signed out.
    pub school: Option<String>,

    /// Rows per page. Default: 10
    pub page_size: usize,

    /// Built-in theme name.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. Takes precedence over `theme_name`.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: String,

    /// Record store location; relative names resolve inside the data directory.
    pub data_file: Option<String>,

    /// Fill an empty store with demo records on load.
    pub seed_demo_data: bool,

    /// Column width overrides keyed by column id.
    pub column_sizes: ColumnSizes,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            school: None,
            page_size: DEFAULT_PAGE_SIZE,
            theme_name: None,
            theme_file: None,
            trace_level: "info".to_string(),
            data_file: None,
            seed_demo_data: false,
            column_sizes: ColumnSizes::new(),
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Missing or unparsable values fall back to their defaults. A page size
    /// of zero is rejected the same way.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use registrar::table::ColumnSize;
    /// use registrar::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("school".to_string(), "north-high".to_string());
    /// map.insert("page_size".to_string(), "0".to_string());
    /// map.insert("column_sizes".to_string(), "email=sm, title=lg".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.school.as_deref(), Some("north-high"));
    /// assert_eq!(config.page_size, 10);
    /// assert_eq!(config.column_sizes.get("email"), Some(&ColumnSize::Sm));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let non_blank = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let page_size = match config.get("page_size").map(|s| s.trim().parse::<usize>()) {
            Some(Ok(size)) if size > 0 => size,
            Some(_) => {
                tracing::warn!(value = ?config.get("page_size"), "invalid page_size, using default");
                DEFAULT_PAGE_SIZE
            }
            None => DEFAULT_PAGE_SIZE,
        };

        let seed_demo_data = config
            .get("seed_demo_data")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"));

        Self {
            school: non_blank("school"),
            page_size,
            theme_name: non_blank("theme"),
            theme_file: non_blank("theme_file"),
            trace_level: non_blank("trace_level").unwrap_or_else(|| "info".to_string()),
            data_file: non_blank("data_file"),
            seed_demo_data,
            column_sizes: config
                .get("column_sizes")
                .map(String::as_str)
                .map(parse_column_sizes)
                .unwrap_or_default(),
        }
    }
}

/// Parses `id=size` pairs separated by commas. Pairs without `=` are skipped.
fn parse_column_sizes(value: &str) -> ColumnSizes {
    value
        .split(',')
        .filter_map(|pair| {
            let (id, size) = pair.split_once('=')?;
            let id = id.trim();
            (!id.is_empty()).then(|| (id.to_string(), ColumnSize::parse(size)))
        })
        .collect()
}

/// Builds the initial application state.
///
/// The theme comes from `theme_file`, then `theme_name`, then the default;
/// a theme that fails to load is logged and replaced by the default.
///
/// # Errors
///
/// Returns an error if `config.page_size` is zero.
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(school = ?config.school, page_size = config.page_size, "initializing registrar plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(infrastructure::expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    Ok(AppState::new(theme, config.school.clone(), config.page_size)?.with_column_sizes(config.column_sizes.clone()))
}
