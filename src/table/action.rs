//! Row and bulk actions.
//!
//! A [`RowAction`] operates on one record and may be gated by a pure
//! `condition` predicate that is re-evaluated for every row on every render. A
//! [`BulkAction`] receives the selected records once per invocation; iterating
//! over them is the action's own job.
//!
//! Callbacks return a host-chosen output `O` (for the plugin this is the list
//! of side effects to run). The table hands that value back untouched and
//! never catches or inspects it.

use super::error::TableError;
use std::fmt;

/// Visual weight of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Default,
    Primary,
    Secondary,
    Outline,
    Destructive,
}

/// A variant fixed for all rows, or computed from the record.
pub enum Variant<T> {
    Static(ButtonVariant),
    Computed(Box<dyn Fn(&T) -> ButtonVariant>),
}

impl<T> Variant<T> {
    pub fn resolve(&self, record: &T) -> ButtonVariant {
        match self {
            Self::Static(variant) => *variant,
            Self::Computed(f) => f(record),
        }
    }
}

impl<T> Default for Variant<T> {
    fn default() -> Self {
        Self::Static(ButtonVariant::Default)
    }
}

/// A label fixed for all rows, or computed from the record.
pub enum Label<T> {
    Static(String),
    Computed(Box<dyn Fn(&T) -> String>),
}

impl<T> Label<T> {
    pub fn resolve(&self, record: &T) -> String {
        match self {
            Self::Static(label) => label.clone(),
            Self::Computed(f) => f(record),
        }
    }
}

/// Per-row operation.
pub struct RowAction<T, O> {
    pub label: Label<T>,
    pub on_click: Box<dyn Fn(&T) -> O>,
    pub variant: Variant<T>,
    /// Gates availability per row; `None` means always available.
    pub condition: Option<Box<dyn Fn(&T) -> bool>>,
}

impl<T, O> RowAction<T, O> {
    pub fn new(label: impl Into<String>, on_click: impl Fn(&T) -> O + 'static) -> Self {
        Self {
            label: Label::Static(label.into()),
            on_click: Box::new(on_click),
            variant: Variant::default(),
            condition: None,
        }
    }

    /// Replaces the static label with one computed from the record.
    #[must_use]
    pub fn label_fn(mut self, f: impl Fn(&T) -> String + 'static) -> Self {
        self.label = Label::Computed(Box::new(f));
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = Variant::Static(variant);
        self
    }

    #[must_use]
    pub fn variant_fn(mut self, f: impl Fn(&T) -> ButtonVariant + 'static) -> Self {
        self.variant = Variant::Computed(Box::new(f));
        self
    }

    /// Only offers the action for records matching `condition`.
    #[must_use]
    pub fn when(mut self, condition: impl Fn(&T) -> bool + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn is_available(&self, record: &T) -> bool {
        self.condition.as_ref().map_or(true, |c| c(record))
    }

    pub fn label_for(&self, record: &T) -> String {
        self.label.resolve(record)
    }

    /// Runs the action on `record`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ActionUnavailable`] without calling `on_click`
    /// when the condition rejects the record.
    pub fn invoke(&self, record: &T) -> Result<O, TableError> {
        if !self.is_available(record) {
            let label = self.label_for(record);
            tracing::debug!(action = %label, "row action not available for record");
            return Err(TableError::ActionUnavailable { label });
        }
        Ok((self.on_click)(record))
    }
}

impl<T, O> fmt::Debug for RowAction<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match &self.label {
            Label::Static(label) => label.as_str(),
            Label::Computed(_) => "<computed>",
        };
        f.debug_struct("RowAction")
            .field("label", &label)
            .field("conditional", &self.condition.is_some())
            .finish_non_exhaustive()
    }
}

/// Operation over the current selection.
pub struct BulkAction<T, O> {
    pub label: String,
    pub on_click: Box<dyn Fn(&[&T]) -> O>,
    pub variant: ButtonVariant,
}

impl<T, O> BulkAction<T, O> {
    pub fn new(label: impl Into<String>, on_click: impl Fn(&[&T]) -> O + 'static) -> Self {
        Self {
            label: label.into(),
            on_click: Box::new(on_click),
            variant: ButtonVariant::Default,
        }
    }

    #[must_use]
    pub const fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Calls `on_click` exactly once with all of `records`.
    pub fn invoke(&self, records: &[&T]) -> O {
        tracing::debug!(action = %self.label, records = records.len(), "bulk action invoked");
        (self.on_click)(records)
    }
}

impl<T, O> fmt::Debug for BulkAction<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("label", &self.label)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}
