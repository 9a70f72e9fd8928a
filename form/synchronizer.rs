//! # Categorical Field Synchronizer
//!
//! Keeps one field group consistent with one selector. A synchronization pass:
//!
//! 1. writes "0" into every field of the group;
//! 2. looks up the selector's current value in the mapping and, when it is a known
//!    category, writes "1" into that category's field.
//!
//! Afterwards exactly one field of the group holds "1" whenever the selector holds a
//! mapped category. An unmapped value leaves the whole group at "0"; whether that is
//! reported as an error depends on the configured `UnmappedPolicy`.
//!
//! A synchronizer only ever writes the fields of its own group and never writes the
//! selector, so independent instances cannot observe each other.

use crate::document::{Document, DocumentError};
use crate::mapping::CategoryMapping;
use crate::types::{FieldEncoding, UnmappedPolicy};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Document error while synchronizing '{variable}': {source}")]
    Document {
        variable: String,
        #[source]
        source: DocumentError,
    },
    #[error(
        "The selector '{selector}' of '{variable}' holds '{value}', which is not a known category. All of its hidden fields were reset to 0."
    )]
    UnmappedCategory {
        variable: String,
        selector: String,
        value: String,
    },
}

/// Result of a synchronization pass that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The selector held `category`; `field` now holds "1" and the rest of the group "0".
    Encoded { category: String, field: String },
    /// The selector held `value`, which is not mapped; every field of the group holds "0".
    Unmapped { value: String },
}

impl SyncOutcome {
    pub fn selected_field(&self) -> Option<&str> {
        match self {
            Self::Encoded { field, .. } => Some(field),
            Self::Unmapped { .. } => None,
        }
    }
}

/// One `(selector, fields, mapping)` binding.
#[derive(Debug, Clone)]
pub struct FieldSynchronizer {
    variable: String,
    selector_id: String,
    mapping: CategoryMapping,
    policy: UnmappedPolicy,
}

impl FieldSynchronizer {
    pub fn new(
        variable: impl Into<String>,
        selector_id: impl Into<String>,
        mapping: CategoryMapping,
        policy: UnmappedPolicy,
    ) -> Self {
        Self {
            variable: variable.into(),
            selector_id: selector_id.into(),
            mapping,
            policy,
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn selector_id(&self) -> &str {
        &self.selector_id
    }

    pub fn mapping(&self) -> &CategoryMapping {
        &self.mapping
    }

    /// Runs one synchronization pass against `document`.
    pub fn synchronize<D>(&self, document: &mut D) -> Result<SyncOutcome, SyncError>
    where
        D: Document + ?Sized,
    {
        let value = document
            .selector_value(&self.selector_id)
            .map_err(|source| self.document_error(source))?
            .to_string();

        // Every field must resolve before the first write, so a failed pass leaves the
        // group as it was.
        for field in self.mapping.fields() {
            document
                .field_value(field)
                .map_err(|source| self.document_error(source))?;
        }

        for field in self.mapping.fields() {
            document
                .set_field_value(field, FieldEncoding::Unset.as_str())
                .map_err(|source| self.document_error(source))?;
        }

        let Some(field) = self.mapping.field_for(&value) else {
            log::debug!(
                "Selector '{}' of '{}' holds unmapped value '{}'; group left at 0",
                self.selector_id,
                self.variable,
                value
            );
            return match self.policy {
                UnmappedPolicy::Zeroed => Ok(SyncOutcome::Unmapped { value }),
                UnmappedPolicy::Reject => Err(SyncError::UnmappedCategory {
                    variable: self.variable.clone(),
                    selector: self.selector_id.clone(),
                    value,
                }),
            };
        };

        document
            .set_field_value(field, FieldEncoding::Set.as_str())
            .map_err(|source| self.document_error(source))?;
        log::trace!("'{}' = '{}' encoded as {}", self.variable, value, field);

        Ok(SyncOutcome::Encoded {
            category: value,
            field: field.to_string(),
        })
    }

    fn document_error(&self, source: DocumentError) -> SyncError {
        SyncError::Document {
            variable: self.variable.clone(),
            source,
        }
    }
}
