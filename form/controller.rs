//! # Form Controller
//!
//! Owns a document and one synchronizer per configured variable. Attaching the
//! controller is the page-setup step: every synchronizer is constructed once and an
//! initial change notification is synthesized for each selector, so the hidden fields
//! reflect the default selections before any user interaction.
//!
//! Change notifications are delivered one at a time through `&mut self`, and each is
//! processed to completion before the next one can be dispatched.

use crate::config::{ConfigError, FormConfig};
use crate::document::{Document, DocumentError};
use crate::encoded::{EncodedForm, EncodedGroup};
use crate::synchronizer::{FieldSynchronizer, SyncError, SyncOutcome};
use crate::types::{ChangeEvent, FieldEncoding};
use thiserror::Error;

/// Top-level error for everything the controller can run into.
#[derive(Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("No categorical variable is bound to the selector '{0}'.")]
    UnboundSelector(String),
}

/// What one synchronizer did in response to one change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub variable: String,
    pub outcome: SyncOutcome,
}

pub struct FormController<D: Document> {
    document: D,
    synchronizers: Vec<FieldSynchronizer>,
}

impl<D: Document> FormController<D> {
    /// Builds every synchronizer described by `config` and runs the initial pass.
    pub fn attach(document: D, config: &FormConfig) -> Result<Self, FormError> {
        let mappings = config.validate()?;
        let synchronizers = config
            .variables
            .iter()
            .zip(mappings)
            .map(|(variable, mapping)| {
                FieldSynchronizer::new(
                    variable.name.clone(),
                    variable.selector.clone(),
                    mapping,
                    config.unmapped_policy,
                )
            })
            .collect();

        let mut controller = Self {
            document,
            synchronizers,
        };

        let initial: Vec<ChangeEvent> = controller
            .synchronizers
            .iter()
            .map(|synchronizer| ChangeEvent::new(synchronizer.selector_id()))
            .collect();
        for event in &initial {
            controller.dispatch(event)?;
        }

        log::info!(
            "Attached {} categorical synchronizers ({:?} policy)",
            controller.synchronizers.len(),
            config.unmapped_policy
        );
        Ok(controller)
    }

    /// Delivers one change notification to every synchronizer bound to its selector,
    /// in registration order.
    pub fn dispatch(&mut self, event: &ChangeEvent) -> Result<Vec<SyncReport>, FormError> {
        let mut reports = Vec::new();
        for synchronizer in self
            .synchronizers
            .iter()
            .filter(|synchronizer| synchronizer.selector_id() == event.selector_id)
        {
            let outcome = synchronizer.synchronize(&mut self.document)?;
            reports.push(SyncReport {
                variable: synchronizer.variable().to_string(),
                outcome,
            });
        }

        if reports.is_empty() {
            return Err(FormError::UnboundSelector(event.selector_id.clone()));
        }
        Ok(reports)
    }

    /// Sets a selector as a user would and delivers the resulting change notification.
    pub fn select(&mut self, selector_id: &str, value: &str) -> Result<Vec<SyncReport>, FormError> {
        if !self.is_bound(selector_id) {
            return Err(FormError::UnboundSelector(selector_id.to_string()));
        }
        let event = self.document.set_selector_value(selector_id, value)?;
        log::debug!("Dispatching {event} with value '{value}'");
        self.dispatch(&event)
    }

    /// Re-runs every synchronizer against the current selector values.
    pub fn resynchronize(&mut self) -> Result<Vec<SyncReport>, FormError> {
        let mut reports = Vec::with_capacity(self.synchronizers.len());
        for synchronizer in &self.synchronizers {
            let outcome = synchronizer.synchronize(&mut self.document)?;
            reports.push(SyncReport {
                variable: synchronizer.variable().to_string(),
                outcome,
            });
        }
        Ok(reports)
    }

    pub fn is_bound(&self, selector_id: &str) -> bool {
        self.synchronizers
            .iter()
            .any(|synchronizer| synchronizer.selector_id() == selector_id)
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Snapshot of every field group as currently held by the document.
    pub fn encoded(&self) -> Result<EncodedForm, FormError> {
        let mut groups = Vec::with_capacity(self.synchronizers.len());
        for synchronizer in &self.synchronizers {
            let mapping = synchronizer.mapping();
            let selector_value = self
                .document
                .selector_value(synchronizer.selector_id())?
                .to_string();

            let mut fields = Vec::with_capacity(mapping.fields().len());
            let mut selected = None;
            for name in mapping.fields() {
                let value = self.document.field_value(name)?;
                if FieldEncoding::parse(value) == Some(FieldEncoding::Set) {
                    selected = mapping.category_for_field(name).map(str::to_string);
                }
                fields.push((name.clone(), value.to_string()));
            }

            groups.push(EncodedGroup::new(
                synchronizer.variable(),
                synchronizer.selector_id(),
                selector_value,
                selected,
                fields,
            ));
        }
        Ok(EncodedForm::new(groups))
    }
}
