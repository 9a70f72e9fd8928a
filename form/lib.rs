#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

//! Cardioform keeps the hidden one-hot fields of a clinical prediction form in step
//! with the visible categorical selectors that drive them.

pub mod config;
pub mod controller;
pub mod document;
pub mod encoded;
pub mod mapping;
pub mod synchronizer;
pub mod types;
pub mod variable;

pub use config::{ConfigError, FormConfig, VariableConfig};
pub use controller::{FormController, FormError, SyncReport};
pub use document::{Document, DocumentError, FormDocument};
pub use encoded::{EncodedForm, EncodedGroup};
pub use mapping::{CategoryMapping, MappingError};
pub use synchronizer::{FieldSynchronizer, SyncError, SyncOutcome};
pub use types::{ChangeEvent, FieldEncoding, UnmappedPolicy};
pub use variable::CategoricalVariable;
