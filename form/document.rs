//! # Document Abstraction
//!
//! The synchronizers never own the selectors or hidden fields they work on; those
//! belong to the document. The `Document` trait is the narrow surface a synchronizer
//! needs from it: locate a selector by id, locate hidden fields by group name, write a
//! field value, and turn a user's selection into a change notification.
//!
//! `FormDocument` is the in-memory document used by the command line tool and tests.
//! Several hidden inputs may share one name; as in a browser, reads and writes by name
//! address the first element carrying it.

use crate::config::FormConfig;
use crate::types::ChangeEvent;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("No selector with id '{0}' exists in the document.")]
    SelectorNotFound(String),
    #[error("No hidden field named '{0}' exists in the document.")]
    FieldNotFound(String),
}

/// The operations a synchronizer consumes from its host document.
pub trait Document {
    /// Current value of the selector with the given element id.
    fn selector_value(&self, selector_id: &str) -> Result<&str, DocumentError>;

    /// Value of the first hidden field carrying `name`.
    fn field_value(&self, name: &str) -> Result<&str, DocumentError>;

    /// Writes `value` into the first hidden field carrying `name`.
    fn set_field_value(&mut self, name: &str, value: &str) -> Result<(), DocumentError>;

    /// Updates a selector as a user interaction would and returns the change
    /// notification the document fires afterwards.
    fn set_selector_value(
        &mut self,
        selector_id: &str,
        value: &str,
    ) -> Result<ChangeEvent, DocumentError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

/// An ordered, in-memory form holding selectors and hidden fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDocument {
    selectors: Vec<Selector>,
    fields: Vec<HiddenField>,
}

impl FormDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the markup a configuration describes: one selector per variable at its
    /// default value, and one empty hidden field per category.
    pub fn from_config(config: &FormConfig) -> Self {
        let mut document = Self::new();
        for variable in &config.variables {
            document.add_selector(&variable.selector, &variable.default);
            for field in &variable.fields {
                document.add_hidden_field(field, "");
            }
        }
        document
    }

    pub fn add_selector(&mut self, id: &str, value: &str) -> &mut Self {
        self.selectors.push(Selector {
            id: id.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn add_hidden_field(&mut self, name: &str, value: &str) -> &mut Self {
        self.fields.push(HiddenField {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn hidden_fields(&self) -> &[HiddenField] {
        &self.fields
    }

    /// Every hidden field carrying `name`, in document order.
    pub fn elements_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HiddenField> {
        self.fields.iter().filter(move |field| field.name == name)
    }

    fn selector_mut(&mut self, selector_id: &str) -> Result<&mut Selector, DocumentError> {
        self.selectors
            .iter_mut()
            .find(|selector| selector.id == selector_id)
            .ok_or_else(|| DocumentError::SelectorNotFound(selector_id.to_string()))
    }
}

impl Document for FormDocument {
    fn selector_value(&self, selector_id: &str) -> Result<&str, DocumentError> {
        self.selectors
            .iter()
            .find(|selector| selector.id == selector_id)
            .map(|selector| selector.value.as_str())
            .ok_or_else(|| DocumentError::SelectorNotFound(selector_id.to_string()))
    }

    fn field_value(&self, name: &str) -> Result<&str, DocumentError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
            .ok_or_else(|| DocumentError::FieldNotFound(name.to_string()))
    }

    fn set_field_value(&mut self, name: &str, value: &str) -> Result<(), DocumentError> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.name == name)
            .ok_or_else(|| DocumentError::FieldNotFound(name.to_string()))?;
        field.value.clear();
        field.value.push_str(value);
        Ok(())
    }

    fn set_selector_value(
        &mut self,
        selector_id: &str,
        value: &str,
    ) -> Result<ChangeEvent, DocumentError> {
        let selector = self.selector_mut(selector_id)?;
        selector.value = value.to_string();
        Ok(ChangeEvent::new(selector_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_address_first_element_with_name() {
        let mut document = FormDocument::new();
        document
            .add_hidden_field("Sex_M", "")
            .add_hidden_field("Sex_M", "keep")
            .add_hidden_field("Sex_F", "");

        document.set_field_value("Sex_M", "1").expect("field exists");

        let values: Vec<&str> = document
            .elements_by_name("Sex_M")
            .map(|field| field.value.as_str())
            .collect();
        assert_eq!(values, vec!["1", "keep"]);
        assert_eq!(document.field_value("Sex_M"), Ok("1"));
        assert_eq!(document.field_value("Sex_F"), Ok(""));
    }

    fn read_through_trait(document: &dyn Document, name: &str) -> Result<String, DocumentError> {
        document.field_value(name).map(str::to_string)
    }

    #[test]
    fn trait_object_reads_first_field_with_name() {
        let mut document = FormDocument::new();
        document
            .add_selector("sex-select", "F")
            .add_hidden_field("Sex_F", "1")
            .add_hidden_field("Sex_F", "0");

        assert_eq!(read_through_trait(&document, "Sex_F"), Ok("1".to_string()));
        assert_eq!(
            read_through_trait(&document, "Sex_M"),
            Err(DocumentError::FieldNotFound("Sex_M".to_string()))
        );
        let as_trait: &dyn Document = &document;
        assert_eq!(as_trait.selector_value("sex-select"), Ok("F"));
    }

    #[test]
    fn missing_elements_are_reported() {
        let mut document = FormDocument::new();
        document.add_selector("sex-select", "M");

        assert_eq!(
            document.set_field_value("Sex_M", "1"),
            Err(DocumentError::FieldNotFound("Sex_M".to_string()))
        );
        assert_eq!(
            document.selector_value("cp-select"),
            Err(DocumentError::SelectorNotFound("cp-select".to_string()))
        );
        assert!(document.set_selector_value("cp-select", "TA").is_err());
    }

    #[test]
    fn selector_update_emits_change_event() {
        let mut document = FormDocument::new();
        document.add_selector("sex-select", "M");

        let event = document
            .set_selector_value("sex-select", "F")
            .expect("selector exists");
        assert_eq!(event, ChangeEvent::new("sex-select"));
        assert_eq!(document.selector_value("sex-select"), Ok("F"));
    }

    #[test]
    fn from_config_renders_defaults_and_empty_fields() {
        let document = FormDocument::from_config(&FormConfig::heart_disease());
        assert_eq!(document.selectors().len(), 5);
        assert_eq!(document.hidden_fields().len(), 14);
        assert_eq!(document.selector_value("cp-select"), Ok("TA"));
        assert_eq!(document.selector_value("resting-ecg-select"), Ok("Normal"));
        assert!(
            document
                .hidden_fields()
                .iter()
                .all(|field| field.value.is_empty())
        );
    }
}
