//! # Category-to-Field Mapping
//!
//! A `CategoryMapping` ties the categories of one variable to the ordered group of
//! hidden fields that one-hot encode it. The mapping is checked once when it is built
//! and never changes afterwards, so the synchronizer can write to the fields it names
//! without re-validating anything per event.
//!
//! Construction enforces, in this order:
//! - the field group is non-empty and every field name appears once;
//! - every category appears once;
//! - every mapped field belongs to the group;
//! - no two categories share a field (the mapping is injective);
//! - every field in the group is reached by some category.

use ahash::AHashMap;
use itertools::Itertools;
use thiserror::Error;

/// Errors raised while building a mapping from configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("The field group is empty. A categorical variable needs at least one hidden field.")]
    EmptyFieldGroup,
    #[error("The hidden field '{0}' is listed more than once in its group.")]
    DuplicateField(String),
    #[error("The category '{0}' is mapped more than once.")]
    DuplicateCategory(String),
    #[error(
        "The category '{category}' maps to '{field}', which is not one of the group's hidden fields."
    )]
    FieldOutsideGroup { category: String, field: String },
    #[error("The categories '{first}' and '{second}' both map to the hidden field '{field}'.")]
    SharedField {
        field: String,
        first: String,
        second: String,
    },
    #[error("The hidden field '{0}' is not reached by any category.")]
    UncoveredField(String),
}

/// A validated, immutable category → field table over an ordered field group.
#[derive(Debug, Clone)]
pub struct CategoryMapping {
    fields: Vec<String>,
    /// Categories in the order they were passed to `new`, each with the index of its
    /// field in `fields`.
    categories: Vec<(String, usize)>,
    lookup: AHashMap<String, usize>,
}

impl CategoryMapping {
    pub fn new<F, C, S, T>(fields: F, pairs: C) -> Result<Self, MappingError>
    where
        F: IntoIterator<Item = S>,
        C: IntoIterator<Item = (T, S)>,
        S: Into<String>,
        T: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(MappingError::EmptyFieldGroup);
        }
        if let Some(duplicate) = fields.iter().duplicates().next() {
            return Err(MappingError::DuplicateField(duplicate.clone()));
        }

        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(category, field)| (category.into(), field.into()))
            .collect();
        if let Some(duplicate) = pairs.iter().map(|(category, _)| category).duplicates().next() {
            return Err(MappingError::DuplicateCategory(duplicate.clone()));
        }

        let field_index: AHashMap<&str, usize> = fields
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let mut owners: Vec<Option<&str>> = vec![None; fields.len()];
        let mut categories = Vec::with_capacity(pairs.len());
        for (category, field) in &pairs {
            let Some(&idx) = field_index.get(field.as_str()) else {
                return Err(MappingError::FieldOutsideGroup {
                    category: category.clone(),
                    field: field.clone(),
                });
            };
            if let Some(first) = owners[idx] {
                return Err(MappingError::SharedField {
                    field: field.clone(),
                    first: first.to_string(),
                    second: category.clone(),
                });
            }
            owners[idx] = Some(category.as_str());
            categories.push((category.clone(), idx));
        }

        if let Some(idx) = owners.iter().position(Option::is_none) {
            return Err(MappingError::UncoveredField(fields[idx].clone()));
        }

        let lookup = categories
            .iter()
            .map(|(category, idx)| (category.clone(), *idx))
            .collect();

        Ok(Self {
            fields,
            categories,
            lookup,
        })
    }

    /// The hidden fields of the group, in document order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The categories in the order they were passed to `new`.
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.iter().map(|(category, _)| category.as_str())
    }

    /// Exact, case-sensitive lookup of the field encoding `category`.
    pub fn field_for(&self, category: &str) -> Option<&str> {
        self.lookup
            .get(category)
            .map(|&idx| self.fields[idx].as_str())
    }

    /// The category whose field is `field`, if any.
    pub fn category_for_field(&self, field: &str) -> Option<&str> {
        let idx = self.fields.iter().position(|name| name == field)?;
        self.categories
            .iter()
            .find(|(_, owner)| *owner == idx)
            .map(|(category, _)| category.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sex_mapping() -> Result<CategoryMapping, MappingError> {
        CategoryMapping::new(["Sex_M", "Sex_F"], [("M", "Sex_M"), ("F", "Sex_F")])
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let mapping = sex_mapping().expect("valid mapping");
        assert_eq!(mapping.field_for("M"), Some("Sex_M"));
        assert_eq!(mapping.field_for("F"), Some("Sex_F"));
        assert_eq!(mapping.field_for("f"), None);
        assert_eq!(mapping.field_for(""), None);
        assert_eq!(mapping.category_for_field("Sex_F"), Some("F"));
        assert_eq!(mapping.categories().collect::<Vec<_>>(), vec!["M", "F"]);
        assert_eq!(mapping.fields().len(), 2);
    }

    #[test]
    fn rejects_empty_group() {
        let fields: [&str; 0] = [];
        let pairs: [(&str, &str); 0] = [];
        let err = CategoryMapping::new(fields, pairs).unwrap_err();
        assert_eq!(err, MappingError::EmptyFieldGroup);
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let err = CategoryMapping::new(["Sex_M", "Sex_M"], [("M", "Sex_M")]).unwrap_err();
        assert_eq!(err, MappingError::DuplicateField("Sex_M".to_string()));
    }

    #[test]
    fn rejects_duplicate_categories() {
        let err = CategoryMapping::new(["Sex_M", "Sex_F"], [("M", "Sex_M"), ("M", "Sex_F")])
            .unwrap_err();
        assert_eq!(err, MappingError::DuplicateCategory("M".to_string()));
    }

    #[test]
    fn rejects_field_outside_group() {
        let err = CategoryMapping::new(["Sex_M", "Sex_F"], [("M", "Sex_M"), ("F", "Sex_X")])
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::FieldOutsideGroup {
                category: "F".to_string(),
                field: "Sex_X".to_string(),
            }
        );
    }

    #[test]
    fn rejects_non_injective_mapping() {
        let err = CategoryMapping::new(["Sex_M", "Sex_F"], [("M", "Sex_M"), ("Male", "Sex_M")])
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::SharedField {
                field: "Sex_M".to_string(),
                first: "M".to_string(),
                second: "Male".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unreachable_field() {
        let err = CategoryMapping::new(["Sex_M", "Sex_F"], [("M", "Sex_M")]).unwrap_err();
        assert_eq!(err, MappingError::UncoveredField("Sex_F".to_string()));
    }
}
