//! Snapshot of the encoded hidden fields, ready to be submitted or written out.

use crate::types::FieldEncoding;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedField {
    pub name: String,
    pub value: String,
}

/// The state of one field group and the selector driving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedGroup {
    pub variable: String,
    pub selector: String,
    pub selector_value: String,
    /// The category whose field holds "1", if any.
    pub selected: Option<String>,
    pub fields: Vec<EncodedField>,
}

impl EncodedGroup {
    pub fn new(
        variable: &str,
        selector: &str,
        selector_value: String,
        selected: Option<String>,
        fields: Vec<(String, String)>,
    ) -> Self {
        Self {
            variable: variable.to_string(),
            selector: selector.to_string(),
            selector_value,
            selected,
            fields: fields
                .into_iter()
                .map(|(name, value)| EncodedField { name, value })
                .collect(),
        }
    }

    /// True when exactly one field holds "1" and every other field holds "0".
    pub fn is_one_hot(&self) -> bool {
        let mut set = 0usize;
        for field in &self.fields {
            match FieldEncoding::parse(&field.value) {
                Some(FieldEncoding::Set) => set += 1,
                Some(FieldEncoding::Unset) => {}
                None => return false,
            }
        }
        set == 1
    }

    /// True when every field holds "0", the state an unmapped selector value leaves.
    pub fn is_zeroed(&self) -> bool {
        self.fields
            .iter()
            .all(|field| FieldEncoding::parse(&field.value) == Some(FieldEncoding::Unset))
    }

    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|candidate| candidate.name == field)
            .map(|candidate| candidate.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedForm {
    pub groups: Vec<EncodedGroup>,
}

impl EncodedForm {
    pub fn new(groups: Vec<EncodedGroup>) -> Self {
        Self { groups }
    }

    pub fn group(&self, variable: &str) -> Option<&EncodedGroup> {
        self.groups.iter().find(|group| group.variable == variable)
    }

    pub fn is_one_hot(&self) -> bool {
        self.groups.iter().all(EncodedGroup::is_one_hot)
    }

    /// Value of a hidden field anywhere in the form.
    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.groups.iter().find_map(|group| group.value_of(field))
    }

    /// Flat `(field, value)` pairs in form order: the payload a submission carries.
    pub fn form_pairs(&self) -> Vec<(&str, &str)> {
        self.groups
            .iter()
            .flat_map(|group| group.fields.iter())
            .map(|field| (field.name.as_str(), field.value.as_str()))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "field\tvalue")?;
        for (name, value) in self.form_pairs() {
            writeln!(writer, "{name}\t{value}")?;
        }
        Ok(())
    }

    pub fn write_tsv_file(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_tsv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
