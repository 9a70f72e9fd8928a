// ========================================================================================
//                             High-Level Data Contracts
// ========================================================================================

// This file is only for types that are shared between files, not types that only are used in one file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The text a hidden field holds for one position of a one-hot group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEncoding {
    /// The category is not the selected one ("0").
    Unset,
    /// The category is the selected one ("1").
    Set,
}

impl FieldEncoding {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "0",
            Self::Set => "1",
        }
    }

    /// Reads back a field value. Anything other than "0" or "1" (including the
    /// empty value of a field that was never synchronized) is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "0" => Some(Self::Unset),
            "1" => Some(Self::Set),
            _ => None,
        }
    }
}

impl fmt::Display for FieldEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a synchronizer does when its selector holds a value absent from the mapping.
///
/// In both cases every field of the group is left at "0"; the policies only differ in
/// whether the caller receives an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedPolicy {
    /// Leave the group zeroed and carry on silently.
    #[default]
    Zeroed,
    /// Leave the group zeroed and report `SyncError::UnmappedCategory`.
    Reject,
}

/// A change notification emitted by a selector after its value was updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub selector_id: String,
}

impl ChangeEvent {
    pub fn new(selector_id: impl Into<String>) -> Self {
        Self {
            selector_id: selector_id.into(),
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "change on '{}'", self.selector_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_text_matches_hidden_field_values() {
        assert_eq!(FieldEncoding::Unset.as_str(), "0");
        assert_eq!(FieldEncoding::Set.to_string(), "1");
        assert_eq!(FieldEncoding::parse("1"), Some(FieldEncoding::Set));
        assert_eq!(FieldEncoding::parse("0"), Some(FieldEncoding::Unset));
        assert_eq!(FieldEncoding::parse(""), None);
        assert_eq!(FieldEncoding::parse(" 1"), None);
    }

    #[test]
    fn unmapped_policy_defaults_to_zeroed() {
        assert_eq!(UnmappedPolicy::default(), UnmappedPolicy::Zeroed);
    }
}
