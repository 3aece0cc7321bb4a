//! Table identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A table reference: either a table id (`tbl…`) or a table name.
///
/// The remote API accepts both forms interchangeably, so names may contain
/// arbitrary characters. They are percent-encoded when placed in a URL.
///
/// # Example
///
/// ```
/// use tabula_core::TableId;
///
/// let by_id = TableId::new("tblQ2x9Lm3Np8Rs7T").unwrap();
/// assert!(by_id.is_id());
///
/// let by_name = TableId::new("Sales Pipeline").unwrap();
/// assert!(!by_name.is_id());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableId(String);

impl TableId {
    /// Create a new table reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is blank.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(InvalidInputError::TableId {
                value: s,
                reason: "must be non-empty".to_string(),
            }
            .into());
        }
        Ok(Self(s))
    }

    /// Returns true if this looks like a table id rather than a name.
    pub fn is_id(&self) -> bool {
        self.0.len() == 17
            && self.0.starts_with("tbl")
            && self.0.chars().all(|c| c.is_ascii_alphanumeric())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TableId> for String {
    fn from(id: TableId) -> Self {
        id.0
    }
}

impl AsRef<str> for TableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
