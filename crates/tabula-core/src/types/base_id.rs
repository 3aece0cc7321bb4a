//! Base identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated base identifier (e.g. `appA1b2C3d4E5f6G7`).
///
/// # Example
///
/// ```
/// use tabula_core::BaseId;
///
/// let base = BaseId::new("appA1b2C3d4E5f6G7").unwrap();
/// assert_eq!(base.as_str(), "appA1b2C3d4E5f6G7");
/// assert!(BaseId::new("app/../x").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseId(String);

impl BaseId {
    /// Create a new base id, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or not ASCII alphanumeric.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::BaseId {
                value: s.to_string(),
                reason: "must be non-empty".to_string(),
            }
            .into());
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidInputError::BaseId {
                value: s.to_string(),
                reason: "must contain only ASCII letters and digits".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for BaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BaseId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BaseId> for String {
    fn from(id: BaseId) -> Self {
        id.0
    }
}

impl AsRef<str> for BaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
