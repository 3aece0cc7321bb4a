//! Connection credentials and the secret store they are read from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Error};
use crate::tokens::AccessToken;
use crate::types::{BaseId, TableId};

/// Environment variable holding the personal access token.
pub const TOKEN_ENV: &str = "TABULA_PERSONAL_ACCESS_TOKEN";

/// Environment variable holding the default base id.
pub const BASE_ID_ENV: &str = "TABULA_BASE_ID";

/// Environment variable holding the default table id or name.
pub const TABLE_ID_ENV: &str = "TABULA_TABLE_ID";

/// Credentials for a connection.
///
/// Holds the personal access token along with optional default base and
/// table identifiers used when an operation does not name them explicitly.
/// Credentials are immutable once built.
///
/// # Security
///
/// The token is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use tabula_core::{BaseId, Credentials};
///
/// let creds = Credentials::new("patXXXX.yyyy")
///     .unwrap()
///     .with_default_base(BaseId::new("appA1b2C3d4E5f6G7").unwrap());
/// assert_eq!(creds.default_base_id().unwrap().as_str(), "appA1b2C3d4E5f6G7");
/// ```
#[derive(Clone)]
pub struct Credentials {
    token: AccessToken,
    default_base_id: Option<BaseId>,
    default_table_id: Option<TableId>,
}

impl Credentials {
    /// Create credentials from a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingToken`] if the token is blank.
    pub fn new(personal_access_token: impl Into<String>) -> Result<Self, Error> {
        let token = AccessToken::new(personal_access_token);
        if token.is_blank() {
            return Err(ConfigurationError::MissingToken.into());
        }

        Ok(Self {
            token,
            default_base_id: None,
            default_table_id: None,
        })
    }

    /// Build credentials from a secret store.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error if the token is absent, or an input
    /// error if a default identifier is malformed.
    pub fn from_secrets(secrets: &Secrets) -> Result<Self, Error> {
        let token = secrets
            .personal_access_token
            .as_deref()
            .ok_or(ConfigurationError::MissingToken)?;

        let mut credentials = Self::new(token)?;
        if let Some(base_id) = secrets.base_id.as_deref() {
            credentials.default_base_id = Some(BaseId::new(base_id)?);
        }
        if let Some(table_id) = secrets.table_id.as_deref() {
            credentials.default_table_id = Some(TableId::new(table_id)?);
        }
        Ok(credentials)
    }

    /// Set the base used when an operation does not name one.
    pub fn with_default_base(mut self, base_id: BaseId) -> Self {
        self.default_base_id = Some(base_id);
        self
    }

    /// Set the table used when an operation does not name one.
    pub fn with_default_table(mut self, table_id: TableId) -> Self {
        self.default_table_id = Some(table_id);
        self
    }

    /// Returns the personal access token.
    ///
    /// # Security
    ///
    /// Use this only when constructing authenticated requests.
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Returns the default base id, if any.
    pub fn default_base_id(&self) -> Option<&BaseId> {
        self.default_base_id.as_ref()
    }

    /// Returns the default table id, if any.
    pub fn default_table_id(&self) -> Option<&TableId> {
        self.default_table_id.as_ref()
    }
}

// Intentionally hide token in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .field("default_base_id", &self.default_base_id)
            .field("default_table_id", &self.default_table_id)
            .finish()
    }
}

/// Raw secret store contents.
///
/// Every field is optional at this level so that partial sources (a file,
/// the environment) can be layered before validation.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Secrets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
}

impl Secrets {
    /// Parse secrets from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| {
            ConfigurationError::Secrets {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Read secrets from the `TABULA_*` environment variables.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            personal_access_token: var(TOKEN_ENV),
            base_id: var(BASE_ID_ENV),
            table_id: var(TABLE_ID_ENV),
        }
    }

    /// Layer `other` on top of these secrets; values present in `other` win.
    pub fn overlay(self, other: Secrets) -> Self {
        Self {
            personal_access_token: other.personal_access_token.or(self.personal_access_token),
            base_id: other.base_id.or(self.base_id),
            table_id: other.table_id.or(self.table_id),
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field(
                "personal_access_token",
                &self.personal_access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_id", &self.base_id)
            .field("table_id", &self.table_id)
            .finish()
    }
}

impl TryFrom<Secrets> for Credentials {
    type Error = Error;

    fn try_from(secrets: Secrets) -> Result<Self, Self::Error> {
        Credentials::from_secrets(&secrets)
    }
}
