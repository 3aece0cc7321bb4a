//! Named connections with a lazily built client and cached operations.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use tabula_core::{
    BaseId, BaseList, BaseSchema, Connector, Credentials, QueryParams, Result, Secrets, TableApi,
    TableId,
};
use tabula_http::HttpConnector;

use crate::cache::{CacheKey, CacheService, DEFAULT_TTL};
use crate::resolver::{resolve_base_id, resolve_table_id};
use crate::table::RecordTable;

/// Cache operation name for [`Connection::list_bases`].
pub const LIST_BASES: &str = "list_bases";

/// Cache operation name for [`Connection::get_base_schema`].
pub const GET_BASE_SCHEMA: &str = "get_base_schema";

/// Cache operation name for [`Connection::query`].
pub const QUERY: &str = "query";

/// Whether a connection has built its client yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unconnected,
    Connected,
}

/// A named connection to the remote table API.
///
/// Building a connection performs no I/O. The client is constructed on
/// first use, at most once, even when several tasks race to use it. Each
/// operation resolves its identifiers against the connection defaults and
/// caches its result under the connection name, the operation name and the
/// resolved arguments.
///
/// # Example
///
/// ```no_run
/// use tabula::{BaseId, Connection, Credentials, QueryParams, TableId};
///
/// # async fn run() -> tabula::Result<()> {
/// let creds = Credentials::new("patXXXX")?;
/// let conn = Connection::new("main", creds);
///
/// let bases = conn.list_bases(None).await?;
/// let base = BaseId::new(&bases.bases[0].id)?;
/// let table = TableId::new("Tasks")?;
/// let rows = conn
///     .query(Some(&table), Some(&base), None, &QueryParams::new().max_records(10))
///     .await?;
/// println!("{} rows, columns {:?}", rows.len(), rows.columns());
/// # Ok(())
/// # }
/// ```
pub struct Connection<C: Connector = HttpConnector> {
    name: String,
    credentials: Credentials,
    connector: C,
    client: OnceCell<C::Api>,
    cache: CacheService,
}

impl Connection {
    /// Create a connection using the HTTP client and the global cache.
    pub fn new(name: impl Into<String>, credentials: Credentials) -> Self {
        Self::with_connector(name, credentials, HttpConnector::new())
    }

    /// Create a connection from a secret store.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error if the store has no token.
    pub fn from_secrets(name: impl Into<String>, secrets: &Secrets) -> Result<Self> {
        Ok(Self::new(name, Credentials::from_secrets(secrets)?))
    }
}

impl<C: Connector> Connection<C> {
    /// Create a connection with a custom connector and the global cache.
    pub fn with_connector(name: impl Into<String>, credentials: Credentials, connector: C) -> Self {
        Self {
            name: name.into(),
            credentials,
            connector,
            client: OnceCell::new(),
            cache: CacheService::global().clone(),
        }
    }

    /// Use a different cache service.
    pub fn with_cache(mut self, cache: CacheService) -> Self {
        self.cache = cache;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    pub fn state(&self) -> ConnectionState {
        if self.client.initialized() {
            ConnectionState::Connected
        } else {
            ConnectionState::Unconnected
        }
    }

    /// Returns the client, building it on first call.
    pub async fn client(&self) -> Result<&C::Api> {
        self.client
            .get_or_try_init(|| async move {
                debug!(connection = %self.name, "Connecting");
                self.connector.connect(&self.credentials)
            })
            .await
    }

    /// List the bases visible to the token.
    ///
    /// `ttl` defaults to [`DEFAULT_TTL`].
    #[instrument(skip(self), fields(connection = %self.name))]
    pub async fn list_bases(&self, ttl: Option<Duration>) -> Result<Arc<BaseList>> {
        let key = CacheKey::new(self.name.as_str(), LIST_BASES, &())?;

        self.cache
            .get_or_fetch(key, ttl.unwrap_or(DEFAULT_TTL), || async move {
                self.client().await?.list_bases().await
            })
            .await
    }

    /// Fetch the schema of a base, falling back to the default base.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error when no base id can be resolved.
    #[instrument(skip(self), fields(connection = %self.name))]
    pub async fn get_base_schema(
        &self,
        base_id: Option<&BaseId>,
        ttl: Option<Duration>,
    ) -> Result<Arc<BaseSchema>> {
        let base_id = resolve_base_id(base_id, &self.credentials)?;
        let key = CacheKey::new(self.name.as_str(), GET_BASE_SCHEMA, &base_id)?;

        let base_id = &base_id;
        self.cache
            .get_or_fetch(key, ttl.unwrap_or(DEFAULT_TTL), || async move {
                self.client().await?.get_base_schema(base_id).await
            })
            .await
    }

    /// List all records of a table matching `params`, flattened to a table.
    ///
    /// Base and table fall back to the connection defaults independently.
    /// Parameters are checked before the cache is consulted.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error when an identifier cannot be
    /// resolved, or an input error when `params` are inconsistent.
    #[instrument(skip(self, params), fields(connection = %self.name))]
    pub async fn query(
        &self,
        table_id: Option<&TableId>,
        base_id: Option<&BaseId>,
        ttl: Option<Duration>,
        params: &QueryParams,
    ) -> Result<Arc<RecordTable>> {
        let base_id = resolve_base_id(base_id, &self.credentials)?;
        let table_id = resolve_table_id(table_id, &self.credentials)?;
        params.validate()?;

        let key = CacheKey::new(self.name.as_str(), QUERY, &(&base_id, &table_id, params))?;

        let (base_id, table_id) = (&base_id, &table_id);
        self.cache
            .get_or_fetch(key, ttl.unwrap_or(DEFAULT_TTL), || async move {
                let records = self
                    .client()
                    .await?
                    .list_records(base_id, table_id, params)
                    .await?;
                debug!(records = records.len(), "Normalizing records");
                Ok(RecordTable::from_records(&records))
            })
            .await
    }
}

impl<C: Connector> fmt::Debug for Connection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("credentials", &self.credentials)
            .field("state", &self.state())
            .finish()
    }
}
