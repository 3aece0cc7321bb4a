//! Caching and resolution behaviour of `Connection`, against a stub API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tabula::error::{ApiError, ConfigurationError, InvalidInputError};
use tabula::{
    BaseId, BaseList, BaseSchema, CacheService, CellFormat, Connection, ConnectionState, Connector,
    Credentials, Error, QueryParams, Record, Result, Secrets, TableApi, TableId,
};

// ============================================================================
// Stub API
// ============================================================================

#[derive(Default)]
struct Counters {
    connects: AtomicUsize,
    list_bases: AtomicUsize,
    schemas: AtomicUsize,
    records: AtomicUsize,
    fail_records: AtomicUsize,
}

#[derive(Clone, Default)]
struct StubConnector {
    counters: Arc<Counters>,
    /// Block the calling thread inside `connect`, widening the window in
    /// which concurrent first calls race.
    slow_connect: bool,
}

struct StubApi {
    counters: Arc<Counters>,
}

impl Connector for StubConnector {
    type Api = StubApi;

    fn connect(&self, _credentials: &Credentials) -> Result<StubApi> {
        if self.slow_connect {
            std::thread::sleep(Duration::from_millis(10));
        }
        self.counters.connects.fetch_add(1, Ordering::SeqCst);
        Ok(StubApi {
            counters: Arc::clone(&self.counters),
        })
    }
}

#[async_trait]
impl TableApi for StubApi {
    async fn list_bases(&self) -> Result<BaseList> {
        self.counters.list_bases.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_value(json!({
            "bases": [{"id": "B0", "name": "Default", "permissionLevel": "create"}]
        }))
        .unwrap())
    }

    async fn get_base_schema(&self, base_id: &BaseId) -> Result<BaseSchema> {
        self.counters.schemas.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_value(json!({
            "tables": [{
                "id": "tblTasks000000001",
                "name": format!("Tasks of {}", base_id),
                "primaryFieldId": "fldName0000000001",
                "fields": [{"id": "fldName0000000001", "name": "Name", "type": "singleLineText"}],
                "views": []
            }]
        }))
        .unwrap())
    }

    async fn list_records(
        &self,
        _base_id: &BaseId,
        _table_id: &TableId,
        params: &QueryParams,
    ) -> Result<Vec<Record>> {
        if self.counters.fail_records.load(Ordering::SeqCst) > 0 {
            self.counters.fail_records.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Api(ApiError::new(
                503,
                Some("SERVICE_UNAVAILABLE".to_string()),
                None,
            )));
        }
        self.counters.records.fetch_add(1, Ordering::SeqCst);

        let rows = [json!({"a": 1, "b": 2}), json!({"a": 3})];
        let limit = params.max_records.unwrap_or(100) as usize;
        let records = rows
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, fields)| {
                json!({
                    "id": format!("rec{}", i),
                    "createdTime": "2024-01-01T00:00:00.000Z",
                    "fields": fields
                })
            })
            .collect::<Vec<_>>();
        Ok(serde_json::from_value(json!(records)).unwrap())
    }
}

fn base(s: &str) -> BaseId {
    BaseId::new(s).unwrap()
}

fn table(s: &str) -> TableId {
    TableId::new(s).unwrap()
}

fn connection(credentials: Credentials) -> (Connection<StubConnector>, Arc<Counters>) {
    let connector = StubConnector::default();
    let counters = Arc::clone(&connector.counters);
    let conn = Connection::with_connector("test", credentials, connector)
        .with_cache(CacheService::new());
    (conn, counters)
}

fn default_connection() -> (Connection<StubConnector>, Arc<Counters>) {
    connection(
        Credentials::new("patToken")
            .unwrap()
            .with_default_base(base("B0"))
            .with_default_table(table("T1")),
    )
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn test_list_bases_is_cached() {
    let (conn, counters) = default_connection();

    let first = conn.list_bases(None).await.unwrap();
    let second = conn.list_bases(None).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.bases[0].id.as_str(), "B0");
    assert_eq!(counters.list_bases.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_default_ttl_expiry_refetches_once() {
    let (conn, counters) = default_connection();

    conn.list_bases(None).await.unwrap();
    tokio::time::advance(Duration::from_secs(3599)).await;
    conn.list_bases(None).await.unwrap();
    assert_eq!(counters.list_bases.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    conn.list_bases(None).await.unwrap();
    conn.list_bases(None).await.unwrap();
    assert_eq!(counters.list_bases.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_custom_ttl_expiry() {
    let (conn, counters) = default_connection();
    let ttl = Some(Duration::from_secs(5));

    conn.get_base_schema(None, ttl).await.unwrap();
    tokio::time::advance(Duration::from_secs(4)).await;
    conn.get_base_schema(None, ttl).await.unwrap();
    assert_eq!(counters.schemas.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    conn.get_base_schema(None, ttl).await.unwrap();
    assert_eq!(counters.schemas.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_distinct_params_are_distinct_entries() {
    let (conn, counters) = default_connection();
    let t1 = table("T1");

    let ten = conn
        .query(Some(&t1), None, None, &QueryParams::new().max_records(10))
        .await
        .unwrap();
    let twenty = conn
        .query(Some(&t1), None, None, &QueryParams::new().max_records(20))
        .await
        .unwrap();

    assert!(!Arc::ptr_eq(&ten, &twenty));
    assert_eq!(counters.records.load(Ordering::SeqCst), 2);
    assert_eq!(conn.cache().len(), 2);
}

#[tokio::test]
async fn test_explicit_default_shares_cache_entry() {
    let (conn, counters) = default_connection();

    let defaulted = conn.get_base_schema(None, None).await.unwrap();
    let explicit = conn.get_base_schema(Some(&base("B0")), None).await.unwrap();
    assert!(Arc::ptr_eq(&defaulted, &explicit));
    assert_eq!(counters.schemas.load(Ordering::SeqCst), 1);

    let params = QueryParams::new();
    conn.query(None, None, None, &params).await.unwrap();
    conn.query(Some(&table("T1")), Some(&base("B0")), None, &params)
        .await
        .unwrap();
    assert_eq!(counters.records.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let (conn, counters) = default_connection();
    counters.fail_records.store(1, Ordering::SeqCst);

    let err = conn.query(None, None, None, &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, Error::Api(ref api) if api.status == 503));
    assert!(conn.cache().is_empty());

    conn.query(None, None, None, &QueryParams::new()).await.unwrap();
    assert_eq!(counters.records.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connections_do_not_share_entries() {
    let cache = CacheService::new();
    let creds = Credentials::new("patToken").unwrap();

    let a_connector = StubConnector::default();
    let a_counters = Arc::clone(&a_connector.counters);
    let a = Connection::with_connector("a", creds.clone(), a_connector).with_cache(cache.clone());

    let b_connector = StubConnector::default();
    let b_counters = Arc::clone(&b_connector.counters);
    let b = Connection::with_connector("b", creds, b_connector).with_cache(cache.clone());

    a.list_bases(None).await.unwrap();
    b.list_bases(None).await.unwrap();

    assert_eq!(a_counters.list_bases.load(Ordering::SeqCst), 1);
    assert_eq!(b_counters.list_bases.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 2);
}

// ============================================================================
// Resolution
// ============================================================================

#[tokio::test]
async fn test_explicit_base_overrides_default() {
    let (conn, _) = default_connection();

    let schema = conn.get_base_schema(Some(&base("B1")), None).await.unwrap();
    assert_eq!(schema.tables[0].name, "Tasks of B1");

    let schema = conn.get_base_schema(None, None).await.unwrap();
    assert_eq!(schema.tables[0].name, "Tasks of B0");
}

#[tokio::test]
async fn test_missing_base_is_configuration_error() {
    let (conn, counters) = connection(Credentials::new("patToken").unwrap());

    let err = conn.get_base_schema(None, None).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::MissingBaseId)
    ));
    assert_eq!(counters.schemas.load(Ordering::SeqCst), 0);
    assert!(conn.cache().is_empty());
}

#[tokio::test]
async fn test_missing_table_is_reported_as_table() {
    let (conn, counters) = connection(
        Credentials::new("patToken")
            .unwrap()
            .with_default_base(base("B0")),
    );

    let err = conn.query(None, None, None, &QueryParams::new()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::MissingTableId)
    ));
    assert_eq!(counters.records.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_string_cell_format_requires_locale_before_fetch() {
    let (conn, counters) = default_connection();
    let params = QueryParams::new().cell_format(CellFormat::String);

    let err = conn.query(None, None, None, &params).await.unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidInput(InvalidInputError::QueryParams { .. })
    ));
    assert_eq!(counters.records.load(Ordering::SeqCst), 0);
    assert!(conn.cache().is_empty());
}

#[tokio::test]
async fn test_shadowing_extra_param_is_rejected_before_fetch() {
    let (conn, counters) = default_connection();
    let params = QueryParams::new().max_records(1).param("maxRecords", 5);

    let err = conn.query(None, None, None, &params).await.unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidInput(InvalidInputError::QueryParams { .. })
    ));
    assert_eq!(counters.records.load(Ordering::SeqCst), 0);
    assert!(conn.cache().is_empty());
}

// ============================================================================
// Normalization
// ============================================================================

#[tokio::test]
async fn test_query_returns_normalized_table() {
    let (conn, _) = default_connection();

    let rows = conn.query(None, None, None, &QueryParams::new()).await.unwrap();

    assert_eq!(rows.columns(), ["a", "b"]);
    let objects: Vec<_> = rows.row_objects().map(serde_json::Value::Object).collect();
    assert_eq!(objects, vec![json!({"a": 1, "b": 2}), json!({"a": 3, "b": null})]);
}

// ============================================================================
// Connection Lifecycle
// ============================================================================

#[tokio::test]
async fn test_client_is_built_lazily_once() {
    let (conn, counters) = default_connection();
    assert_eq!(conn.state(), ConnectionState::Unconnected);
    assert_eq!(counters.connects.load(Ordering::SeqCst), 0);

    let (bases, schema) = tokio::join!(conn.list_bases(None), conn.get_base_schema(None, None));
    bases.unwrap();
    schema.unwrap();
    conn.query(None, None, None, &QueryParams::new()).await.unwrap();

    assert_eq!(conn.state(), ConnectionState::Connected);
    assert_eq!(counters.connects.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_use_connects_once() {
    let connector = StubConnector {
        slow_connect: true,
        ..StubConnector::default()
    };
    let counters = Arc::clone(&connector.counters);
    let creds = Credentials::new("patToken")
        .unwrap()
        .with_default_base(base("B0"))
        .with_default_table(table("T1"));
    let conn = Arc::new(
        Connection::with_connector("test", creds, connector).with_cache(CacheService::new()),
    );

    let handles: Vec<_> = (1..=16u32)
        .map(|i| {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move {
                let params = QueryParams::new().max_records(i);
                conn.query(None, None, None, &params).await
            })
        })
        .collect();

    for handle in handles {
        let rows = handle.await.unwrap().unwrap();
        assert!(!rows.is_empty());
    }

    assert_eq!(conn.state(), ConnectionState::Connected);
    assert_eq!(counters.connects.load(Ordering::SeqCst), 1);
    assert_eq!(counters.records.load(Ordering::SeqCst), 16);
    assert_eq!(conn.cache().len(), 16);
}

#[tokio::test]
async fn test_cache_hit_does_not_connect() {
    let cache = CacheService::new();
    let creds = Credentials::new("patToken").unwrap();

    let warm = Connection::with_connector("shared", creds.clone(), StubConnector::default())
        .with_cache(cache.clone());
    warm.list_bases(None).await.unwrap();

    let cold = Connection::with_connector("shared", creds, StubConnector::default())
        .with_cache(cache);
    cold.list_bases(None).await.unwrap();

    assert_eq!(cold.state(), ConnectionState::Unconnected);
}

#[test]
fn test_missing_token_is_configuration_error() {
    let err = Connection::from_secrets("main", &Secrets::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Configuration(ConfigurationError::MissingToken)
    ));

    let err = Credentials::new("  ").unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_debug_redacts_token() {
    let (conn, _) = connection(Credentials::new("patSuperSecret").unwrap());
    let debug = format!("{:?}", conn);
    assert!(!debug.contains("patSuperSecret"));
    assert!(debug.contains("Unconnected"));
}
