//! HTTP-backed table API implementation.

use async_trait::async_trait;
use serde_json::Map;
use tracing::{debug, instrument};

use tabula_core::traits::TableApi;
use tabula_core::{ApiUrl, BaseId, BaseList, BaseSchema, QueryParams, Record, Result, TableId};

use crate::client::RestClient;
use crate::endpoints::{
    self, LIST_BASES, ListBasesResponse, ListRecordsResponse, OFFSET, query_pairs,
};

/// A network-backed [`TableApi`] speaking the JSON REST contract.
///
/// Paginated endpoints are followed until the server stops returning an
/// `offset`; results are concatenated in server order.
#[derive(Debug, Clone)]
pub struct HttpTableApi {
    client: RestClient,
}

impl HttpTableApi {
    pub(crate) fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Returns the API URL this client talks to.
    pub fn api_url(&self) -> &ApiUrl {
        self.client.api()
    }
}

#[async_trait]
impl TableApi for HttpTableApi {
    #[instrument(skip(self))]
    async fn list_bases(&self) -> Result<BaseList> {
        let mut bases = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let query: Vec<(String, String)> = offset
                .take()
                .map(|o| vec![(OFFSET.to_string(), o)])
                .unwrap_or_default();

            let page: ListBasesResponse = self.client.get(LIST_BASES, &query).await?;
            bases.extend(page.bases);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!(count = bases.len(), "Listed bases");
        Ok(BaseList {
            bases,
            extra: Map::new(),
        })
    }

    #[instrument(skip(self), fields(%base_id))]
    async fn get_base_schema(&self, base_id: &BaseId) -> Result<BaseSchema> {
        let schema: BaseSchema = self
            .client
            .get(&endpoints::base_schema(base_id.as_str()), &[])
            .await?;

        debug!(tables = schema.tables.len(), "Fetched base schema");
        Ok(schema)
    }

    #[instrument(skip(self, params), fields(%base_id, %table_id))]
    async fn list_records(
        &self,
        base_id: &BaseId,
        table_id: &TableId,
        params: &QueryParams,
    ) -> Result<Vec<Record>> {
        params.validate()?;

        let path = endpoints::list_records(base_id.as_str(), table_id.as_str());
        let base_query = query_pairs(params);

        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut query = base_query.clone();
            if let Some(o) = offset.take() {
                query.push((OFFSET.to_string(), o));
            }

            let page: ListRecordsResponse = self.client.get(&path, &query).await?;
            pages += 1;
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!(count = records.len(), pages, "Listed records");
        Ok(records)
    }
}
