//! Remote table API trait.

use async_trait::async_trait;

use crate::Result;
use crate::query::QueryParams;
use crate::record::Record;
use crate::schema::{BaseList, BaseSchema};
use crate::types::{BaseId, TableId};

/// An authenticated client for the remote table API.
///
/// Implementations handle pagination internally: every method returns the
/// complete result, never a single page.
#[async_trait]
pub trait TableApi: Send + Sync {
    /// List the bases the token can access.
    async fn list_bases(&self) -> Result<BaseList>;

    /// Fetch the schema of a base.
    async fn get_base_schema(&self, base_id: &BaseId) -> Result<BaseSchema>;

    /// List all records of a table matching `params`, in server order.
    async fn list_records(
        &self,
        base_id: &BaseId,
        table_id: &TableId,
        params: &QueryParams,
    ) -> Result<Vec<Record>>;
}
