use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::record::Record;
use crate::filter::FilterData;

/// Read access to typed records, shared by the Postgres and in-memory backends
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record of `T::TABLE` matching the filter, in the filter's order
    async fn select_any<T: Record>(&self, filter: FilterData) -> Result<Vec<T>, DatabaseError>;

    /// Number of records matching the filter's WHERE clause
    async fn count<T: Record>(&self, filter: FilterData) -> Result<i64, DatabaseError>;

    /// One page of matches plus the total number of matches under the same filter
    async fn select_page<T: Record>(
        &self,
        filter: FilterData,
        offset: i32,
        limit: i32,
    ) -> Result<(Vec<T>, i64), DatabaseError> {
        let count_filter = FilterData { limit: None, offset: None, ..filter.clone() };
        let page_filter = FilterData { limit: Some(limit), offset: Some(offset), ..filter };
        futures::try_join!(self.select_any::<T>(page_filter), self.count::<T>(count_filter))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
