use std::marker::PhantomData;

use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::database::record::Record;
use crate::filter::FilterData;

/// Typed reads against `T::TABLE`
pub struct Repository<T> {
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T: Record> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        QueryBuilder::<T>::new(T::TABLE)?
            .filter(filter_data)?
            .select_all(&self.pool)
            .await
    }

    pub async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        QueryBuilder::<T>::new(T::TABLE)?
            .filter(filter_data)?
            .count(&self.pool)
            .await
    }
}
