use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::Fixture;
use crate::database::record::Record;
use crate::database::store::RecordStore;
use crate::filter::{Filter, FilterData, FilterMatch};

type Row = Map<String, Value>;

/// Record store backed by JSON rows held in memory.
///
/// Evaluates the same filter language as the Postgres backend, so trees
/// resolve identically against fixtures and against a live database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_fixture(fixture: Fixture) -> Result<Self, DatabaseError> {
        let store = Self::new();
        store.insert_all(&fixture.menus).await?;
        store.insert_all(&fixture.affiliations).await?;
        store.insert_all(&fixture.roles).await?;
        store.insert_all(&fixture.users).await?;
        Ok(store)
    }

    /// Load a JSON fixture file of the shape `{ "menus": [...], "roles": [...], ... }`
    pub async fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let fixture: Fixture = serde_json::from_str(&raw)
            .map_err(|e| DatabaseError::InvalidFixture(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_fixture(fixture).await?;
        info!("Loaded fixture: {}", path.display());
        Ok(store)
    }

    pub async fn insert<T: Record>(&self, record: &T) -> Result<(), DatabaseError> {
        let row = Self::to_row(record)?;
        self.tables.write().await.entry(T::TABLE.to_string()).or_default().push(row);
        Ok(())
    }

    pub async fn insert_all<T: Record>(&self, records: &[T]) -> Result<(), DatabaseError> {
        let rows = records.iter().map(Self::to_row).collect::<Result<Vec<_>, _>>()?;
        self.tables.write().await.entry(T::TABLE.to_string()).or_default().extend(rows);
        Ok(())
    }

    pub async fn table_len(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, Vec::len)
    }

    fn to_row<T: Record>(record: &T) -> Result<Row, DatabaseError> {
        match serde_json::to_value(record)? {
            Value::Object(row) => Ok(row),
            _ => Err(DatabaseError::InvalidFixture(format!("{} record is not an object", T::TABLE))),
        }
    }

    /// Rows of `table` matching the filter's WHERE clause, unsorted and unpaged
    async fn matching_rows(&self, filter: &Filter) -> Result<Vec<Row>, DatabaseError> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(filter.table_name()) else {
            return Ok(Vec::new());
        };

        let mut matched = Vec::new();
        for row in rows {
            let keep = match filter.where_data() {
                Some(where_data) => FilterMatch::matches(where_data, row)?,
                None => true,
            };
            if keep {
                matched.push(row.clone());
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select_any<T: Record>(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        let filter = Filter::from_data(T::TABLE, filter_data)?;
        let mut rows = self.matching_rows(&filter).await?;
        FilterMatch::sort_rows(&mut rows, filter.order_data());

        let offset = filter.offset_value().unwrap_or(0).max(0) as usize;
        let limit = filter.limit_value().map_or(usize::MAX, |l| l.max(0) as usize);

        rows.into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(DatabaseError::from))
            .collect()
    }

    async fn count<T: Record>(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        let filter = Filter::from_data(T::TABLE, FilterData { limit: None, offset: None, ..filter_data })?;
        Ok(self.matching_rows(&filter).await?.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Affiliation, Menu, MenuSummary};
    use serde_json::json;

    fn affiliation(id: i64, node_id: i64, name: &str) -> Affiliation {
        Affiliation { id, node_id, name: name.to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn filters_sorts_and_pages() {
        let store = MemoryStore::new();
        store
            .insert_all(&[
                affiliation(1, 0, "Head office"),
                affiliation(2, 0, "Branch"),
                affiliation(3, 1, "Finance"),
                affiliation(4, 0, "Warehouse"),
            ])
            .await
            .unwrap();

        let filter = FilterData {
            where_clause: Some(json!({ "node_id": 0 })),
            order: Some(json!("id desc")),
            ..Default::default()
        };
        let (page, total) = store.select_page::<Affiliation>(filter, 1, 1).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 2);
    }

    #[tokio::test]
    async fn projections_share_the_underlying_table() {
        let store = MemoryStore::new();
        store
            .insert(&Menu { id: 9, node_id: 0, menu_name: "System".to_string(), ..Default::default() })
            .await
            .unwrap();

        let summaries: Vec<MenuSummary> = store.select_any(FilterData::default()).await.unwrap();
        assert_eq!(summaries, vec![MenuSummary { id: 9, node_id: 0, menu_name: "System".to_string() }]);
        assert_eq!(store.table_len("menus").await, 1);
        assert_eq!(store.count::<Affiliation>(FilterData::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn loads_fixture_json() {
        let fixture: Fixture = serde_json::from_value(json!({
            "menus": [{ "id": 1, "menu_name": "Home" }],
            "roles": [{ "id": 1, "name": "ops", "menu_ids": [1] }]
        }))
        .unwrap();
        let store = MemoryStore::from_fixture(fixture).await.unwrap();
        assert_eq!(store.table_len("menus").await, 1);
        assert_eq!(store.table_len("roles").await, 1);
        assert_eq!(store.table_len("users").await, 0);
    }

    #[tokio::test]
    async fn invalid_where_is_an_error() {
        let store = MemoryStore::new();
        store.insert(&affiliation(1, 0, "Head office")).await.unwrap();
        let filter = FilterData {
            where_clause: Some(json!({ "name": { "$regex": "x" } })),
            ..Default::default()
        };
        assert!(matches!(
            store.select_any::<Affiliation>(filter).await,
            Err(DatabaseError::Filter(_))
        ));
    }
}
