use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};

/// A typed row of a known table.
///
/// Every record can be read from Postgres (`FromRow`) and round-trips through
/// JSON, which is how the in-memory store keeps it.
pub trait Record:
    for<'r> FromRow<'r, PgRow> + Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static
{
    const TABLE: &'static str;
}
