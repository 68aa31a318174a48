use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub status: bool,
    pub is_admin: bool,
    pub role_id: Option<i64>,
    pub affiliation_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            username: String::new(),
            email: String::new(),
            mobile: String::new(),
            status: true,
            is_admin: false,
            role_id: None,
            affiliation_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
}
