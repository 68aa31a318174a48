use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub describe: Option<String>,
    pub status: bool,
    /// Menus members of this role may see
    pub menu_ids: Vec<i64>,
    pub button_codes: Vec<String>,
    pub interface_codes: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Role {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            describe: None,
            status: true,
            menu_ids: Vec::new(),
            button_codes: Vec::new(),
            interface_codes: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Record for Role {
    const TABLE: &'static str = "roles";
}
