use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::record::Record;
use crate::tree::node::HierarchyNode;

/// An organizational unit; affiliations nest through `node_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Affiliation {
    pub id: i64,
    pub node_id: i64,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Affiliation {
    const TABLE: &'static str = "affiliations";
}

impl HierarchyNode for Affiliation {
    const KEYWORD_FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> i64 {
        self.node_id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
