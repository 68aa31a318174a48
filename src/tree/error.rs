use thiserror::Error;

use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Tree deeper than {max_depth} levels below node {parent_id}")]
    DepthExceeded { parent_id: i64, max_depth: usize },

    #[error("Cycle detected: node {id} is its own ancestor")]
    Cycle { id: i64 },

    #[error("Invalid page request: page {page}, size {size}")]
    InvalidPage { page: i32, size: i32 },
}
