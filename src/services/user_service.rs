use serde_json::json;

use crate::database::models::{Role, User};
use crate::database::{DatabaseError, Record, RecordStore};
use crate::filter::FilterData;

/// Lookups of the accounts the route tree is scoped by
#[derive(Clone)]
pub struct UserService<S> {
    store: S,
}

impl<S: RecordStore> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        self.find_by_id::<User>(id).await
    }

    pub async fn find_role(&self, id: i64) -> Result<Option<Role>, DatabaseError> {
        self.find_by_id::<Role>(id).await
    }

    /// The user together with their role, when they have one
    pub async fn find_user_with_role(&self, id: i64) -> Result<Option<(User, Option<Role>)>, DatabaseError> {
        let Some(user) = self.find_user(id).await? else {
            return Ok(None);
        };
        let role = match user.role_id {
            Some(role_id) => self.find_role(role_id).await?,
            None => None,
        };
        Ok(Some((user, role)))
    }

    async fn find_by_id<T: Record>(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let rows = self
            .store
            .select_any::<T>(FilterData {
                where_clause: Some(json!({ "id": id })),
                limit: Some(1),
                ..Default::default()
            })
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    #[tokio::test]
    async fn loads_user_and_role() {
        let store = MemoryStore::new();
        store.insert(&User { id: 5, username: "ops".to_string(), role_id: Some(2), ..Default::default() }).await.unwrap();
        store.insert(&User { id: 6, username: "guest".to_string(), ..Default::default() }).await.unwrap();
        store.insert(&Role { id: 2, name: "operators".to_string(), menu_ids: vec![7], ..Default::default() }).await.unwrap();
        let service = UserService::new(store);

        let (user, role) = service.find_user_with_role(5).await.unwrap().unwrap();
        assert_eq!(user.username, "ops");
        assert_eq!(role.unwrap().menu_ids, vec![7]);

        let (_, role) = service.find_user_with_role(6).await.unwrap().unwrap();
        assert!(role.is_none());

        assert!(service.find_user_with_role(99).await.unwrap().is_none());
    }
}
