use crate::database::models::Affiliation;
use crate::database::RecordStore;
use crate::tree::{TreeError, TreeNode, TreeQuery, TreeResolver};

#[derive(Clone)]
pub struct AffiliationService<S> {
    store: S,
}

impl<S: RecordStore> AffiliationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Affiliation tree below `node_id`; a keyword at the root searches every level
    pub async fn affiliation_tree(&self, node_id: i64, keyword: &str) -> Result<Vec<TreeNode<Affiliation>>, TreeError> {
        let query = TreeQuery::children_of(node_id).with_keyword(keyword);
        TreeResolver::new(&self.store).resolve::<Affiliation>(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn affiliation(id: i64, node_id: i64, name: &str) -> Affiliation {
        Affiliation { id, node_id, name: name.to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn searches_by_name() {
        let store = MemoryStore::new();
        store
            .insert_all(&[
                affiliation(1, 0, "Head office"),
                affiliation(2, 1, "Finance"),
                affiliation(3, 2, "Payroll"),
                affiliation(4, 0, "Regional finance"),
            ])
            .await
            .unwrap();
        let service = AffiliationService::new(store);

        let matches = service.affiliation_tree(0, "finance").await.unwrap();
        let ids: Vec<i64> = matches.iter().map(|n| n.node.id).collect();
        assert_eq!(ids, vec![4, 2]);
        assert_eq!(matches[1].children[0].node.name, "Payroll");

        let level = service.affiliation_tree(1, "").await.unwrap();
        assert_eq!(level.len(), 1);
        assert_eq!(level[0].node.id, 2);
    }
}
