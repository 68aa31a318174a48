use futures::future::{try_join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::config;
use crate::database::RecordStore;
use crate::filter::FilterData;
use crate::tree::error::TreeError;
use crate::tree::node::{HierarchyNode, TreeNode, ROOT_ID};
use crate::types::{PageRequest, Pagination};

/// Which levels of the tree a keyword filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordScope {
    /// Only the invoked level; every match carries its complete subtree
    #[default]
    InvokedLevel,
    /// Every level; descendants must match the keyword too
    EveryLevel,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeQuery {
    pub parent_id: i64,
    pub keyword: String,
    /// Overrides `T::KEYWORD_FIELDS` when set and non-empty
    pub keyword_fields: Option<Vec<String>>,
    /// ANDed into the filter at every depth
    pub extra_filters: Vec<Value>,
    pub keyword_scope: KeywordScope,
}

impl TreeQuery {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn children_of(parent_id: i64) -> Self {
        Self { parent_id, ..Self::default() }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn with_keyword_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.keyword_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filters(mut self, filters: impl IntoIterator<Item = Value>) -> Self {
        self.extra_filters.extend(filters);
        self
    }

    pub fn with_keyword_scope(mut self, scope: KeywordScope) -> Self {
        self.keyword_scope = scope;
        self
    }
}

/// Materializes subtrees from a flat self-referencing table, one query per
/// node level, with sibling subtrees fetched concurrently.
pub struct TreeResolver<'a, S> {
    store: &'a S,
    max_depth: usize,
}

impl<'a, S: RecordStore> TreeResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            max_depth: config().tree.max_depth,
        }
    }

    /// Number of node levels below the invoked parent the resolver may descend
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub async fn resolve<T: HierarchyNode>(&self, query: &TreeQuery) -> Result<Vec<TreeNode<T>>, TreeError> {
        let filter = level_filter::<T>(query, query.parent_id, &query.keyword);
        let nodes = self.store.select_any::<T>(filter).await?;
        debug!(table = T::TABLE, parent_id = query.parent_id, matched = nodes.len(), "Resolved tree level");
        self.expand(query, nodes, Vec::new()).await
    }

    /// Paginate the invoked level only; every returned node still carries its full subtree
    pub async fn resolve_page<T: HierarchyNode>(
        &self,
        query: &TreeQuery,
        page: PageRequest,
    ) -> Result<Pagination<TreeNode<T>>, TreeError> {
        if !page.is_valid() {
            return Err(TreeError::InvalidPage { page: page.page, size: page.size });
        }

        let filter = level_filter::<T>(query, query.parent_id, &query.keyword);
        let (nodes, total) = self.store.select_page::<T>(filter, page.offset(), page.limit()).await?;
        debug!(
            table = T::TABLE,
            parent_id = query.parent_id,
            page = page.page,
            matched = nodes.len(),
            total,
            "Resolved tree page"
        );

        let records = self.expand(query, nodes, Vec::new()).await?;
        Ok(Pagination::new(page, records, total))
    }

    /// Attach children to every node; `ancestors` is the id path above `nodes`
    fn expand<'b, T: HierarchyNode>(
        &'b self,
        query: &'b TreeQuery,
        nodes: Vec<T>,
        ancestors: Vec<i64>,
    ) -> BoxFuture<'b, Result<Vec<TreeNode<T>>, TreeError>> {
        async move {
            if nodes.is_empty() {
                return Ok(Vec::new());
            }
            if ancestors.len() >= self.max_depth {
                return Err(TreeError::DepthExceeded {
                    parent_id: ancestors.last().copied().unwrap_or(query.parent_id),
                    max_depth: self.max_depth,
                });
            }

            let branches = nodes.into_iter().map(|node| {
                let mut path = ancestors.clone();
                async move {
                    let id = node.id();
                    if path.contains(&id) {
                        return Err(TreeError::Cycle { id });
                    }
                    path.push(id);
                    let children = self.resolve_children::<T>(query, id, path).await?;
                    Ok(TreeNode::new(node, children))
                }
            });

            // First failing branch drops its siblings
            try_join_all(branches).await
        }
        .boxed()
    }

    fn resolve_children<'b, T: HierarchyNode>(
        &'b self,
        query: &'b TreeQuery,
        parent_id: i64,
        ancestors: Vec<i64>,
    ) -> BoxFuture<'b, Result<Vec<TreeNode<T>>, TreeError>> {
        async move {
            let keyword = match query.keyword_scope {
                KeywordScope::InvokedLevel => "",
                KeywordScope::EveryLevel => query.keyword.as_str(),
            };
            let filter = level_filter::<T>(query, parent_id, keyword);
            let nodes = self.store.select_any::<T>(filter).await?;
            self.expand(query, nodes, ancestors).await
        }
        .boxed()
    }
}

/// Filter for one tree level.
///
/// A non-empty keyword at the root searches the whole table; anywhere else the
/// level is scoped to `parent_id`.
pub fn level_filter<T: HierarchyNode>(query: &TreeQuery, parent_id: i64, keyword: &str) -> FilterData {
    let mut clauses = Vec::new();

    if !keyword.is_empty() {
        let pattern = format!("%{}%", escape_like(keyword));
        let fields: Vec<&str> = match &query.keyword_fields {
            Some(fields) if !fields.is_empty() => fields.iter().map(String::as_str).collect(),
            _ => T::KEYWORD_FIELDS.to_vec(),
        };
        let alternatives: Vec<Value> = fields
            .into_iter()
            .map(|field| field_clause(field, json!({ "$ilike": pattern })))
            .collect();
        clauses.push(json!({ "$or": alternatives }));
    }

    if parent_id != ROOT_ID || keyword.is_empty() {
        clauses.push(field_clause(T::PARENT_FIELD, json!(parent_id)));
    }

    clauses.extend(query.extra_filters.iter().cloned());

    FilterData {
        where_clause: Some(json!({ "$and": clauses })),
        order: Some(json!("id desc")),
        ..Default::default()
    }
}

fn field_clause(field: &str, condition: Value) -> Value {
    let mut clause = Map::new();
    clause.insert(field.to_string(), condition);
    Value::Object(clause)
}

/// Escape LIKE wildcards so the keyword matches literally
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::database::models::{Menu, MenuSummary};
    use crate::database::{DatabaseError, MemoryStore, Record};

    fn menu(id: i64, node_id: i64, name: &str, route: &str) -> Menu {
        Menu {
            id,
            node_id,
            menu_name: name.to_string(),
            route_name: route.to_string(),
            route_path: format!("/{}", route),
            ..Default::default()
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_all(&[
                menu(1, 0, "Sys", "sys"),
                menu(2, 1, "Users", "users"),
                Menu { status: false, ..menu(3, 1, "Roles", "roles") },
                menu(4, 0, "Home", "home"),
                menu(5, 2, "Profile", "profile"),
            ])
            .await
            .unwrap();
        store
    }

    fn ids<T: HierarchyNode>(tree: &[TreeNode<T>]) -> Vec<i64> {
        tree.iter().map(TreeNode::id).collect()
    }

    #[tokio::test]
    async fn resolves_example_scenario() {
        let store = MemoryStore::new();
        store
            .insert_all(&[menu(1, 0, "Sys", "sys"), menu(2, 1, "Users", "users")])
            .await
            .unwrap();

        let tree = TreeResolver::new(&store).resolve::<MenuSummary>(&TreeQuery::root()).await.unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!([{
                "id": 1, "node_id": 0, "menu_name": "Sys",
                "children": [{ "id": 2, "node_id": 1, "menu_name": "Users", "children": [] }]
            }])
        );
    }

    #[tokio::test]
    async fn root_without_keyword_returns_top_level_with_full_subtrees() {
        let store = seeded().await;
        let tree = TreeResolver::new(&store).resolve::<Menu>(&TreeQuery::root()).await.unwrap();

        assert_eq!(ids(&tree), vec![4, 1]);
        assert_eq!(ids(&tree[1].children), vec![3, 2]);
        assert_eq!(ids(&tree[1].children[1].children), vec![5]);
    }

    #[tokio::test]
    async fn resolving_twice_is_identical() {
        let store = seeded().await;
        let resolver = TreeResolver::new(&store);
        let first = resolver.resolve::<Menu>(&TreeQuery::root()).await.unwrap();
        let second = resolver.resolve::<Menu>(&TreeQuery::root()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn children_point_at_their_parent() {
        fn check(nodes: &[TreeNode<Menu>], parent: i64) {
            for node in nodes {
                assert_eq!(node.node.parent_id(), parent);
                check(&node.children, node.id());
            }
        }

        let store = seeded().await;
        let tree = TreeResolver::new(&store).resolve::<Menu>(&TreeQuery::root()).await.unwrap();
        check(&tree, ROOT_ID);
    }

    #[tokio::test]
    async fn pagination_limits_breadth_only() {
        let store = seeded().await;
        let resolver = TreeResolver::new(&store);
        let full = resolver.resolve::<Menu>(&TreeQuery::root()).await.unwrap();

        let first = resolver.resolve_page::<Menu>(&TreeQuery::root(), PageRequest::new(1, 1)).await.unwrap();
        assert_eq!(first.total, 2);
        assert_eq!(first.page_size, 1);
        assert_eq!(ids(&first.records), vec![4]);

        let second = resolver.resolve_page::<Menu>(&TreeQuery::root(), PageRequest::new(2, 1)).await.unwrap();
        assert_eq!(second.records.len(), 1);
        assert_eq!(second.records[0], full[1]);

        let past_end = resolver.resolve_page::<Menu>(&TreeQuery::root(), PageRequest::new(3, 1)).await.unwrap();
        assert!(past_end.records.is_empty());
        assert_eq!(past_end.total, 2);
    }

    #[tokio::test]
    async fn rejects_invalid_page() {
        let store = seeded().await;
        let result = TreeResolver::new(&store).resolve_page::<Menu>(&TreeQuery::root(), PageRequest::new(0, 10)).await;
        assert!(matches!(result, Err(TreeError::InvalidPage { page: 0, size: 10 })));
    }

    #[tokio::test]
    async fn keyword_matches_any_keyword_field() {
        let store = MemoryStore::new();
        store
            .insert_all(&[menu(1, 0, "Dashboard", "home"), menu(2, 0, "Landing", "dash-board"), menu(3, 0, "Other", "other")])
            .await
            .unwrap();

        let tree = TreeResolver::new(&store)
            .resolve::<Menu>(&TreeQuery::root().with_keyword("DASH"))
            .await
            .unwrap();
        assert_eq!(ids(&tree), vec![2, 1]);
    }

    #[tokio::test]
    async fn root_keyword_searches_every_level_and_keeps_subtrees() {
        let store = seeded().await;
        let tree = TreeResolver::new(&store)
            .resolve::<Menu>(&TreeQuery::root().with_keyword("user"))
            .await
            .unwrap();

        // "Users" sits under "Sys" but is returned at the top with its unfiltered subtree
        assert_eq!(ids(&tree), vec![2]);
        assert_eq!(ids(&tree[0].children), vec![5]);
    }

    #[tokio::test]
    async fn every_level_scope_filters_descendants() {
        let store = seeded().await;
        let query = TreeQuery::root().with_keyword("user").with_keyword_scope(KeywordScope::EveryLevel);
        let tree = TreeResolver::new(&store).resolve::<Menu>(&query).await.unwrap();
        assert_eq!(ids(&tree), vec![2]);
        assert!(tree[0].children.is_empty());
    }

    #[tokio::test]
    async fn keyword_below_root_stays_scoped_to_parent() {
        let store = seeded().await;
        store.insert(&menu(6, 4, "Role overview", "role-overview")).await.unwrap();

        let tree = TreeResolver::new(&store)
            .resolve::<Menu>(&TreeQuery::children_of(1).with_keyword("rol"))
            .await
            .unwrap();
        assert_eq!(ids(&tree), vec![3]);
    }

    #[tokio::test]
    async fn keyword_wildcards_match_literally() {
        let store = MemoryStore::new();
        store
            .insert_all(&[menu(1, 0, "100% done", "done"), menu(2, 0, "100 done", "plain")])
            .await
            .unwrap();
        let tree = TreeResolver::new(&store)
            .resolve::<Menu>(&TreeQuery::root().with_keyword("0%").with_keyword_fields(["menu_name"]))
            .await
            .unwrap();
        assert_eq!(ids(&tree), vec![1]);
    }

    #[tokio::test]
    async fn extra_filters_apply_at_every_depth() {
        let store = seeded().await;
        let query = TreeQuery::root().with_filters([json!({ "status": true })]);
        let tree = TreeResolver::new(&store).resolve::<Menu>(&query).await.unwrap();

        assert_eq!(ids(&tree), vec![4, 1]);
        assert_eq!(ids(&tree[1].children), vec![2]);
        assert_eq!(ids(&tree[1].children[0].children), vec![5]);
    }

    #[tokio::test]
    async fn depth_guard_reports_deep_trees() {
        let store = seeded().await;
        let result = TreeResolver::new(&store).with_max_depth(2).resolve::<Menu>(&TreeQuery::root()).await;
        assert!(matches!(result, Err(TreeError::DepthExceeded { parent_id: 2, max_depth: 2 })));

        let tree = TreeResolver::new(&store).with_max_depth(3).resolve::<Menu>(&TreeQuery::root()).await.unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[tokio::test]
    async fn cycle_guard_reports_self_ancestry() {
        let store = MemoryStore::new();
        store.insert_all(&[menu(7, 8, "Loop a", "loop-a"), menu(8, 7, "Loop b", "loop-b")]).await.unwrap();

        let result = TreeResolver::new(&store)
            .resolve::<Menu>(&TreeQuery::root().with_keyword("loop a"))
            .await;
        assert!(matches!(result, Err(TreeError::Cycle { id: 7 })));
    }

    /// Fails any level query scoped to `fail_parent`
    struct FailingStore {
        inner: MemoryStore,
        fail_parent: i64,
    }

    #[async_trait]
    impl RecordStore for FailingStore {
        async fn select_any<T: Record>(&self, filter: FilterData) -> Result<Vec<T>, DatabaseError> {
            let needle = format!("{{\"node_id\":{}}}", self.fail_parent);
            if filter.where_clause.as_ref().is_some_and(|w| w.to_string().contains(&needle)) {
                return Err(DatabaseError::QueryError("connection reset".to_string()));
            }
            self.inner.select_any(filter).await
        }

        async fn count<T: Record>(&self, filter: FilterData) -> Result<i64, DatabaseError> {
            self.inner.count::<T>(filter).await
        }
    }

    #[tokio::test]
    async fn store_failure_in_one_branch_aborts_the_fetch() {
        let store = FailingStore { inner: seeded().await, fail_parent: 2 };
        let result = TreeResolver::new(&store).resolve::<Menu>(&TreeQuery::root()).await;
        assert!(matches!(result, Err(TreeError::Database(DatabaseError::QueryError(_)))));
    }

    /// Tracks how many level queries are in flight at once
    struct SlowStore {
        inner: MemoryStore,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RecordStore for SlowStore {
        async fn select_any<T: Record>(&self, filter: FilterData) -> Result<Vec<T>, DatabaseError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            let rows = self.inner.select_any(filter).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            rows
        }

        async fn count<T: Record>(&self, filter: FilterData) -> Result<i64, DatabaseError> {
            self.inner.count::<T>(filter).await
        }
    }

    #[tokio::test]
    async fn sibling_subtrees_are_fetched_concurrently() {
        let store = SlowStore {
            inner: seeded().await,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        };
        TreeResolver::new(&store).resolve::<Menu>(&TreeQuery::root()).await.unwrap();
        assert!(store.peak.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn level_filter_follows_root_keyword_rule() {
        let unscoped = level_filter::<Menu>(&TreeQuery::root(), ROOT_ID, "dash");
        let where_data = unscoped.where_clause.unwrap();
        assert!(!where_data.to_string().contains("node_id"));
        assert_eq!(unscoped.order, Some(json!("id desc")));

        let scoped = level_filter::<Menu>(&TreeQuery::root(), 5, "dash");
        assert!(scoped.where_clause.unwrap().to_string().contains("\"node_id\":5"));

        let browse = level_filter::<Menu>(&TreeQuery::root(), ROOT_ID, "");
        assert_eq!(browse.where_clause, Some(json!({ "$and": [{ "node_id": 0 }] })));
    }
}
