//! Idea store trait and implementations.
//!
//! Persistence of blocks belongs to an external collaborator. The board only
//! talks to it through [`IdeaStore`]. Browser futures are not `Send`, so the
//! trait is declared `?Send`.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::tree::{BlockId, BlockKind, Direction};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Owner and project an idea list belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ProjectScope {
    pub owner_id: String,
    pub project_id: String,
}

impl ProjectScope {
    pub fn new(owner_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            project_id: project_id.into(),
        }
    }

    /// Both ids are present. Loads are skipped otherwise.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.owner_id.trim().is_empty() && !self.project_id.trim().is_empty()
    }
}

/// A persisted idea as returned by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, alias = "text")]
    pub label: String,
    #[serde(default, alias = "addtlText")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

/// Payload for creating an idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIdea {
    pub label: String,
    pub content: Option<String>,
    pub x: f64,
    pub y: f64,
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BlockId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

/// Fields changed by an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaPatch {
    pub label: String,
    pub content: Option<String>,
}

/// Storage backend for ideas.
#[async_trait(?Send)]
pub trait IdeaStore {
    /// List every idea in a project.
    async fn list_ideas(&self, scope: &ProjectScope) -> Result<Vec<IdeaRecord>>;

    /// Persist a new idea and return its id.
    async fn create_idea(&self, scope: &ProjectScope, idea: NewIdea) -> Result<BlockId>;

    /// Update the label and content of an existing idea.
    async fn update_idea(&self, scope: &ProjectScope, id: &BlockId, patch: IdeaPatch) -> Result<()>;
}

/// Store operation, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Create,
    Update,
}

/// In-memory idea store for tests and offline use.
#[derive(Debug, Default)]
pub struct InMemoryIdeaStore {
    projects: RefCell<HashMap<ProjectScope, Vec<IdeaRecord>>>,
    next_id: Cell<u64>,
    failing: RefCell<HashSet<StoreOp>>,
}

impl InMemoryIdeaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `records` for `scope`.
    #[must_use]
    pub fn with_records(scope: ProjectScope, records: Vec<IdeaRecord>) -> Self {
        let store = Self::new();
        store.projects.borrow_mut().insert(scope, records);
        store
    }

    /// Makes every call of `op` fail until [`Self::recover`] is called.
    pub fn fail(&self, op: StoreOp) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn recover(&self, op: StoreOp) {
        self.failing.borrow_mut().remove(&op);
    }

    /// Snapshot of the records stored for `scope`.
    #[must_use]
    pub fn records(&self, scope: &ProjectScope) -> Vec<IdeaRecord> {
        self.projects
            .borrow()
            .get(scope)
            .cloned()
            .unwrap_or_default()
    }

    fn is_failing(&self, op: StoreOp) -> bool {
        self.failing.borrow().contains(&op)
    }

    fn allocate_id(&self) -> Result<BlockId> {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        BlockId::new(format!("idea-{n}")).map_err(|e| StoreError::create_failed(e.to_string()))
    }
}

#[async_trait(?Send)]
impl IdeaStore for InMemoryIdeaStore {
    async fn list_ideas(&self, scope: &ProjectScope) -> Result<Vec<IdeaRecord>> {
        if self.is_failing(StoreOp::List) {
            return Err(StoreError::load_failed(&scope.project_id, "store unavailable"));
        }
        Ok(self.records(scope))
    }

    async fn create_idea(&self, scope: &ProjectScope, idea: NewIdea) -> Result<BlockId> {
        if self.is_failing(StoreOp::Create) {
            return Err(StoreError::create_failed("store unavailable"));
        }
        let id = self.allocate_id()?;
        let record = IdeaRecord {
            id: id.to_string(),
            x: idea.x,
            y: idea.y,
            label: idea.label,
            content: idea.content,
            kind: Some(idea.kind),
            parent_id: idea.parent_id.map(String::from),
            direction: idea.direction,
        };
        self.projects
            .borrow_mut()
            .entry(scope.clone())
            .or_default()
            .push(record);
        Ok(id)
    }

    async fn update_idea(&self, scope: &ProjectScope, id: &BlockId, patch: IdeaPatch) -> Result<()> {
        if self.is_failing(StoreOp::Update) {
            return Err(StoreError::update_failed(id.as_str(), "store unavailable"));
        }
        let mut projects = self.projects.borrow_mut();
        let record = projects
            .get_mut(scope)
            .and_then(|records| records.iter_mut().find(|r| r.id == id.as_str()))
            .ok_or_else(|| StoreError::update_failed(id.as_str(), "not found"))?;
        record.label = patch.label;
        record.content = patch.content;
        Ok(())
    }
}

/// A wrapper that adds tracing to an idea store.
pub struct TracingIdeaStore<S: IdeaStore> {
    inner: S,
}

impl<S: IdeaStore> TracingIdeaStore<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait(?Send)]
impl<S: IdeaStore> IdeaStore for TracingIdeaStore<S> {
    async fn list_ideas(&self, scope: &ProjectScope) -> Result<Vec<IdeaRecord>> {
        tracing::debug!(owner = %scope.owner_id, project = %scope.project_id, "Listing ideas");
        let result = self.inner.list_ideas(scope).await;
        if let Ok(ref records) = result {
            tracing::trace!(count = records.len(), "Ideas listed");
        }
        result
    }

    async fn create_idea(&self, scope: &ProjectScope, idea: NewIdea) -> Result<BlockId> {
        tracing::debug!(project = %scope.project_id, kind = %idea.kind, "Creating idea");
        let result = self.inner.create_idea(scope, idea).await;
        if let Ok(ref id) = result {
            tracing::trace!(block_id = %id, "Idea created");
        }
        result
    }

    async fn update_idea(&self, scope: &ProjectScope, id: &BlockId, patch: IdeaPatch) -> Result<()> {
        tracing::debug!(project = %scope.project_id, block_id = %id, "Updating idea");
        self.inner.update_idea(scope, id, patch).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn scope() -> ProjectScope {
        ProjectScope::new("owner", "project")
    }

    fn new_idea(label: &str) -> NewIdea {
        NewIdea {
            label: label.to_string(),
            content: None,
            x: 10.0,
            y: 20.0,
            kind: BlockKind::Leaf,
            parent_id: None,
            direction: None,
        }
    }

    #[test]
    fn test_scope_completeness() {
        assert!(scope().is_complete());
        assert!(!ProjectScope::new("", "project").is_complete());
        assert!(!ProjectScope::new("owner", " ").is_complete());
    }

    #[test]
    fn test_record_accepts_legacy_field_names() {
        let json = r#"{ "id": "7", "text": "Why?", "addtlText": "Because" }"#;
        let record: IdeaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.label, "Why?");
        assert_eq!(record.content.as_deref(), Some("Because"));
        assert_eq!((record.x, record.y), (0.0, 0.0));
        assert_eq!(record.kind, None);
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let store = InMemoryIdeaStore::new();
        let first = store.create_idea(&scope(), new_idea("One")).await.unwrap();
        let second = store.create_idea(&scope(), new_idea("Two")).await.unwrap();
        assert_ne!(first, second);

        let records = store.list_ideas(&scope()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "One");
        assert_eq!(records[0].kind, Some(BlockKind::Leaf));

        let other = ProjectScope::new("owner", "elsewhere");
        assert!(store.list_ideas(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let store = InMemoryIdeaStore::new();
        let id = store.create_idea(&scope(), new_idea("One")).await.unwrap();
        let patch = IdeaPatch {
            label: "Uno".to_string(),
            content: Some("detail".to_string()),
        };
        store.update_idea(&scope(), &id, patch.clone()).await.unwrap();
        assert_eq!(store.records(&scope())[0].label, "Uno");

        let missing = BlockId::new("nope").unwrap();
        assert!(matches!(
            store.update_idea(&scope(), &missing, patch).await,
            Err(StoreError::UpdateFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = TracingIdeaStore::new(InMemoryIdeaStore::new());
        store.inner().fail(StoreOp::Create);
        assert!(store.create_idea(&scope(), new_idea("One")).await.is_err());
        assert!(store.inner().records(&scope()).is_empty());

        store.inner().recover(StoreOp::Create);
        assert!(store.create_idea(&scope(), new_idea("One")).await.is_ok());

        store.inner().fail(StoreOp::List);
        assert!(matches!(
            store.list_ideas(&scope()).await,
            Err(StoreError::LoadFailed { .. })
        ));
    }
}
