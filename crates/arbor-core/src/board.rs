//! Board session: the block tree plus its idea store.
//!
//! Loads and creates wait for the store; edits are applied locally first and
//! persisted in the background. Store failures never reach the caller as
//! errors. They are logged and the board degrades (empty list on load, no new
//! block on create, local edit kept on update).

use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::error::TreeError;
use crate::store::{IdeaPatch, IdeaStore, NewIdea, ProjectScope};
use crate::tree::{BlockAction, BlockId, BlockKind, CanvasBlock, CanvasModel, Direction};
use crate::viewport::WorldPoint;

/// Request for a new block.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    pub kind: BlockKind,
    pub position: WorldPoint,
    /// Falls back to the kind's default label
    pub label: Option<String>,
    pub content: Option<String>,
    pub parent: Option<(BlockId, Direction)>,
}

impl NewBlock {
    /// A new root block at `position`.
    #[must_use]
    pub const fn root(kind: BlockKind, position: WorldPoint) -> Self {
        Self {
            kind,
            position,
            label: None,
            content: None,
            parent: None,
        }
    }

    /// A new block expanded from `parent` toward `direction`, `spacing` world
    /// units away from it.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownBlock`] if `parent` is not in `model`.
    pub fn child_of(
        model: &CanvasModel,
        parent: &BlockId,
        direction: Direction,
        kind: BlockKind,
        spacing: f64,
    ) -> Result<Self, TreeError> {
        let anchor = model
            .get(parent)
            .ok_or_else(|| TreeError::UnknownBlock(parent.to_string()))?;
        let (dx, dy) = direction.offset(spacing);
        Ok(Self {
            kind,
            position: anchor.position.offset(dx, dy),
            label: None,
            content: None,
            parent: Some((parent.clone(), direction)),
        })
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A block the store accepted, ready to be added to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedBlock {
    pub block: CanvasBlock,
    pub parent: Option<(BlockId, Direction)>,
}

impl CreatedBlock {
    /// Adds the block to `model`, under its parent when it has one.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] if the id is already taken. A parent that has
    /// disappeared in the meantime leaves the block as a root.
    pub fn apply(&self, model: &CanvasModel) -> Result<CanvasModel, TreeError> {
        let next = model.reduce(BlockAction::InsertRoot(self.block.clone()))?;
        let Some((parent, direction)) = &self.parent else {
            return Ok(next);
        };
        match next.reduce(BlockAction::AttachChild {
            parent: parent.clone(),
            child: self.block.id.clone(),
            direction: Some(*direction),
        }) {
            Ok(attached) => Ok(attached),
            Err(error) => {
                warn!(block_id = %self.block.id, %error, "Parent missing, keeping block as root");
                Ok(next)
            }
        }
    }
}

#[derive(Clone)]
pub struct Board {
    store: Rc<dyn IdeaStore>,
    scope: ProjectScope,
}

impl Board {
    pub fn new(store: Rc<dyn IdeaStore>, scope: ProjectScope) -> Self {
        Self { store, scope }
    }

    #[must_use]
    pub const fn scope(&self) -> &ProjectScope {
        &self.scope
    }

    /// Loads the project's ideas into a fresh model.
    ///
    /// Returns an empty model when the scope is incomplete or the store fails.
    pub async fn load(&self) -> CanvasModel {
        if !self.scope.is_complete() {
            debug!("Load skipped: owner or project id missing");
            return CanvasModel::new();
        }
        match self.store.list_ideas(&self.scope).await {
            Ok(records) => {
                info!(
                    owner = %self.scope.owner_id,
                    project = %self.scope.project_id,
                    count = records.len(),
                    "Loaded ideas"
                );
                CanvasModel::from_records(&records)
            }
            Err(error) => {
                warn!(
                    owner = %self.scope.owner_id,
                    project = %self.scope.project_id,
                    %error,
                    "Failed to load ideas"
                );
                CanvasModel::new()
            }
        }
    }

    /// Persists a new block. Returns `None` when the store rejects it.
    pub async fn create_block(&self, request: NewBlock) -> Option<CreatedBlock> {
        let label = request
            .label
            .unwrap_or_else(|| request.kind.default_label().to_string());
        let idea = NewIdea {
            label: label.clone(),
            content: request.content.clone(),
            x: request.position.x,
            y: request.position.y,
            kind: request.kind,
            parent_id: request.parent.as_ref().map(|(id, _)| id.clone()),
            direction: request.parent.as_ref().map(|(_, d)| *d),
        };

        match self.store.create_idea(&self.scope, idea).await {
            Ok(id) => {
                info!(block_id = %id, kind = %request.kind, "Created block");
                let mut block = CanvasBlock::new(id, request.kind, label, request.position);
                block.content = request.content;
                Some(CreatedBlock {
                    block,
                    parent: request.parent,
                })
            }
            Err(error) => {
                error!(project = %self.scope.project_id, %error, "Failed to create idea");
                None
            }
        }
    }

    /// Applies an edit to `model` without waiting for the store.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownBlock`] if `id` is not in `model`.
    pub fn apply_edit(
        model: &CanvasModel,
        id: &BlockId,
        patch: &IdeaPatch,
    ) -> Result<CanvasModel, TreeError> {
        model.reduce(BlockAction::Edit {
            id: id.clone(),
            label: patch.label.clone(),
            content: patch.content.clone(),
        })
    }

    /// Sends an already-applied edit to the store. Failures are logged only.
    pub async fn persist_edit(&self, id: BlockId, patch: IdeaPatch) {
        if let Err(error) = self.store.update_idea(&self.scope, &id, patch).await {
            warn!(block_id = %id, %error, "Failed to update idea");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::store::{IdeaRecord, InMemoryIdeaStore, StoreOp};
    use tracing_test::traced_test;

    fn scope() -> ProjectScope {
        ProjectScope::new("owner", "project")
    }

    fn board_with(store: &Rc<InMemoryIdeaStore>) -> Board {
        Board::new(store.clone(), scope())
    }

    #[tokio::test]
    async fn test_load_builds_tree_from_records() {
        let records = vec![
            IdeaRecord {
                id: "1".to_string(),
                label: "Mission".to_string(),
                kind: Some(BlockKind::Branch),
                ..IdeaRecord::default()
            },
            IdeaRecord {
                id: "2".to_string(),
                label: "Question".to_string(),
                content: Some("Answer".to_string()),
                parent_id: Some("1".to_string()),
                direction: Some(Direction::Down),
                x: 0.0,
                y: 320.0,
                ..IdeaRecord::default()
            },
        ];
        let store = Rc::new(InMemoryIdeaStore::with_records(scope(), records));
        let model = board_with(&store).load().await;

        assert_eq!(model.len(), 2);
        assert_eq!(
            model.export(),
            "Branch: Mission\n  Leaf: Question\n    Answer: Answer"
        );
    }

    #[tokio::test]
    async fn test_load_skipped_without_ids() {
        let store = Rc::new(InMemoryIdeaStore::with_records(
            ProjectScope::new("", "project"),
            vec![IdeaRecord {
                id: "1".to_string(),
                ..IdeaRecord::default()
            }],
        ));
        let board = Board::new(store, ProjectScope::new("", "project"));
        assert!(board.load().await.is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_load_failure_yields_empty_model() {
        let store = Rc::new(InMemoryIdeaStore::new());
        store.fail(StoreOp::List);
        let model = board_with(&store).load().await;
        assert!(model.is_empty());
        assert!(logs_contain("Failed to load ideas"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_failed_create_leaves_model_unchanged() {
        let store = Rc::new(InMemoryIdeaStore::new());
        let board = board_with(&store);
        let root = board
            .create_block(NewBlock::root(BlockKind::Branch, WorldPoint::origin()))
            .await
            .unwrap();
        let model = root.apply(&CanvasModel::new()).unwrap();

        store.fail(StoreOp::Create);
        let created = board
            .create_block(NewBlock::root(BlockKind::Leaf, WorldPoint::origin()).label("Lost"))
            .await;
        assert!(created.is_none());

        let next = created.map_or_else(|| model.clone(), |block| block.apply(&model).unwrap());
        assert_eq!(next, model);
        assert_eq!(next.len(), 1);
        assert!(next.items().iter().all(|item| item.label != "Lost"));
        assert_eq!(store.records(&scope()).len(), 1);
        assert!(logs_contain("Failed to create idea"));
    }

    #[tokio::test]
    async fn test_slow_load_keeps_blocks_created_meanwhile() {
        let store = Rc::new(InMemoryIdeaStore::with_records(
            scope(),
            vec![IdeaRecord {
                id: "stored".to_string(),
                label: "Stored".to_string(),
                kind: Some(BlockKind::Branch),
                ..IdeaRecord::default()
            }],
        ));
        let board = board_with(&store);
        let loaded = board.load().await;

        let created = board
            .create_block(NewBlock::root(BlockKind::Leaf, WorldPoint::origin()).label("Early"))
            .await
            .unwrap();
        let local = created.apply(&CanvasModel::new()).unwrap();

        let model = loaded.merge_missing(&local);
        assert_eq!(model.len(), 2);
        assert!(model.contains(&created.block.id));
        assert_eq!(model.export(), "Branch: Stored\nLeaf: Early");
    }

    #[tokio::test]
    async fn test_create_uses_default_labels() {
        let store = Rc::new(InMemoryIdeaStore::new());
        let board = board_with(&store);

        let created = board
            .create_block(NewBlock::root(BlockKind::Branch, WorldPoint::new(5.0, 6.0)))
            .await
            .unwrap();
        let model = created.apply(&CanvasModel::new()).unwrap();
        let items = model.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "New Branch");
        assert_eq!((items[0].x, items[0].y), (5.0, 6.0));

        let created = board
            .create_block(NewBlock::root(BlockKind::Leaf, WorldPoint::origin()))
            .await
            .unwrap();
        assert_eq!(created.block.label, "New Question");
    }

    #[tokio::test]
    async fn test_create_child_attaches_under_parent() {
        let store = Rc::new(InMemoryIdeaStore::new());
        let board = board_with(&store);

        let root = board
            .create_block(NewBlock::root(BlockKind::Branch, WorldPoint::origin()).label("Root"))
            .await
            .unwrap();
        let model = root.apply(&CanvasModel::new()).unwrap();

        let request =
            NewBlock::child_of(&model, &root.block.id, Direction::Left, BlockKind::Leaf, 320.0)
                .unwrap()
                .label("Q1")
                .content("A1");
        let child = board.create_block(request).await.unwrap();
        let model = child.apply(&model).unwrap();

        assert_eq!(model.export(), "Branch: Root\n  Leaf: Q1\n    Answer: A1");
        let placed = model.get(&child.block.id).unwrap();
        assert_eq!(placed.position, WorldPoint::new(-320.0, 0.0));
        assert_eq!(
            store.records(&scope())[1].parent_id.as_deref(),
            Some(root.block.id.as_str())
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_edit_is_optimistic() {
        let store = Rc::new(InMemoryIdeaStore::new());
        let board = board_with(&store);
        let created = board
            .create_block(NewBlock::root(BlockKind::Leaf, WorldPoint::origin()))
            .await
            .unwrap();
        let model = created.apply(&CanvasModel::new()).unwrap();
        let id = created.block.id.clone();
        let patch = IdeaPatch {
            label: "Why?".to_string(),
            content: Some("Because".to_string()),
        };

        store.fail(StoreOp::Update);
        let edited = Board::apply_edit(&model, &id, &patch).unwrap();
        board.persist_edit(id.clone(), patch).await;

        assert_eq!(edited.get(&id).unwrap().label, "Why?");
        assert_eq!(store.records(&scope())[0].label, "New Question");
        assert!(logs_contain("Failed to update idea"));
    }
}
