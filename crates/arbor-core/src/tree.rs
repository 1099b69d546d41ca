//! Block tree model.
//!
//! Blocks are branches (mission statements) or leaves (questions with an
//! optional answer). The tree is the canonical store: blocks reference their
//! children by id, roots are listed in order, and the flat list of rendered
//! items is derived from it. Structural changes go through
//! [`CanvasModel::reduce`], which returns the next model and leaves the current
//! one untouched.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{TreeError, ValueError};
use crate::store::IdeaRecord;
use crate::viewport::WorldPoint;

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Non-empty, unique identifier of a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockId(String);

impl BlockId {
    /// Creates a block id.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::EmptyId`] for an empty or whitespace-only id.
    pub fn new(id: impl Into<String>) -> std::result::Result<Self, ValueError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValueError::EmptyId);
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlockId {
    type Error = ValueError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlockId> for String {
    fn from(id: BlockId) -> Self {
        id.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Branch,
    #[default]
    Leaf,
}

impl BlockKind {
    /// Label given to a freshly created block.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::Branch => "New Branch",
            Self::Leaf => "New Question",
        }
    }

    /// Name of the content line in exports.
    #[must_use]
    pub const fn content_label(self) -> &'static str {
        match self {
            Self::Branch => "Mission",
            Self::Leaf => "Answer",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch => f.write_str("Branch"),
            Self::Leaf => f.write_str("Leaf"),
        }
    }
}

/// Side of the parent a child was expanded toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// World offset for a child placed `spacing` units away. Up is negative y.
    #[must_use]
    pub const fn offset(self, spacing: f64) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -spacing),
            Self::Down => (0.0, spacing),
            Self::Left => (-spacing, 0.0),
            Self::Right => (spacing, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    pub label: String,
    pub content: Option<String>,
    pub parent_id: Option<BlockId>,
    pub children: Vec<BlockId>,
    pub direction_from_parent: Option<Direction>,
    pub position: WorldPoint,
}

impl CanvasBlock {
    /// Creates a childless root block.
    #[must_use]
    pub fn new(id: BlockId, kind: BlockKind, label: impl Into<String>, position: WorldPoint) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            content: None,
            parent_id: None,
            children: Vec::new(),
            direction_from_parent: None,
            position,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    fn content_text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// Flat, read-only projection of a block for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: BlockId,
    pub kind: BlockKind,
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub content: Option<String>,
}

/// Structural change applied by [`CanvasModel::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum BlockAction {
    /// Add a new block as the last root. Parent links on it are dropped.
    InsertRoot(CanvasBlock),
    /// Move an existing block under `parent`.
    AttachChild {
        parent: BlockId,
        child: BlockId,
        direction: Option<Direction>,
    },
    Edit {
        id: BlockId,
        label: String,
        content: Option<String>,
    },
    Move {
        id: BlockId,
        position: WorldPoint,
    },
    Replace(CanvasModel),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasModel {
    blocks: HashMap<BlockId, CanvasBlock>,
    root_ids: Vec<BlockId>,
}

impl CanvasModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from raw parts without checking invariants.
    ///
    /// Readers of the model tolerate dangling ids and cycles.
    #[must_use]
    pub const fn from_parts(blocks: HashMap<BlockId, CanvasBlock>, root_ids: Vec<BlockId>) -> Self {
        Self { blocks, root_ids }
    }

    #[must_use]
    pub const fn blocks(&self) -> &HashMap<BlockId, CanvasBlock> {
        &self.blocks
    }

    #[must_use]
    pub fn root_ids(&self) -> &[BlockId] {
        &self.root_ids
    }

    #[must_use]
    pub fn get(&self, id: &BlockId) -> Option<&CanvasBlock> {
        self.blocks.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Applies `action` and returns the resulting model.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] when the action references an unknown block,
    /// inserts a duplicate id, or would make a block its own ancestor. The
    /// current model is never modified.
    pub fn reduce(&self, action: BlockAction) -> Result<Self> {
        match action {
            BlockAction::Replace(next) => Ok(next),
            BlockAction::InsertRoot(mut block) => {
                if self.contains(&block.id) {
                    return Err(TreeError::DuplicateBlock(block.id.to_string()));
                }
                block.parent_id = None;
                block.direction_from_parent = None;
                block.children.clear();

                let mut next = self.clone();
                next.root_ids.push(block.id.clone());
                next.blocks.insert(block.id.clone(), block);
                Ok(next)
            }
            BlockAction::AttachChild {
                parent,
                child,
                direction,
            } => {
                let mut next = self.clone();
                next.attach(&parent, &child, direction)?;
                Ok(next)
            }
            BlockAction::Edit { id, label, content } => {
                let mut next = self.clone();
                let block = next
                    .blocks
                    .get_mut(&id)
                    .ok_or_else(|| TreeError::UnknownBlock(id.to_string()))?;
                block.label = label;
                block.content = content;
                Ok(next)
            }
            BlockAction::Move { id, position } => {
                let mut next = self.clone();
                let block = next
                    .blocks
                    .get_mut(&id)
                    .ok_or_else(|| TreeError::UnknownBlock(id.to_string()))?;
                block.position = position;
                Ok(next)
            }
        }
    }

    /// Whether `ancestor` lies on the parent chain of `id` (or is `id`).
    #[must_use]
    pub fn is_ancestor(&self, ancestor: &BlockId, id: &BlockId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(cursor) = current {
            if cursor == ancestor {
                return true;
            }
            if !seen.insert(cursor) {
                return false;
            }
            current = self.blocks.get(cursor).and_then(|b| b.parent_id.as_ref());
        }
        false
    }

    fn attach(&mut self, parent: &BlockId, child: &BlockId, direction: Option<Direction>) -> Result<()> {
        if !self.contains(parent) {
            return Err(TreeError::UnknownBlock(parent.to_string()));
        }
        if !self.contains(child) {
            return Err(TreeError::UnknownBlock(child.to_string()));
        }
        if parent == child {
            return Err(TreeError::SelfParent(child.to_string()));
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        let old_parent = self
            .blocks
            .get(child)
            .and_then(|b| b.parent_id.clone());
        match old_parent {
            Some(old) => {
                if let Some(block) = self.blocks.get_mut(&old) {
                    block.children.retain(|c| c != child);
                }
            }
            None => self.root_ids.retain(|r| r != child),
        }

        if let Some(block) = self.blocks.get_mut(parent) {
            block.children.push(child.clone());
        }
        if let Some(block) = self.blocks.get_mut(child) {
            block.parent_id = Some(parent.clone());
            block.direction_from_parent = direction;
        }
        Ok(())
    }

    /// Rebuilds a model from persisted records.
    ///
    /// Records with an empty or repeated id are skipped. A record naming a
    /// known parent is attached under it in record order unless that would
    /// form a cycle, in which case it stays a root.
    #[must_use]
    pub fn from_records(records: &[IdeaRecord]) -> Self {
        let mut model = Self::new();
        let mut links = Vec::new();

        for record in records {
            let Ok(id) = BlockId::new(record.id.clone()) else {
                warn!("Skipping idea record with empty id");
                continue;
            };
            if model.contains(&id) {
                warn!(block_id = %id, "Skipping duplicate idea record");
                continue;
            }
            let mut block = CanvasBlock::new(
                id.clone(),
                record.kind.unwrap_or_default(),
                record.label.clone(),
                WorldPoint::new(record.x, record.y),
            );
            block.content = record.content.clone();
            model.root_ids.push(id.clone());
            model.blocks.insert(id.clone(), block);

            if let Some(parent) = record.parent_id.as_deref().and_then(|p| BlockId::new(p).ok()) {
                links.push((parent, id, record.direction));
            }
        }

        for (parent, child, direction) in links {
            if let Err(error) = model.attach(&parent, &child, direction) {
                debug!(block_id = %child, %error, "Keeping record as root");
            }
        }
        model
    }

    /// Blocks in pre-order from the roots, each visited once.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.walk()
            .into_iter()
            .map(|(block, _)| Item {
                id: block.id.clone(),
                kind: block.kind,
                x: block.position.x,
                y: block.position.y,
                label: block.label.clone(),
                content: block.content.clone(),
            })
            .collect()
    }

    /// Adds the blocks of `local` that this model does not have.
    ///
    /// Missing blocks are taken in pre-order and attached under their parent
    /// when the parent is present, otherwise they become roots. Blocks already
    /// in this model keep this model's version.
    #[must_use]
    pub fn merge_missing(&self, local: &Self) -> Self {
        let mut next = self.clone();
        for (block, _) in local.walk() {
            if next.contains(&block.id) {
                continue;
            }
            let mut added = block.clone();
            let parent = added.parent_id.take();
            let direction = added.direction_from_parent.take();
            added.children.clear();
            next.root_ids.push(added.id.clone());
            next.blocks.insert(added.id.clone(), added);

            if let Some(parent) = parent {
                if let Err(error) = next.attach(&parent, &block.id, direction) {
                    debug!(block_id = %block.id, %error, "Merged block kept as root");
                }
            }
        }
        next
    }

    /// Plain-text outline of the tree. See [`traverse_export`].
    #[must_use]
    pub fn export(&self) -> String {
        traverse_export(self)
    }

    fn walk(&self) -> Vec<(&CanvasBlock, usize)> {
        let mut visited: HashSet<&BlockId> = HashSet::new();
        let mut order = Vec::with_capacity(self.blocks.len());
        let mut stack: Vec<(&BlockId, usize)> = self.root_ids.iter().rev().map(|id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(block) = self.blocks.get(id) else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            order.push((block, depth));
            stack.extend(block.children.iter().rev().map(|child| (child, depth + 1)));
        }
        order
    }
}

/// Renders the tree as an indented outline.
///
/// Each block emits `Branch: <label>` or `Leaf: <label>` indented two spaces
/// per depth, followed by a `Mission:` or `Answer:` line two spaces deeper when
/// it has content. Missing ids are skipped and a block reached twice is only
/// emitted the first time. Lines are joined by `\n` with no trailing newline.
///
/// # Examples
///
/// ```
/// use arbor_core::tree::{BlockAction, BlockId, BlockKind, CanvasBlock, CanvasModel, traverse_export};
/// use arbor_core::viewport::WorldPoint;
///
/// let root = BlockId::new("a")?;
/// let model = CanvasModel::new()
///     .reduce(BlockAction::InsertRoot(CanvasBlock::new(
///         root,
///         BlockKind::Branch,
///         "Root",
///         WorldPoint::origin(),
///     )))?;
/// assert_eq!(traverse_export(&model), "Branch: Root");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn traverse_export(model: &CanvasModel) -> String {
    let mut lines = Vec::new();
    for (block, depth) in model.walk() {
        let indent = "  ".repeat(depth);
        lines.push(format!("{indent}{}: {}", block.kind, block.label));
        if let Some(content) = block.content_text() {
            lines.push(format!("{indent}  {}: {content}", block.kind.content_label()));
        }
    }
    lines.join("\n")
}
