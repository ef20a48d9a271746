pub mod tag;

use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

pub use crate::block::tag::{BlockTag, ContainerTag, ContentTag};

/// Opaque block identifier. Assigned once at creation and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        BlockId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        BlockId(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        BlockId(id)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node of the page tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    /// Style tags, in order. Joined with single spaces when rendered.
    pub class_list: Vec<String>,
    pub kind: BlockKind,
}

/// The variant of a block: either it holds children or it holds text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Container {
        tag: ContainerTag,
        children: Vec<Block>,
    },
    Content {
        tag: ContentTag,
        data: String,
    },
}

impl Block {
    pub fn container(
        id: impl Into<BlockId>,
        tag: ContainerTag,
        class_list: Vec<String>,
        children: Vec<Block>,
    ) -> Self {
        Block {
            id: id.into(),
            class_list,
            kind: BlockKind::Container { tag, children },
        }
    }

    pub fn content(
        id: impl Into<BlockId>,
        tag: ContentTag,
        class_list: Vec<String>,
        data: impl Into<String>,
    ) -> Self {
        Block {
            id: id.into(),
            class_list,
            kind: BlockKind::Content {
                tag,
                data: data.into(),
            },
        }
    }

    pub fn tag(&self) -> BlockTag {
        match &self.kind {
            BlockKind::Container { tag, .. } => BlockTag::Container(*tag),
            BlockKind::Content { tag, .. } => BlockTag::Content(*tag),
        }
    }

    pub fn tag_name(&self) -> &'static str {
        self.tag().as_str()
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, BlockKind::Container { .. })
    }

    /// Child blocks. Always empty for content blocks.
    pub fn children(&self) -> &[Block] {
        match &self.kind {
            BlockKind::Container { children, .. } => children,
            BlockKind::Content { .. } => &[],
        }
    }

    pub fn data(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Container { .. } => None,
            BlockKind::Content { data, .. } => Some(data),
        }
    }

    /// The class list joined by single spaces; empty when there are no classes.
    pub fn class_name(&self) -> String {
        self.class_list.join(" ")
    }

    /// Visit this block and its descendants depth-first, pre-order.
    /// The callback receives each block along with its depth (0 for `self`).
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&Block, usize),
    {
        self.walk_at(0, visit);
    }

    fn walk_at<F>(&self, depth: usize, visit: &mut F)
    where
        F: FnMut(&Block, usize),
    {
        visit(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Number of levels in this subtree. A lone block has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Block::depth).max().unwrap_or(0)
    }
}

/// Total number of blocks in a forest, descendants included.
pub fn count(blocks: &[Block]) -> usize {
    let mut total = 0;
    for block in blocks {
        block.walk(&mut |_, _| total += 1);
    }
    total
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", self.tag_name())?;
        map.serialize_entry("classList", &self.class_list)?;
        match &self.kind {
            BlockKind::Container { children, .. } => map.serialize_entry("children", children)?,
            BlockKind::Content { data, .. } => map.serialize_entry("data", data)?,
        }
        map.end()
    }
}
