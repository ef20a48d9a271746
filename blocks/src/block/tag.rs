use std::fmt;
use std::str::FromStr;

use crate::error::BlockError;

/// Tags of blocks that hold child blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerTag {
    Div,
    Section,
}

impl ContainerTag {
    pub const ALL: [ContainerTag; 2] = [ContainerTag::Div, ContainerTag::Section];

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerTag::Div => "div",
            ContainerTag::Section => "section",
        }
    }
}

/// Tags of blocks that carry a text payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTag {
    Paragraph,
    Heading1,
    Heading2,
    Image,
}

impl ContentTag {
    pub const ALL: [ContentTag; 4] = [
        ContentTag::Paragraph,
        ContentTag::Heading1,
        ContentTag::Heading2,
        ContentTag::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentTag::Paragraph => "p",
            ContentTag::Heading1 => "h1",
            ContentTag::Heading2 => "h2",
            ContentTag::Image => "img",
        }
    }
}

/// A tag from either closed set. Which set a tag string falls into decides
/// the block variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Container(ContainerTag),
    Content(ContentTag),
}

impl BlockTag {
    /// Classify a raw `type` string by set membership.
    pub fn classify(tag: &str) -> Result<Self, BlockError> {
        if let Some(container) = ContainerTag::ALL.iter().find(|t| t.as_str() == tag) {
            return Ok(BlockTag::Container(*container));
        }
        if let Some(content) = ContentTag::ALL.iter().find(|t| t.as_str() == tag) {
            return Ok(BlockTag::Content(*content));
        }
        Err(BlockError::UnknownBlockType {
            tag: tag.to_string(),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockTag::Container(tag) => tag.as_str(),
            BlockTag::Content(tag) => tag.as_str(),
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, BlockTag::Container(_))
    }
}

impl FromStr for BlockTag {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockTag::classify(s)
    }
}

impl FromStr for ContainerTag {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match BlockTag::classify(s)? {
            BlockTag::Container(tag) => Ok(tag),
            BlockTag::Content(tag) => Err(BlockError::MalformedShape(format!(
                "`{}` is a content tag, expected a container tag",
                tag
            ))),
        }
    }
}

impl FromStr for ContentTag {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match BlockTag::classify(s)? {
            BlockTag::Content(tag) => Ok(tag),
            BlockTag::Container(tag) => Err(BlockError::MalformedShape(format!(
                "`{}` is a container tag, expected a content tag",
                tag
            ))),
        }
    }
}

impl fmt::Display for ContainerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ContentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
