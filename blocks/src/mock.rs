//! Fixed block data: the simulated database payload and the initial page.

use crate::block::{Block, ContainerTag, ContentTag};

/// Serialized blocks standing in for a database import.
///
/// The child ids repeat ids from [`default_blocks`]. Id uniqueness is left to
/// whoever builds the tree, so importing next to the defaults yields duplicates.
pub const DB_BLOCKS: &str = r#"[
  {
    "id": "newwwww",
    "type": "div",
    "classList": ["bg-green-400"],
    "children": [
      {
        "id": "342423",
        "type": "p",
        "data": "Database stuff",
        "classList": []
      },
      {
        "id": "1112222",
        "type": "p",
        "data": "Air horn",
        "classList": ["text-lg", "font-bold"]
      }
    ]
  }
]
"#;

/// The root sequence a new page starts with.
pub fn default_blocks() -> Vec<Block> {
    vec![Block::container(
        "1018493",
        ContainerTag::Div,
        vec!["bg-red-400".to_string()],
        vec![
            Block::content("342423", ContentTag::Paragraph, Vec::new(), "This is a test"),
            Block::content(
                "1112222",
                ContentTag::Paragraph,
                Vec::new(),
                "This is another paragraph yo",
            ),
        ],
    )]
}
