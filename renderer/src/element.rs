use std::collections::BTreeMap;
use std::fmt;

/// Joined class list.
pub const CLASS_NAME: &str = "className";
/// Identity hint for the host framework's diffing. Not written to HTML.
pub const KEY: &str = "key";
/// Block id exposed for tooling and test hooks.
pub const BLOCK_ID: &str = "data-block-id";

/// Element properties, keyed by property name.
pub type Props = BTreeMap<&'static str, String>;

/// A UI element descriptor produced by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiElement {
    pub tag: &'static str,
    pub props: Props,
    pub body: ElementBody,
}

/// An element holds either nested elements or a text payload, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementBody {
    Children(Vec<UiElement>),
    Text(String),
}

impl UiElement {
    pub fn class_name(&self) -> &str {
        self.props.get(CLASS_NAME).map(String::as_str).unwrap_or("")
    }

    pub fn block_id(&self) -> Option<&str> {
        self.props.get(BLOCK_ID).map(String::as_str)
    }

    pub fn children(&self) -> &[UiElement] {
        match &self.body {
            ElementBody::Children(children) => children,
            ElementBody::Text(_) => &[],
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ElementBody::Children(_) => None,
            ElementBody::Text(text) => Some(text),
        }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{}{}", "  ".repeat(indent), self.tag)?;
        for class in self.class_name().split_whitespace() {
            write!(f, ".{}", class)?;
        }
        if let Some(id) = self.block_id() {
            write!(f, " #{}", id)?;
        }
        match &self.body {
            ElementBody::Text(text) => writeln!(f, " {:?}", text),
            ElementBody::Children(children) => {
                writeln!(f)?;
                for child in children {
                    child.write_outline(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// One line per element, children indented under their parent:
///
/// ```text
/// div.bg-red-400 #1018493
///   p #342423 "This is a test"
/// ```
impl fmt::Display for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}
