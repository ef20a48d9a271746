use std::fmt;
use std::str::FromStr;

use blocks::block::ContentTag;
use blocks::mock::{DB_BLOCKS, default_blocks};
use blocks::parser::Parser;
use blocks::{Block, BlockId};
use tracing::{debug, warn};

use crate::element::UiElement;
use crate::error::ActionError;
use crate::ids::IdGenerator;
use crate::render::render;
use crate::store::BlockStore;

/// Text of a block created by [`PageSession::add`].
pub const NEW_BLOCK_TEXT: &str = "Woot a new one boi";
/// Class list of a block created by [`PageSession::add`].
pub const NEW_BLOCK_CLASS: &str = "bg-blue-100";

/// A user-triggerable page action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append a default paragraph block.
    Add,
    /// Append every block of the import payload.
    Import,
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Action::Add),
            "import" => Ok(Action::Import),
            _ => Err(ActionError::UnknownAction(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Add => f.write_str("add"),
            Action::Import => f.write_str("import"),
        }
    }
}

/// The page being built: a block store, an id source and the import payload.
///
/// Both actions only ever append to the end of the root sequence.
pub struct PageSession {
    store: BlockStore,
    ids: Box<dyn IdGenerator>,
    import_payload: String,
    /// Source file ID of the import payload (for error reporting with codespan-reporting).
    import_file_id: usize,
}

impl PageSession {
    pub fn new(store: BlockStore, ids: Box<dyn IdGenerator>) -> Self {
        PageSession {
            store,
            ids,
            import_payload: DB_BLOCKS.to_string(),
            import_file_id: 0,
        }
    }

    /// A session starting from the default page.
    pub fn with_defaults(ids: Box<dyn IdGenerator>) -> Self {
        Self::new(BlockStore::new(default_blocks()), ids)
    }

    /// Import from `payload` instead of the mock database.
    pub fn with_import_payload(mut self, payload: impl Into<String>, file_id: usize) -> Self {
        self.import_payload = payload.into();
        self.import_file_id = file_id;
        self
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut BlockStore {
        &mut self.store
    }

    pub fn blocks(&self) -> &[Block] {
        self.store.read()
    }

    /// Append a new paragraph block and return its id.
    pub fn add(&mut self) -> BlockId {
        let id = self.ids.new_id();
        let block = Block::content(
            id.clone(),
            ContentTag::Paragraph,
            vec![NEW_BLOCK_CLASS.to_string()],
            NEW_BLOCK_TEXT,
        );

        let mut next = self.store.read().to_vec();
        next.push(block);
        self.store.replace(next);

        debug!(%id, roots = self.store.len(), "added block");
        id
    }

    /// Parse the import payload and append its blocks in order.
    /// Returns the number of root blocks appended.
    ///
    /// A payload that does not parse aborts the import; the store is not touched.
    pub fn import(&mut self) -> Result<usize, ActionError> {
        let payload = Parser::new(self.import_payload.clone(), self.import_file_id)
            .parse()
            .map_err(|errors| {
                warn!(errors = errors.len(), "import aborted");
                ActionError::MalformedImportPayload(errors)
            })?;

        let imported = payload.blocks.len();
        let mut next = self.store.read().to_vec();
        next.extend(payload.blocks);
        self.store.replace(next);

        debug!(imported, roots = self.store.len(), "imported blocks");
        Ok(imported)
    }

    pub fn apply(&mut self, action: Action) -> Result<(), ActionError> {
        match action {
            Action::Add => {
                self.add();
            }
            Action::Import => {
                self.import()?;
            }
        }
        Ok(())
    }

    /// Render the current state.
    pub fn view(&self) -> Vec<UiElement> {
        render(self.store.read())
    }
}

impl fmt::Debug for PageSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSession")
            .field("store", &self.store)
            .field("import_file_id", &self.import_file_id)
            .finish_non_exhaustive()
    }
}
