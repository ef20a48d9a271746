use std::fmt;

use blocks::Block;
use tracing::debug;

type Subscriber = Box<dyn FnMut(&[Block])>;

/// Holds the root block sequence and notifies subscribers on every change.
pub struct BlockStore {
    blocks: Vec<Block>,
    subscribers: Vec<Subscriber>,
    /// Number of `replace` calls so far.
    revision: u64,
}

impl BlockStore {
    pub fn new(initial: Vec<Block>) -> Self {
        BlockStore {
            blocks: initial,
            subscribers: Vec::new(),
            revision: 0,
        }
    }

    pub fn read(&self) -> &[Block] {
        &self.blocks
    }

    /// Swap in a new root sequence, then notify subscribers in subscription order.
    pub fn replace(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.revision += 1;
        debug!(
            revision = self.revision,
            roots = self.blocks.len(),
            "block store replaced"
        );
        for subscriber in &mut self.subscribers {
            subscriber(&self.blocks);
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&[Block]) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl fmt::Debug for BlockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockStore")
            .field("blocks", &self.blocks)
            .field("subscribers", &self.subscribers.len())
            .field("revision", &self.revision)
            .finish()
    }
}
