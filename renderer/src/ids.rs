use blocks::BlockId;
use uuid::Uuid;

/// Source of fresh block ids. Ids must never repeat within a process.
pub trait IdGenerator {
    fn new_id(&mut self) -> BlockId;
}

/// Random ids, used when blocks are added interactively.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&mut self) -> BlockId {
        BlockId::new(Uuid::new_v4().simple().to_string())
    }
}

/// Predictable ids (`prefix0`, `prefix1`, ...) for scenarios and tests.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&mut self) -> BlockId {
        let id = BlockId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
