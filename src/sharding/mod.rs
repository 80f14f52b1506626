//! Resolution of documents split across many files in one directory.

pub mod epics;
pub mod resolver;

pub use epics::{parse_epic_identifier, resolve_epics, EpicShard};
pub use resolver::{list_shard_files, resolve_sharded};
