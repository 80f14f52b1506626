pub mod assembler;
pub mod priority;

pub use assembler::ContextAssembler;
pub use priority::{PriorityEntry, Section};
