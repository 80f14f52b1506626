pub mod error;
pub mod identifiers;
pub mod payload;

pub use error::ContextError;
pub use identifiers::{path_key, ContentDigest};
pub use payload::{ContextPayload, PayloadEntry};
