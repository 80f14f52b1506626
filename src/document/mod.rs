pub mod document;
pub mod loader;

pub use crate::types::identifiers::ContentDigest;
pub use document::{DocumentError, DocumentReference};
pub use loader::{load_document, load_documents};
