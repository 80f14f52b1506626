pub mod boundary;

pub use boundary::{validate, ProjectBoundary, SecurityError};
