//! Model artifacts and fallback scoring

pub mod artifact;
pub mod fallback;

pub use artifact::{artifact_path, ModelArtifact};
