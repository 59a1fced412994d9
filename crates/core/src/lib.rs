//! Build pipeline for the Delta Functions CLI.
//!
//! Reads the project manifest, runs the project's toolchain with exit codes
//! checked, packages the output as a tar archive, and tracks artifacts in an
//! explicit per-project index.

pub mod archive;
pub mod artifact;
pub mod builder;
pub mod error;
pub mod manifest;
pub mod runner;
pub mod toolchain;

pub use artifact::{artifact_file_name, build_dir, ArtifactIndex, ArtifactRecord};
pub use builder::produce_build;
pub use error::{BuildError, Result};
pub use manifest::read_project_name;
pub use toolchain::Toolchain;
