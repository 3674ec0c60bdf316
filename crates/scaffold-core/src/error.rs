//! Fatal scaffolding errors

use std::path::PathBuf;
use thiserror::Error;

/// A failure that stops the run
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Directory {} already exists", .0.display())]
    DirectoryExists(PathBuf),

    #[error("{runtime} is required but was not found (install it from {install_url})")]
    RuntimeMissing {
        runtime: &'static str,
        install_url: &'static str,
    },

    #[error("Project initialization failed: {0}")]
    InitFailed(String),

    #[error("Dependency installation failed: {0}")]
    InstallFailed(String),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
