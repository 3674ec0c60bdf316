//! Process-level collaborators
//!
//! This module provides:
//! - Command execution with errors as values (`command`)
//! - Bun command lines and package installation (`package_manager`)
//! - Bun detection and installation (`check`, `tool`)

pub mod check;
pub mod command;
pub mod package_manager;
pub mod tool;

pub use check::{check_bun, RuntimeInfo, BUN_INSTALL_URL, MIN_BUN_VERSION};
pub use command::{BatchOutcome, CommandOutput, CommandRunner, RunOptions, ShellRunner};
pub use package_manager::{InstallOptions, PackageInstaller};
pub use tool::{bun_tool, ToolManager};
