//! Scaffold Core - shared library for the Nuxt project scaffolder
//!
//! Turns a validated [`Selection`] of features into a ready-to-run Nuxt project: it resolves
//! packages and module registrations from a static feature catalog, runs the initializer and
//! package manager, writes per-feature files, merges `nuxt.config.ts` and generates tests and
//! CI scaffolding.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Pure core** - selection model, feature catalog, package/module resolvers and
//!   the config merger. No I/O, never fails.
//! - **Layer 2: Collaborators and orchestration** - command runner, package installer, project
//!   file access, per-feature setup, and the [`Orchestrator`] that sequences the stages and
//!   reduces them to a [`ScaffoldReport`].
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffold_core::{resolve_packages, FeatureTable, NuxtModule, Selection};
//!
//! let selection = Selection::builder("shop", std::env::current_dir()?)
//!     .modules([NuxtModule::NuxtUi, NuxtModule::Pinia])
//!     .build()?;
//! let packages = resolve_packages(&selection, &FeatureTable::standard());
//! ```

pub mod auxiliary;
pub mod config;
pub mod error;
pub mod features;
pub mod fs;
pub mod logger;
pub mod orchestrator;
pub mod product;
pub mod report;
pub mod resolve;
pub mod runtime;
pub mod selection;
pub mod setup;

mod yaml;

#[cfg(test)]
mod testing;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{merge, ConfigFragments, MergeError, MergeReport};
pub use error::ScaffoldError;
pub use features::{FeatureDescriptor, FeatureId, FeatureTable};
pub use logger::{ConsoleLogger, Logger};
pub use orchestrator::{Confirmation, Orchestrator, RunResult};
pub use product::ProductConfig;
pub use report::{Outcome, ScaffoldReport, Stage, StageOutcome, StageReport};
pub use resolve::{resolve_modules, resolve_packages, ModuleRegistration, PackageSet};
pub use runtime::{CommandOutput, CommandRunner, RunOptions, RuntimeInfo, ShellRunner};
pub use selection::{
    AuthChoice, EmailService, NuxtModule, OptionalModule, OrmChoice, ProjectTarget, Selection,
    SelectionError, StorageOption,
};

#[cfg(feature = "tui")]
pub use tui::run;
