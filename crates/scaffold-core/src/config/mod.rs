//! `nuxt.config.ts` handling: fragment rendering and the textual merge

mod fragments;
mod merge;
mod syntax;

pub use fragments::{ConfigFragments, PropertyBlock};
pub use merge::{merge, MergeError, MergeReport};

/// The configuration document of a Nuxt project, relative to its root
pub const NUXT_CONFIG_FILE: &str = "nuxt.config.ts";
