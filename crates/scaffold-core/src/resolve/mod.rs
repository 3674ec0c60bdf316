//! Pure resolution of a [`Selection`](crate::selection::Selection) into install and
//! registration plans
//!
//! Both resolvers are total: any selection, gated or not, yields a result, and neither
//! performs I/O.

pub mod modules;
pub mod packages;

pub use modules::{resolve_modules, ModuleRegistration, SecondaryStorage, SecurityOptions};
pub use packages::{resolve_packages, PackageSet};
