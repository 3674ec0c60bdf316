//! Feature catalog: what every selectable capability contributes
//!
//! Each feature identifier maps to one static [`FeatureDescriptor`] declaring the packages,
//! Nuxt module ids and configuration fragments it brings. The catalog is wrapped in a
//! [`FeatureTable`] value that is handed to the resolvers explicitly, so alternative tables
//! can be used without touching any global state.

mod catalog;

use crate::selection::{
    AuthChoice, EmailService, NuxtModule, OptionalModule, OrmChoice, Selection, StorageOption,
};
use std::fmt;

pub use catalog::{BASELINE_DEV_DEPENDENCIES, FEATURE_PRIORITY, STANDARD_DESCRIPTORS};

/// Identifier of a selectable capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureId {
    Module(NuxtModule),
    Optional(OptionalModule),
    Storage(StorageOption),
    Orm(OrmChoice),
    Auth(AuthChoice),
    Email(EmailService),
}

impl FeatureId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureId::Module(m) => m.as_str(),
            FeatureId::Optional(m) => m.as_str(),
            FeatureId::Storage(s) => s.as_str(),
            FeatureId::Orm(o) => o.as_str(),
            FeatureId::Auth(a) => a.as_str(),
            FeatureId::Email(e) => e.as_str(),
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration a feature needs beyond a `modules` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigExtra {
    /// Options object under the feature's own top-level key, e.g. `security: { csrf: true }`
    Security {
        key: &'static str,
        options: &'static [(&'static str, &'static str)],
    },
    /// Pre-formatted value for a secondary storage driver under `key`
    SecondaryStorage {
        key: &'static str,
        value: &'static str,
    },
}

/// Static contribution record for one feature
#[derive(Debug, Clone, Copy)]
pub struct FeatureDescriptor {
    pub id: FeatureId,
    /// Package-style name shown in prompts
    pub label: &'static str,
    pub hint: &'static str,
    pub dependencies: &'static [&'static str],
    pub dev_dependencies: &'static [&'static str],
    /// Entries for the `modules` array of `nuxt.config.ts`
    pub modules: &'static [&'static str],
    /// Name passed to `nuxi module add`, which installs the package itself
    pub nuxi_module: Option<&'static str>,
    pub stylesheet: Option<&'static str>,
    pub extra: Option<ConfigExtra>,
}

impl FeatureDescriptor {
    /// A descriptor that contributes nothing but its identity
    pub const fn bare(id: FeatureId, label: &'static str, hint: &'static str) -> Self {
        Self {
            id,
            label,
            hint,
            dependencies: &[],
            dev_dependencies: &[],
            modules: &[],
            nuxi_module: None,
            stylesheet: None,
            extra: None,
        }
    }
}

/// Read-only lookup over a descriptor catalog
#[derive(Debug, Clone, Copy)]
pub struct FeatureTable {
    descriptors: &'static [FeatureDescriptor],
    priority: &'static [FeatureId],
    baseline_dev_dependencies: &'static [&'static str],
}

impl FeatureTable {
    pub const fn new(
        descriptors: &'static [FeatureDescriptor],
        priority: &'static [FeatureId],
        baseline_dev_dependencies: &'static [&'static str],
    ) -> Self {
        Self {
            descriptors,
            priority,
            baseline_dev_dependencies,
        }
    }

    /// The catalog of the Nuxt scaffolder
    pub const fn standard() -> Self {
        Self::new(STANDARD_DESCRIPTORS, FEATURE_PRIORITY, BASELINE_DEV_DEPENDENCIES)
    }

    pub fn get(&self, id: FeatureId) -> Option<&'static FeatureDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn label(&self, id: FeatureId) -> &'static str {
        self.get(id).map(|d| d.label).unwrap_or_else(|| id.as_str())
    }

    pub fn baseline_dev_dependencies(&self) -> &'static [&'static str] {
        self.baseline_dev_dependencies
    }

    /// Descriptors of the active features, in priority order.
    ///
    /// Features without a descriptor contribute nothing and are skipped.
    pub fn active<'s>(
        &self,
        selection: &'s Selection,
    ) -> impl Iterator<Item = &'static FeatureDescriptor> + 's {
        let table = *self;
        let priority = self.priority;
        priority
            .iter()
            .copied()
            .filter(move |id| selection.is_active(*id))
            .filter_map(move |id| table.get(id))
    }
}

impl Default for FeatureTable {
    fn default() -> Self {
        Self::standard()
    }
}
