//! Module registration resolution: selection -> what `nuxt.config.ts` must contain

use crate::features::{ConfigExtra, FeatureTable};
use crate::selection::Selection;

/// Options object for a security module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityOptions {
    pub key: String,
    pub options: Vec<(String, String)>,
}

/// Secondary storage configuration, kept as pre-formatted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryStorage {
    pub key: String,
    pub value: String,
}

/// Everything the configuration document needs for the current selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistration {
    pub module_ids: Vec<String>,
    pub stylesheets: Vec<String>,
    pub security_options: Option<SecurityOptions>,
    pub secondary_storage: Option<SecondaryStorage>,
}

impl ModuleRegistration {
    pub fn is_empty(&self) -> bool {
        self.module_ids.is_empty()
            && self.stylesheets.is_empty()
            && self.security_options.is_none()
            && self.secondary_storage.is_none()
    }
}

/// Compute module ids and config fragments in catalog priority order
pub fn resolve_modules(selection: &Selection, table: &FeatureTable) -> ModuleRegistration {
    let mut registration = ModuleRegistration::default();

    for descriptor in table.active(selection) {
        for module in descriptor.modules {
            push_unique(&mut registration.module_ids, module);
        }
        if let Some(stylesheet) = descriptor.stylesheet {
            push_unique(&mut registration.stylesheets, stylesheet);
        }
        match descriptor.extra {
            Some(ConfigExtra::Security { key, options }) => {
                registration.security_options = Some(SecurityOptions {
                    key: key.to_string(),
                    options: options
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                });
            }
            Some(ConfigExtra::SecondaryStorage { key, value }) => {
                registration.secondary_storage = Some(SecondaryStorage {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            None => {}
        }
    }

    registration
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
