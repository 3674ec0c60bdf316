//! Insertable snippets derived from a [`ModuleRegistration`]

use crate::resolve::ModuleRegistration;

/// A named top-level property, with its value already rendered as source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBlock {
    pub key: String,
    pub value: String,
}

/// What the merger injects into `nuxt.config.ts`
///
/// `blocks` are applied in order: the security options first, then secondary storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFragments {
    pub modules: Vec<String>,
    pub stylesheets: Vec<String>,
    pub blocks: Vec<PropertyBlock>,
}

impl ConfigFragments {
    pub fn from_registration(registration: &ModuleRegistration) -> Self {
        let mut blocks = Vec::new();
        if let Some(security) = &registration.security_options {
            blocks.push(PropertyBlock {
                key: security.key.clone(),
                value: render_object(&security.options),
            });
        }
        if let Some(storage) = &registration.secondary_storage {
            blocks.push(PropertyBlock {
                key: storage.key.clone(),
                value: storage.value.clone(),
            });
        }

        Self {
            modules: registration.module_ids.clone(),
            stylesheets: registration.stylesheets.clone(),
            blocks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.stylesheets.is_empty() && self.blocks.is_empty()
    }
}

fn render_object(options: &[(String, String)]) -> String {
    let mut out = String::from("{\n");
    for (key, value) in options {
        out.push_str(&format!("  {key}: {value},\n"));
    }
    out.push('}');
    out
}
