//! Package resolution: selection -> deduplicated dependency lists

use crate::features::FeatureTable;
use crate::selection::Selection;
use std::collections::HashSet;

/// Packages to install, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSet {
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

impl PackageSet {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len() + self.dev_dependencies.len()
    }
}

/// Collect the packages of every active feature plus the baseline tooling
pub fn resolve_packages(selection: &Selection, table: &FeatureTable) -> PackageSet {
    let mut dependencies = Vec::new();
    let mut dev_dependencies = Vec::new();

    for descriptor in table.active(selection) {
        dependencies.extend(descriptor.dependencies.iter().copied());
        dev_dependencies.extend(descriptor.dev_dependencies.iter().copied());
    }
    dev_dependencies.extend(table.baseline_dev_dependencies().iter().copied());

    PackageSet {
        dependencies: dedup_preserving_order(dependencies),
        dev_dependencies: dedup_preserving_order(dev_dependencies),
    }
}

fn dedup_preserving_order<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::BASELINE_DEV_DEPENDENCIES;
    use crate::selection::{
        AuthChoice, EmailService, NuxtModule, OptionalModule, OrmChoice, StorageOption,
    };
    use proptest::prelude::*;

    fn baseline() -> Vec<String> {
        BASELINE_DEV_DEPENDENCIES.iter().map(|s| s.to_string()).collect()
    }

    fn resolve(selection: &Selection) -> PackageSet {
        resolve_packages(selection, &FeatureTable::standard())
    }

    #[test]
    fn test_empty_selection_yields_baseline_only() {
        let selection = Selection::builder("app", "/tmp").build().unwrap();
        let packages = resolve(&selection);

        assert!(packages.dependencies.is_empty());
        assert_eq!(packages.dev_dependencies, baseline());
    }

    #[test]
    fn test_single_module_contributes_its_dependency() {
        let selection = Selection::builder("app", "/tmp")
            .modules([NuxtModule::NuxtUi])
            .build()
            .unwrap();
        let packages = resolve(&selection);

        assert_eq!(packages.dependencies, vec!["@nuxt/ui"]);
        assert_eq!(packages.dev_dependencies, baseline());
    }

    #[test]
    fn test_nuxi_modules_contribute_no_packages() {
        let selection = Selection::builder("app", "/tmp")
            .modules([NuxtModule::Eslint, NuxtModule::Seo])
            .optional_modules([OptionalModule::Image])
            .build()
            .unwrap();
        let packages = resolve(&selection);

        assert!(packages.dependencies.is_empty());
    }

    #[test]
    fn test_orm_cli_follows_orm_choice() {
        let with_drizzle = Selection::builder("app", "/tmp")
            .storage([StorageOption::Postgres])
            .orm(OrmChoice::Drizzle)
            .build()
            .unwrap();
        let packages = resolve(&with_drizzle);
        assert!(packages.dev_dependencies.contains(&"drizzle-kit".to_string()));
        assert!(packages.dependencies.contains(&"drizzle-orm".to_string()));

        let without_orm = Selection::builder("app", "/tmp")
            .storage([StorageOption::Postgres])
            .orm(OrmChoice::None)
            .build()
            .unwrap();
        let packages = resolve(&without_orm);
        assert!(!packages.dev_dependencies.contains(&"drizzle-kit".to_string()));
        assert!(!packages.dev_dependencies.contains(&"prisma".to_string()));
    }

    #[test]
    fn test_shared_storage_packages_appear_once() {
        let selection = Selection::builder("app", "/tmp")
            .storage(StorageOption::ALL)
            .build()
            .unwrap();
        let packages = resolve(&selection);

        assert_eq!(packages.dependencies, vec!["zod"]);
        let dotenv = packages
            .dev_dependencies
            .iter()
            .filter(|p| *p == "dotenv-cli")
            .count();
        assert_eq!(dotenv, 1);
        assert_eq!(packages.dev_dependencies[0], "dotenv-cli");
    }

    #[test]
    fn test_email_service_requires_auth() {
        let mut selection = Selection::builder("app", "/tmp")
            .auth(AuthChoice::BetterAuth)
            .email_service(EmailService::Nodemailer)
            .build()
            .unwrap();
        let packages = resolve(&selection);
        assert_eq!(packages.dependencies, vec!["better-auth", "nodemailer"]);
        assert!(packages.dev_dependencies.contains(&"@types/nodemailer".to_string()));

        selection.auth = AuthChoice::None;
        let packages = resolve(&selection);
        assert!(packages.dependencies.is_empty());
        assert!(!packages.dev_dependencies.contains(&"@types/nodemailer".to_string()));
    }

    fn selection_strategy() -> impl Strategy<Value = Selection> {
        (
            proptest::sample::subsequence(NuxtModule::ALL.to_vec(), 0..=NuxtModule::ALL.len()),
            proptest::sample::subsequence(OptionalModule::ALL.to_vec(), 0..=2),
            proptest::sample::subsequence(StorageOption::ALL.to_vec(), 0..=5),
            proptest::sample::select(OrmChoice::ALL.to_vec()),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(modules, optional, storage, orm, auth, email)| Selection {
                project_name: "app".to_string(),
                project_path: "/tmp/app".into(),
                target: crate::selection::ProjectTarget::NewDirectory,
                modules,
                optional_modules: optional,
                storage,
                orm,
                auth: if auth { AuthChoice::BetterAuth } else { AuthChoice::None },
                email_service: if email {
                    EmailService::Nodemailer
                } else {
                    EmailService::None
                },
                dry_run: false,
            })
    }

    proptest! {
        #[test]
        fn resolved_packages_have_no_duplicates(selection in selection_strategy()) {
            let packages = resolve(&selection);
            let deps: HashSet<_> = packages.dependencies.iter().collect();
            let dev: HashSet<_> = packages.dev_dependencies.iter().collect();
            prop_assert_eq!(deps.len(), packages.dependencies.len());
            prop_assert_eq!(dev.len(), packages.dev_dependencies.len());
        }

        #[test]
        fn resolution_is_deterministic(selection in selection_strategy()) {
            prop_assert_eq!(resolve(&selection), resolve(&selection));
        }

        #[test]
        fn orm_packages_need_postgres(mut selection in selection_strategy()) {
            selection.storage.retain(|s| *s != StorageOption::Postgres);
            let packages = resolve(&selection);
            for orm_package in ["drizzle-orm", "drizzle-kit", "drizzle-zod", "drizzle-seed", "@prisma/client", "prisma"] {
                prop_assert!(!packages.dependencies.iter().any(|p| p == orm_package));
                prop_assert!(!packages.dev_dependencies.iter().any(|p| p == orm_package));
            }
        }

        #[test]
        fn baseline_is_always_present(selection in selection_strategy()) {
            let packages = resolve(&selection);
            for tool in BASELINE_DEV_DEPENDENCIES {
                prop_assert!(packages.dev_dependencies.iter().any(|p| p == tool));
            }
        }
    }
}
