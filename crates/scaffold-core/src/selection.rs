//! Selection model: the typed choices a scaffold run is built from
//!
//! A [`Selection`] is built once from user input through [`SelectionBuilder`], which
//! validates the project name and applies the gates between fields (an ORM only applies
//! to PostgreSQL, an email service only applies to Better Auth). The fields stay public
//! so that ungated combinations remain representable; the resolvers never trust them and
//! go through [`Selection::is_active`] instead.

use crate::features::{FeatureId, FEATURE_PRIORITY};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Project name meaning "scaffold into the current directory"
pub const CURRENT_DIRECTORY: &str = ".";

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("project name pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Project name is required")]
    EmptyName,

    #[error("Project name '{0}' can only contain letters, numbers, hyphens, and underscores")]
    InvalidName(String),

    #[error("Cannot derive a project name from {0}")]
    UnnamedDirectory(PathBuf),
}

/// Recommended Nuxt modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NuxtModule {
    NuxtUi,
    Eslint,
    TestUtils,
    Pinia,
    Vueuse,
    Motion,
    Seo,
    Security,
    Mdc,
    Icon,
    Fonts,
    Scripts,
    Devtools,
    Hints,
}

impl NuxtModule {
    pub const ALL: [NuxtModule; 14] = [
        NuxtModule::NuxtUi,
        NuxtModule::Eslint,
        NuxtModule::TestUtils,
        NuxtModule::Pinia,
        NuxtModule::Vueuse,
        NuxtModule::Motion,
        NuxtModule::Seo,
        NuxtModule::Security,
        NuxtModule::Mdc,
        NuxtModule::Icon,
        NuxtModule::Fonts,
        NuxtModule::Scripts,
        NuxtModule::Devtools,
        NuxtModule::Hints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NuxtModule::NuxtUi => "nuxt-ui",
            NuxtModule::Eslint => "eslint",
            NuxtModule::TestUtils => "test-utils",
            NuxtModule::Pinia => "pinia",
            NuxtModule::Vueuse => "vueuse",
            NuxtModule::Motion => "motion",
            NuxtModule::Seo => "seo",
            NuxtModule::Security => "security",
            NuxtModule::Mdc => "mdc",
            NuxtModule::Icon => "icon",
            NuxtModule::Fonts => "fonts",
            NuxtModule::Scripts => "scripts",
            NuxtModule::Devtools => "devtools",
            NuxtModule::Hints => "hints",
        }
    }
}

/// Optional (community) modules, offered separately from the recommended set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionalModule {
    Content,
    Image,
}

impl OptionalModule {
    pub const ALL: [OptionalModule; 2] = [OptionalModule::Content, OptionalModule::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionalModule::Content => "content",
            OptionalModule::Image => "image",
        }
    }
}

/// Storage backends provisioned through Docker Compose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageOption {
    /// Relational (PostgreSQL)
    Postgres,
    /// Document (MongoDB)
    Mongo,
    /// Object store (MinIO)
    Minio,
    /// Cache (Redis)
    Redis,
    /// Vector (Qdrant)
    Qdrant,
}

impl StorageOption {
    pub const ALL: [StorageOption; 5] = [
        StorageOption::Postgres,
        StorageOption::Mongo,
        StorageOption::Minio,
        StorageOption::Redis,
        StorageOption::Qdrant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageOption::Postgres => "postgres",
            StorageOption::Mongo => "mongo",
            StorageOption::Minio => "minio",
            StorageOption::Redis => "redis",
            StorageOption::Qdrant => "qdrant",
        }
    }
}

/// ORM for the relational backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrmChoice {
    Drizzle,
    Prisma,
    #[default]
    None,
}

impl OrmChoice {
    pub const ALL: [OrmChoice; 3] = [OrmChoice::Drizzle, OrmChoice::Prisma, OrmChoice::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrmChoice::Drizzle => "drizzle",
            OrmChoice::Prisma => "prisma",
            OrmChoice::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthChoice {
    BetterAuth,
    #[default]
    None,
}

impl AuthChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthChoice::BetterAuth => "better-auth",
            AuthChoice::None => "none",
        }
    }
}

/// Email delivery used by the auth provider's notification flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmailService {
    Nodemailer,
    #[default]
    None,
}

impl EmailService {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailService::Nodemailer => "nodemailer",
            EmailService::None => "none",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(NuxtModule, OptionalModule, StorageOption, OrmChoice, AuthChoice, EmailService);

/// Where the project is scaffolded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectTarget {
    /// A fresh `<cwd>/<name>` directory that must not exist yet
    NewDirectory,
    /// The working directory itself
    CurrentDirectory,
}

/// The complete, validated set of user choices for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub project_name: String,
    pub project_path: PathBuf,
    pub target: ProjectTarget,
    pub modules: Vec<NuxtModule>,
    pub optional_modules: Vec<OptionalModule>,
    pub storage: Vec<StorageOption>,
    pub orm: OrmChoice,
    pub auth: AuthChoice,
    pub email_service: EmailService,
    pub dry_run: bool,
}

impl Selection {
    /// Start building a selection for `name` relative to the working directory `cwd`
    pub fn builder(name: impl Into<String>, cwd: impl Into<PathBuf>) -> SelectionBuilder {
        SelectionBuilder::new(name, cwd)
    }

    pub fn has_module(&self, module: NuxtModule) -> bool {
        self.modules.contains(&module)
    }

    pub fn has_optional(&self, module: OptionalModule) -> bool {
        self.optional_modules.contains(&module)
    }

    pub fn has_storage(&self, storage: StorageOption) -> bool {
        self.storage.contains(&storage)
    }

    /// The ORM, if the relational backend it depends on is selected
    pub fn active_orm(&self) -> Option<OrmChoice> {
        match self.orm {
            OrmChoice::None => None,
            orm if self.has_storage(StorageOption::Postgres) => Some(orm),
            _ => None,
        }
    }

    /// The email service, if the auth provider that needs it is selected
    pub fn active_email_service(&self) -> Option<EmailService> {
        match (self.auth, self.email_service) {
            (AuthChoice::BetterAuth, EmailService::Nodemailer) => Some(EmailService::Nodemailer),
            _ => None,
        }
    }

    /// Whether a feature is selected and its gate (if any) is open
    pub fn is_active(&self, feature: FeatureId) -> bool {
        match feature {
            FeatureId::Module(module) => self.has_module(module),
            FeatureId::Optional(module) => self.has_optional(module),
            FeatureId::Storage(storage) => self.has_storage(storage),
            FeatureId::Orm(orm) => self.active_orm() == Some(orm),
            FeatureId::Auth(auth) => auth != AuthChoice::None && self.auth == auth,
            FeatureId::Email(service) => self.active_email_service() == Some(service),
        }
    }

    /// Active features in catalog priority order
    pub fn active_features(&self) -> Vec<FeatureId> {
        FEATURE_PRIORITY
            .iter()
            .copied()
            .filter(|feature| self.is_active(*feature))
            .collect()
    }

    pub fn is_current_directory(&self) -> bool {
        self.target == ProjectTarget::CurrentDirectory
    }
}

/// Check a project name typed by the user
pub fn validate_project_name(name: &str) -> Result<(), SelectionError> {
    if name.is_empty() {
        return Err(SelectionError::EmptyName);
    }
    if name == CURRENT_DIRECTORY || PROJECT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(SelectionError::InvalidName(name.to_string()))
    }
}

/// Builder that enforces the selection invariants
#[derive(Debug, Clone)]
pub struct SelectionBuilder {
    name: String,
    cwd: PathBuf,
    modules: Vec<NuxtModule>,
    optional_modules: Vec<OptionalModule>,
    storage: Vec<StorageOption>,
    orm: OrmChoice,
    auth: AuthChoice,
    email_service: EmailService,
    dry_run: bool,
}

impl SelectionBuilder {
    fn new(name: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            cwd: cwd.into(),
            modules: Vec::new(),
            optional_modules: Vec::new(),
            storage: Vec::new(),
            orm: OrmChoice::None,
            auth: AuthChoice::None,
            email_service: EmailService::None,
            dry_run: false,
        }
    }

    pub fn modules(mut self, modules: impl IntoIterator<Item = NuxtModule>) -> Self {
        self.modules = unique(modules);
        self
    }

    pub fn optional_modules(mut self, modules: impl IntoIterator<Item = OptionalModule>) -> Self {
        self.optional_modules = unique(modules);
        self
    }

    pub fn storage(mut self, storage: impl IntoIterator<Item = StorageOption>) -> Self {
        self.storage = unique(storage);
        self
    }

    pub fn orm(mut self, orm: OrmChoice) -> Self {
        self.orm = orm;
        self
    }

    pub fn auth(mut self, auth: AuthChoice) -> Self {
        self.auth = auth;
        self
    }

    pub fn email_service(mut self, email_service: EmailService) -> Self {
        self.email_service = email_service;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Result<Selection, SelectionError> {
        validate_project_name(&self.name)?;

        let (target, project_name, project_path) = if self.name == CURRENT_DIRECTORY {
            let name = directory_name(&self.cwd)?;
            (ProjectTarget::CurrentDirectory, name, self.cwd.clone())
        } else {
            let path = self.cwd.join(&self.name);
            (ProjectTarget::NewDirectory, self.name.clone(), path)
        };

        let orm = if self.storage.contains(&StorageOption::Postgres) {
            self.orm
        } else {
            OrmChoice::None
        };
        let email_service = if self.auth == AuthChoice::BetterAuth {
            self.email_service
        } else {
            EmailService::None
        };

        Ok(Selection {
            project_name,
            project_path,
            target,
            modules: self.modules,
            optional_modules: self.optional_modules,
            storage: self.storage,
            orm,
            auth: self.auth,
            email_service,
            dry_run: self.dry_run,
        })
    }
}

fn directory_name(path: &Path) -> Result<String, SelectionError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| SelectionError::UnnamedDirectory(path.to_path_buf()))
}

fn unique<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_validation() {
        assert!(validate_project_name("my-app_2").is_ok());
        assert!(validate_project_name(".").is_ok());
        assert_eq!(validate_project_name(""), Err(SelectionError::EmptyName));
        assert!(matches!(
            validate_project_name("my app"),
            Err(SelectionError::InvalidName(_))
        ));
        assert!(validate_project_name("../escape").is_err());
    }

    #[test]
    fn test_new_directory_target() {
        let selection = Selection::builder("shop", "/work").build().unwrap();
        assert_eq!(selection.target, ProjectTarget::NewDirectory);
        assert_eq!(selection.project_name, "shop");
        assert_eq!(selection.project_path, PathBuf::from("/work/shop"));
    }

    #[test]
    fn test_current_directory_uses_folder_name() {
        let selection = Selection::builder(".", "/work/blog").build().unwrap();
        assert!(selection.is_current_directory());
        assert_eq!(selection.project_name, "blog");
        assert_eq!(selection.project_path, PathBuf::from("/work/blog"));
    }

    #[test]
    fn test_current_directory_at_root_is_rejected() {
        let err = Selection::builder(".", "/").build().unwrap_err();
        assert!(matches!(err, SelectionError::UnnamedDirectory(_)));
    }

    #[test]
    fn test_builder_deduplicates_lists() {
        let selection = Selection::builder("app", "/tmp")
            .modules([NuxtModule::Pinia, NuxtModule::NuxtUi, NuxtModule::Pinia])
            .storage([StorageOption::Redis, StorageOption::Redis])
            .build()
            .unwrap();
        assert_eq!(selection.modules, vec![NuxtModule::Pinia, NuxtModule::NuxtUi]);
        assert_eq!(selection.storage, vec![StorageOption::Redis]);
    }

    #[test]
    fn test_builder_closes_orm_gate_without_postgres() {
        let selection = Selection::builder("app", "/tmp")
            .storage([StorageOption::Mongo])
            .orm(OrmChoice::Prisma)
            .build()
            .unwrap();
        assert_eq!(selection.orm, OrmChoice::None);
    }

    #[test]
    fn test_builder_closes_email_gate_without_auth() {
        let selection = Selection::builder("app", "/tmp")
            .email_service(EmailService::Nodemailer)
            .build()
            .unwrap();
        assert_eq!(selection.email_service, EmailService::None);
    }

    #[test]
    fn test_ungated_fields_are_inactive() {
        let mut selection = Selection::builder("app", "/tmp").build().unwrap();
        selection.orm = OrmChoice::Drizzle;
        selection.email_service = EmailService::Nodemailer;

        assert_eq!(selection.active_orm(), None);
        assert_eq!(selection.active_email_service(), None);
        assert!(!selection.is_active(FeatureId::Orm(OrmChoice::Drizzle)));
        assert!(!selection.is_active(FeatureId::Email(EmailService::Nodemailer)));
    }

    #[test]
    fn test_active_features_follow_priority_order() {
        let selection = Selection::builder("app", "/tmp")
            .modules([NuxtModule::Security, NuxtModule::NuxtUi])
            .optional_modules([OptionalModule::Image])
            .storage([StorageOption::Redis, StorageOption::Postgres])
            .orm(OrmChoice::Drizzle)
            .build()
            .unwrap();

        assert_eq!(
            selection.active_features(),
            vec![
                FeatureId::Module(NuxtModule::NuxtUi),
                FeatureId::Module(NuxtModule::Security),
                FeatureId::Optional(OptionalModule::Image),
                FeatureId::Storage(StorageOption::Postgres),
                FeatureId::Storage(StorageOption::Redis),
                FeatureId::Orm(OrmChoice::Drizzle),
            ]
        );
    }
}
