//! File access scoped to the project directory
//!
//! Every mutating operation honors dry-run: it logs what it would do and reports
//! success without touching the disk. Failures are logged and returned as `false`.

use crate::logger::Logger;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

pub const PACKAGE_JSON: &str = "package.json";

pub struct ProjectFs<'a> {
    root: PathBuf,
    dry_run: bool,
    logger: &'a dyn Logger,
}

impl<'a> ProjectFs<'a> {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool, logger: &'a dyn Logger) -> Self {
        Self {
            root: root.into(),
            dry_run,
            logger,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Write `content`, creating parent directories as needed
    pub async fn write_file(&self, relative: impl AsRef<Path>, content: &str) -> bool {
        let relative = relative.as_ref();
        if self.dry_run {
            self.logger
                .step(&format!("Would create: {}", relative.display()));
            return true;
        }

        match write_creating_dirs(&self.path(relative), content).await {
            Ok(()) => {
                self.logger.success(&format!("Created: {}", relative.display()));
                true
            }
            Err(e) => self.report_failure("create", relative, &e),
        }
    }

    pub async fn read_file(&self, relative: impl AsRef<Path>) -> Option<String> {
        fs::read_to_string(self.path(relative)).await.ok()
    }

    pub async fn ensure_dir(&self, relative: impl AsRef<Path>) -> bool {
        let relative = relative.as_ref();
        if self.dry_run {
            self.logger
                .step(&format!("Would create directory: {}", relative.display()));
            return true;
        }

        let path = self.path(relative);
        if path.is_dir() {
            return true;
        }
        match fs::create_dir_all(&path).await {
            Ok(()) => {
                self.logger
                    .success(&format!("Created directory: {}", relative.display()));
                true
            }
            Err(e) => self.report_failure("create directory", relative, &e),
        }
    }

    pub async fn read_json(&self, relative: impl AsRef<Path>) -> Option<Value> {
        let text = self.read_file(relative).await?;
        serde_json::from_str(&text).ok()
    }

    /// Read-modify-write `package.json`, keeping its key order
    pub async fn update_package_json(&self, update: impl FnOnce(&mut Map<String, Value>)) -> bool {
        if self.dry_run {
            self.logger.step(&format!("Would update: {PACKAGE_JSON}"));
            return true;
        }

        let Some(Value::Object(mut package)) = self.read_json(PACKAGE_JSON).await else {
            self.logger.error(&format!("Could not read {PACKAGE_JSON}"));
            return false;
        };
        update(&mut package);

        let mut text = match serde_json::to_string_pretty(&Value::Object(package)) {
            Ok(text) => text,
            Err(e) => {
                self.logger
                    .error(&format!("Could not serialize {PACKAGE_JSON}: {e}"));
                return false;
            }
        };
        text.push('\n');

        match write_creating_dirs(&self.path(PACKAGE_JSON), &text).await {
            Ok(()) => true,
            Err(e) => self.report_failure("update", Path::new(PACKAGE_JSON), &e),
        }
    }

    /// Add or overwrite entries of the `scripts` object
    pub async fn add_scripts(&self, scripts: &[(&str, &str)]) -> bool {
        if self.dry_run {
            let names: Vec<&str> = scripts.iter().map(|(name, _)| *name).collect();
            self.logger
                .step(&format!("Would add scripts: {}", names.join(", ")));
            return true;
        }

        self.update_package_json(|package| {
            let entry = package
                .entry("scripts")
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Some(existing) = entry.as_object_mut() {
                for (name, command) in scripts {
                    existing.insert(name.to_string(), Value::String(command.to_string()));
                }
            }
        })
        .await
    }

    /// Set a top-level `package.json` field
    pub async fn set_package_field(&self, key: &str, value: Value) -> bool {
        self.update_package_json(|package| {
            package.insert(key.to_string(), value);
        })
        .await
    }

    fn report_failure(&self, action: &str, relative: &Path, error: &io::Error) -> bool {
        warn!(path = %self.path(relative).display(), %error, "file operation failed");
        self.logger
            .error(&format!("Failed to {action} {}: {error}", relative.display()));
        false
    }
}

async fn write_creating_dirs(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, content).await
}

/// Number of entries in `dir`; a missing directory counts as empty
pub fn entry_count(dir: &Path) -> io::Result<usize> {
    match std::fs::read_dir(dir) {
        Ok(entries) => Ok(entries.count()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e),
    }
}
