//! Bun command lines and the package installer

use super::command::{CommandOutput, CommandRunner, RunOptions};
use std::path::Path;

pub const INSTALL_ALL: &str = "bun install";

/// `bun add [-d] <packages>`
pub fn add_command(packages: &[String], dev: bool) -> String {
    let mut command = String::from("bun add");
    if dev {
        command.push_str(" -d");
    }
    for package in packages {
        command.push(' ');
        command.push_str(package);
    }
    command
}

/// `bunx nuxi module add <name>`
pub fn nuxi_module_add(name: &str) -> String {
    format!("bunx nuxi module add {name}")
}

pub fn bunx(args: &str) -> String {
    format!("bunx {args}")
}

#[derive(Debug, Clone, Copy)]
pub struct InstallOptions<'a> {
    pub dev: bool,
    pub cwd: &'a Path,
    pub dry_run: bool,
}

/// Installs packages with `bun add` through a [`CommandRunner`]
pub struct PackageInstaller<'a, R> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> PackageInstaller<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Install `packages`; an empty list succeeds without running anything
    pub async fn install(&self, packages: &[String], options: InstallOptions<'_>) -> CommandOutput {
        if packages.is_empty() {
            return CommandOutput::succeeded("");
        }
        let command = add_command(packages, options.dev);
        self.runner
            .run(&command, RunOptions::new(options.cwd, options.dry_run))
            .await
    }
}
