//! Per-feature post-install setup (the RegisterModules stage)
//!
//! Runs after every package is installed. The `nuxi module add` commands go first as one
//! best-effort batch, then each feature writes its files. Every unit of work records its
//! own [`StageReport`](crate::report::StageReport), so one broken feature never hides
//! the others.

mod auth;
mod modules;
mod storage;
pub(crate) mod templates;
mod tooling;

use crate::features::FeatureTable;
use crate::fs::ProjectFs;
use crate::logger::Logger;
use crate::report::{ScaffoldReport, Stage, StageOutcome};
use crate::runtime::{CommandRunner, RunOptions};
use crate::selection::{AuthChoice, NuxtModule, OptionalModule, OrmChoice};
use tracing::debug;

pub use storage::{compose_file, env_schema, env_template};

/// Everything a setup step needs to touch the project
pub struct SetupContext<'a, R> {
    pub selection: &'a crate::selection::Selection,
    pub table: &'a FeatureTable,
    pub fs: &'a ProjectFs<'a>,
    pub runner: &'a R,
    pub logger: &'a dyn Logger,
}

impl<R: CommandRunner> SetupContext<'_, R> {
    pub(crate) fn run_options(&self) -> RunOptions<'_> {
        RunOptions::new(self.fs.root(), self.fs.is_dry_run())
    }
}

/// Failed operations of one setup unit
#[derive(Debug, Default)]
pub(crate) struct Progress {
    failed: Vec<String>,
}

impl Progress {
    pub fn check(&mut self, ok: bool, what: &str) {
        if !ok {
            self.failed.push(what.to_string());
        }
    }

    pub async fn write_files(&mut self, fs: &ProjectFs<'_>, files: &[(&str, &str)]) {
        for (path, content) in files {
            self.check(fs.write_file(path, content).await, path);
        }
    }

    pub fn outcome(self) -> StageOutcome {
        if self.failed.is_empty() {
            StageOutcome::Succeeded
        } else {
            StageOutcome::Failed(format!("failed: {}", self.failed.join(", ")))
        }
    }
}

/// Run every post-install step the selection asks for
pub async fn run<R: CommandRunner>(context: &SetupContext<'_, R>, report: &mut ScaffoldReport) {
    let selection = context.selection;

    modules::add_nuxi_modules(context, report).await;

    if selection.has_module(NuxtModule::NuxtUi) {
        unit(context, report, "@nuxt/ui", modules::nuxt_ui(context)).await;
    }
    if selection.has_module(NuxtModule::Eslint) {
        unit(context, report, "@nuxt/eslint", modules::eslint(context)).await;
    }
    if selection.has_module(NuxtModule::TestUtils) {
        unit(context, report, "@nuxt/test-utils", modules::test_utils(context)).await;
    }
    if selection.has_optional(OptionalModule::Content) {
        unit(context, report, "@nuxt/content", modules::content(context)).await;
    }

    if !selection.storage.is_empty() {
        context.logger.title("Setting up Storage");
        unit(context, report, "docker compose", storage::docker(context)).await;
        unit(context, report, "environment", storage::env(context)).await;
        match selection.active_orm() {
            Some(OrmChoice::Drizzle) => {
                unit(context, report, "drizzle", storage::drizzle(context)).await
            }
            Some(OrmChoice::Prisma) => {
                unit(context, report, "prisma", storage::prisma(context)).await
            }
            _ => {}
        }
    }

    if selection.auth == AuthChoice::BetterAuth {
        unit(context, report, "better-auth", auth::better_auth(context)).await;
    }

    context.logger.title("Setting up Development Tooling");
    unit(context, report, "tooling", tooling::setup(context)).await;
}

async fn unit<R: CommandRunner>(
    context: &SetupContext<'_, R>,
    report: &mut ScaffoldReport,
    subject: &str,
    work: impl std::future::Future<Output = StageOutcome>,
) {
    debug!(subject, "setup started");
    let outcome = work.await;
    match &outcome {
        StageOutcome::Succeeded => context.logger.success(&format!("{subject} configured")),
        StageOutcome::Failed(reason) => context
            .logger
            .warn(&format!("{subject} setup incomplete: {reason}")),
    }
    report.record(Stage::RegisterModules, subject, outcome);
}
