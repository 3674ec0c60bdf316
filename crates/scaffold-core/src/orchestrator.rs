//! The scaffold run: stages in order, fatal gates, best-effort continuation
//!
//! ```text
//! Init -> InstallBaseline -> ResolvePackages -> InstallPackages
//!      -> RegisterModules -> MergeConfig -> GenerateAuxiliary
//! ```
//!
//! `Init` and `InstallPackages` are fatal: their failure ends the run. Every other stage
//! records its failures and the run continues, so one pass produces as much of the
//! project as possible.

use crate::auxiliary;
use crate::config::{self, ConfigFragments, MergeError, NUXT_CONFIG_FILE};
use crate::error::ScaffoldError;
use crate::features::FeatureTable;
use crate::fs::{entry_count, ProjectFs};
use crate::logger::Logger;
use crate::report::{ScaffoldReport, Stage};
use crate::resolve::{resolve_modules, resolve_packages, PackageSet};
use crate::runtime::package_manager::INSTALL_ALL;
use crate::runtime::{
    CommandRunner, InstallOptions, PackageInstaller, RunOptions, RuntimeInfo, BUN_INSTALL_URL,
    MIN_BUN_VERSION,
};
use crate::selection::Selection;
use crate::setup::{self, SetupContext};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Initializer used when no override is configured; `{name}` is the project directory
pub const DEFAULT_INIT_TEMPLATE: &str =
    "bun create nuxt@latest {name} --packageManager bun --gitInit=false";

/// Asks the user before scaffolding into a directory that already has files
pub trait Confirmation {
    fn confirm_non_empty_directory(&self, dir: &Path, entries: usize) -> bool;
}

#[derive(Debug)]
pub enum RunResult {
    Completed(ScaffoldReport),
    /// The user declined to continue; nothing was changed
    Cancelled,
}

enum Gate {
    Proceed,
    Cancelled,
}

pub struct Orchestrator<'a, R, C> {
    selection: &'a Selection,
    runner: &'a R,
    confirmation: &'a C,
    logger: &'a dyn Logger,
    table: FeatureTable,
    init_template: String,
    runtime: Option<RuntimeInfo>,
}

impl<'a, R: CommandRunner, C: Confirmation> Orchestrator<'a, R, C> {
    pub fn new(
        selection: &'a Selection,
        runner: &'a R,
        confirmation: &'a C,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            selection,
            runner,
            confirmation,
            logger,
            table: FeatureTable::standard(),
            init_template: DEFAULT_INIT_TEMPLATE.to_string(),
            runtime: None,
        }
    }

    pub fn with_table(mut self, table: FeatureTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_init_template(mut self, template: impl Into<String>) -> Self {
        self.init_template = template.into();
        self
    }

    /// Gate `Init` on a detected runtime. Without one the runtime is not checked.
    pub fn with_runtime(mut self, runtime: RuntimeInfo) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// The initializer command line and the directory it runs in
    pub fn init_command(&self) -> (String, PathBuf) {
        let selection = self.selection;
        if selection.is_current_directory() {
            let command = format!("{} --force", self.init_template.replace("{name}", "."));
            (command, selection.project_path.clone())
        } else {
            let command = self.init_template.replace("{name}", &selection.project_name);
            let cwd = selection
                .project_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (command, cwd)
        }
    }

    pub async fn run(&self) -> RunResult {
        let selection = self.selection;
        let dry_run = selection.dry_run;
        let mut report = ScaffoldReport::new();
        info!(project = %selection.project_name, dry_run, "scaffold run started");

        match self.check_target() {
            Ok(Gate::Proceed) => {}
            Ok(Gate::Cancelled) => return RunResult::Cancelled,
            Err(error) => {
                report.abort(error);
                return RunResult::Completed(report);
            }
        }
        if let Err(error) = self.check_runtime() {
            report.abort(error);
            return RunResult::Completed(report);
        }

        self.logger.title("Creating Nuxt project");
        let (command, cwd) = self.init_command();
        let output = self.runner.run(&command, RunOptions::new(&cwd, dry_run)).await;
        if !output.success {
            report.failed(Stage::Init, &command, output.summary());
            report.abort(ScaffoldError::InitFailed(output.summary().to_string()));
            return RunResult::Completed(report);
        }
        report.succeeded(Stage::Init, &command);
        debug!(stage = %Stage::Init, "stage finished");

        let root = selection.project_path.as_path();
        let options = RunOptions::new(root, dry_run);

        let output = self.runner.run(INSTALL_ALL, options).await;
        if output.success {
            report.succeeded(Stage::InstallBaseline, INSTALL_ALL);
        } else {
            self.logger
                .warn(&format!("{INSTALL_ALL} failed: {}", output.summary()));
            report.failed(Stage::InstallBaseline, INSTALL_ALL, output.summary());
        }
        debug!(stage = %Stage::InstallBaseline, "stage finished");

        let packages = resolve_packages(selection, &self.table);
        report.succeeded(
            Stage::ResolvePackages,
            format!(
                "{} dependencies, {} dev dependencies",
                packages.dependencies.len(),
                packages.dev_dependencies.len()
            ),
        );
        debug!(stage = %Stage::ResolvePackages, total = packages.len(), "stage finished");

        if let Err(error) = self.install_packages(&packages, root, &mut report).await {
            report.abort(error);
            return RunResult::Completed(report);
        }
        debug!(stage = %Stage::InstallPackages, "stage finished");

        let fs = ProjectFs::new(root, dry_run, self.logger);
        let context = SetupContext {
            selection,
            table: &self.table,
            fs: &fs,
            runner: self.runner,
            logger: self.logger,
        };
        setup::run(&context, &mut report).await;
        debug!(stage = %Stage::RegisterModules, "stage finished");

        self.merge_config(&fs, &mut report).await;
        debug!(stage = %Stage::MergeConfig, "stage finished");

        self.logger.title("Generating project scaffolding");
        auxiliary::generate(selection, &fs, &mut report).await;
        debug!(stage = %Stage::GenerateAuxiliary, "stage finished");

        info!(outcome = ?report.outcome(), "scaffold run finished");
        RunResult::Completed(report)
    }

    fn check_target(&self) -> Result<Gate, ScaffoldError> {
        let selection = self.selection;
        let path = &selection.project_path;

        if !selection.is_current_directory() {
            if !path.exists() {
                return Ok(Gate::Proceed);
            }
            if selection.dry_run {
                self.logger.warn(&format!(
                    "Directory {} already exists; a real run would stop here",
                    path.display()
                ));
                return Ok(Gate::Proceed);
            }
            return Err(ScaffoldError::DirectoryExists(path.clone()));
        }

        let entries = entry_count(path).map_err(|source| ScaffoldError::Io {
            path: path.clone(),
            source,
        })?;
        if entries == 0 || selection.dry_run {
            return Ok(Gate::Proceed);
        }
        if self.confirmation.confirm_non_empty_directory(path, entries) {
            Ok(Gate::Proceed)
        } else {
            Ok(Gate::Cancelled)
        }
    }

    fn check_runtime(&self) -> Result<(), ScaffoldError> {
        let Some(runtime) = &self.runtime else {
            return Ok(());
        };

        if !runtime.available {
            if self.selection.dry_run {
                self.logger.warn(&format!(
                    "{} is not installed; a real run needs it ({BUN_INSTALL_URL})",
                    runtime.name
                ));
                return Ok(());
            }
            return Err(ScaffoldError::RuntimeMissing {
                runtime: runtime.name,
                install_url: BUN_INSTALL_URL,
            });
        }

        if let Some(warning) = runtime.version_warning(MIN_BUN_VERSION) {
            self.logger.warn(&warning);
        }
        Ok(())
    }

    async fn install_packages(
        &self,
        packages: &PackageSet,
        root: &Path,
        report: &mut ScaffoldReport,
    ) -> Result<(), ScaffoldError> {
        self.logger.title("Installing dependencies");
        let installer = PackageInstaller::new(self.runner);

        for (list, dev) in [
            (&packages.dependencies, false),
            (&packages.dev_dependencies, true),
        ] {
            if list.is_empty() {
                continue;
            }
            let subject = list.join(" ");
            let options = InstallOptions {
                dev,
                cwd: root,
                dry_run: self.selection.dry_run,
            };
            let output = installer.install(list, options).await;
            if !output.success {
                report.failed(Stage::InstallPackages, subject, output.summary());
                return Err(ScaffoldError::InstallFailed(output.summary().to_string()));
            }
            report.succeeded(Stage::InstallPackages, subject);
        }
        Ok(())
    }

    async fn merge_config(&self, fs: &ProjectFs<'_>, report: &mut ScaffoldReport) {
        let registration = resolve_modules(self.selection, &self.table);
        let fragments = ConfigFragments::from_registration(&registration);
        if fragments.is_empty() {
            return;
        }

        self.logger.step(&format!("Updating {NUXT_CONFIG_FILE}..."));
        let Some(existing) = fs.read_file(NUXT_CONFIG_FILE).await else {
            if fs.is_dry_run() {
                self.logger.step(&format!(
                    "Would register {} in {NUXT_CONFIG_FILE}",
                    fragments.modules.join(", ")
                ));
                report.succeeded(Stage::MergeConfig, NUXT_CONFIG_FILE);
            } else {
                self.logger
                    .warn(&format!("Could not read {NUXT_CONFIG_FILE}; add the modules manually"));
                report.failed(Stage::MergeConfig, NUXT_CONFIG_FILE, "file not found");
            }
            return;
        };

        let merged = match config::merge(&existing, &fragments) {
            Ok(merged) => merged,
            Err(MergeError::RootNotFound) => {
                self.manual_edit(
                    fs,
                    report,
                    &format!(
                        "{NUXT_CONFIG_FILE} has no config object to extend; add the modules manually"
                    ),
                    MergeError::RootNotFound.to_string(),
                );
                return;
            }
        };

        for addition in &merged.added {
            self.logger.dim(&format!("  {addition}"));
        }
        if merged.changed() && !fs.write_file(NUXT_CONFIG_FILE, &merged.text).await {
            report.failed(Stage::MergeConfig, NUXT_CONFIG_FILE, "could not write file");
            return;
        }

        if merged.skipped.is_empty() {
            report.succeeded(Stage::MergeConfig, NUXT_CONFIG_FILE);
        } else {
            let skipped = merged.skipped.join(", ");
            self.manual_edit(
                fs,
                report,
                &format!("Could not extend {skipped}; update it manually"),
                format!("skipped {skipped}"),
            );
        }
    }

    /// A config the merge cannot finish: a warning and a failed entry in live runs, a note
    /// in dry runs, which never fail
    fn manual_edit(
        &self,
        fs: &ProjectFs<'_>,
        report: &mut ScaffoldReport,
        message: &str,
        reason: String,
    ) {
        if fs.is_dry_run() {
            info!(%reason, "dry run: {NUXT_CONFIG_FILE} would need a manual edit");
            self.logger.dim(&format!("  {message}"));
            report.succeeded(Stage::MergeConfig, NUXT_CONFIG_FILE);
        } else {
            self.logger.warn(message);
            report.failed(Stage::MergeConfig, NUXT_CONFIG_FILE, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Outcome, StageOutcome};
    use crate::runtime::RuntimeInfo;
    use crate::selection::{NuxtModule, OrmChoice, StorageOption};
    use crate::testing::{FixedConfirmation, RecordingLogger, ScriptedRunner};
    use tempfile::TempDir;

    const NUXT_CONFIG: &str = "// https://nuxt.com/docs/api/configuration/nuxt-config
export default defineNuxtConfig({
  compatibilityDate: '2025-07-15',
  devtools: { enabled: true }
})
";

    const PACKAGE: &str = r#"{"name":"shop","private":true,"scripts":{"dev":"nuxt dev"}}"#;

    /// A runner whose `bun create` produces what the real initializer would
    fn initializer() -> ScriptedRunner {
        ScriptedRunner::default()
            .creates("bun create nuxt", "shop/package.json", PACKAGE)
            .creates("bun create nuxt", "shop/nuxt.config.ts", NUXT_CONFIG)
    }

    fn selection(cwd: &Path) -> Selection {
        Selection::builder("shop", cwd)
            .modules([NuxtModule::NuxtUi, NuxtModule::Seo, NuxtModule::Security])
            .storage([StorageOption::Postgres])
            .orm(OrmChoice::Drizzle)
            .build()
            .unwrap()
    }

    fn completed(result: RunResult) -> ScaffoldReport {
        match result {
            RunResult::Completed(report) => report,
            RunResult::Cancelled => panic!("run was cancelled"),
        }
    }

    #[tokio::test]
    async fn test_full_run_succeeds_and_merges_config() {
        let cwd = TempDir::new().unwrap();
        let selection = selection(cwd.path());
        let runner = initializer();
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::Success);
        let commands = runner.commands();
        assert_eq!(
            commands[0],
            "bun create nuxt@latest shop --packageManager bun --gitInit=false"
        );
        assert_eq!(commands[1], "bun install");
        assert!(commands[2].starts_with("bun add @nuxt/ui"));
        assert!(commands[3].starts_with("bun add -d "));

        let config = std::fs::read_to_string(cwd.path().join("shop/nuxt.config.ts")).unwrap();
        assert!(config.contains("'@nuxt/ui'"));
        assert!(config.contains("'nuxt-security'"));
        assert!(config.contains("  css: [\n    '~/assets/css/main.css'\n  ],"));
        assert!(config.contains("csrf: true"));
        assert!(cwd.path().join("shop/drizzle.config.ts").is_file());
        assert!(cwd.path().join("shop/.github/workflows/preview.yml").is_file());
        assert_eq!(confirmation.times_asked(), 0);
    }

    #[tokio::test]
    async fn test_failed_module_registration_continues_with_warnings() {
        let cwd = TempDir::new().unwrap();
        let selection = selection(cwd.path());
        let runner = initializer().fail_on("nuxi module add @nuxtjs/seo");
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::SuccessWithWarnings);
        assert!(report.ran(Stage::MergeConfig));
        assert!(report.ran(Stage::GenerateAuxiliary));
        assert!(runner.ran("bunx nuxi module add security"));
        let warnings: Vec<_> = report.warnings().map(|w| w.stage).collect();
        assert_eq!(warnings, vec![Stage::RegisterModules]);
    }

    #[tokio::test]
    async fn test_existing_directory_is_fatal_before_any_command() {
        let cwd = TempDir::new().unwrap();
        std::fs::create_dir(cwd.path().join("shop")).unwrap();
        let selection = selection(cwd.path());
        let runner = initializer();
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::FatalFailure);
        assert!(matches!(
            report.fatal_error(),
            Some(ScaffoldError::DirectoryExists(_))
        ));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_init_failure_stops_the_run() {
        let cwd = TempDir::new().unwrap();
        let selection = selection(cwd.path());
        let runner = ScriptedRunner::default().fail_on("bun create");
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::FatalFailure);
        assert_eq!(runner.commands().len(), 1);
        assert!(!report.ran(Stage::InstallBaseline));
    }

    #[tokio::test]
    async fn test_install_failure_is_fatal() {
        let cwd = TempDir::new().unwrap();
        let selection = selection(cwd.path());
        let runner = initializer().fail_on("bun add -d");
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::FatalFailure);
        assert!(matches!(
            report.fatal_error(),
            Some(ScaffoldError::InstallFailed(_))
        ));
        assert!(!report.ran(Stage::RegisterModules));
        assert!(!runner.ran("nuxi"));
    }

    #[tokio::test]
    async fn test_baseline_install_failure_is_only_a_warning() {
        let cwd = TempDir::new().unwrap();
        let selection = selection(cwd.path());
        let runner = initializer().fail_on("bun install");
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::SuccessWithWarnings);
        assert!(report.ran(Stage::GenerateAuxiliary));
    }

    #[tokio::test]
    async fn test_declined_confirmation_cancels() {
        let cwd = TempDir::new().unwrap();
        std::fs::write(cwd.path().join("README.md"), "hello").unwrap();
        let selection = Selection::builder(".", cwd.path()).build().unwrap();
        let runner = ScriptedRunner::default();
        let confirmation = FixedConfirmation::new(false);
        let logger = RecordingLogger::default();

        let result = Orchestrator::new(&selection, &runner, &confirmation, &logger)
            .run()
            .await;

        assert!(matches!(result, RunResult::Cancelled));
        assert_eq!(confirmation.times_asked(), 1);
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_current_directory_uses_force_in_place() {
        let cwd = TempDir::new().unwrap();
        let selection = Selection::builder(".", cwd.path()).build().unwrap();
        let runner = ScriptedRunner::default();
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();
        let orchestrator = Orchestrator::new(&selection, &runner, &confirmation, &logger)
            .with_init_template("bun x nuxi init {name}");

        let (command, dir) = orchestrator.init_command();

        assert_eq!(command, "bun x nuxi init . --force");
        assert_eq!(dir, cwd.path());
        assert_eq!(confirmation.times_asked(), 0);
    }

    #[tokio::test]
    async fn test_missing_runtime_is_fatal_in_live_mode() {
        let cwd = TempDir::new().unwrap();
        let selection = selection(cwd.path());
        let runner = initializer();
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .with_runtime(RuntimeInfo::missing("Bun"))
                .run()
                .await,
        );

        assert!(matches!(
            report.fatal_error(),
            Some(ScaffoldError::RuntimeMissing { .. })
        ));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_missing_config_is_recoverable() {
        let cwd = TempDir::new().unwrap();
        let selection = selection(cwd.path());
        let runner = ScriptedRunner::default().creates("bun create nuxt", "shop/package.json", PACKAGE);
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::SuccessWithWarnings);
        let merge = report
            .entries()
            .iter()
            .find(|e| e.stage == Stage::MergeConfig)
            .unwrap();
        assert_eq!(merge.outcome, StageOutcome::Failed("file not found".to_string()));
        assert!(report.ran(Stage::GenerateAuxiliary));
    }

    const UNMERGEABLE_CONFIG: &str = "export default defineNuxtConfig({\n  modules: baseModules,\n})\n";

    /// An existing project in the current directory whose modules list is not a literal
    fn unmergeable_project() -> TempDir {
        let cwd = TempDir::new().unwrap();
        std::fs::write(cwd.path().join(NUXT_CONFIG_FILE), UNMERGEABLE_CONFIG).unwrap();
        std::fs::write(cwd.path().join("package.json"), PACKAGE).unwrap();
        cwd
    }

    fn merge_entry(report: &ScaffoldReport) -> StageOutcome {
        report
            .entries()
            .iter()
            .find(|e| e.stage == Stage::MergeConfig)
            .map(|e| e.outcome.clone())
            .unwrap()
    }

    #[tokio::test]
    async fn test_unmergeable_config_is_a_warning() {
        let cwd = unmergeable_project();
        let selection = Selection::builder(".", cwd.path())
            .modules([NuxtModule::NuxtUi])
            .build()
            .unwrap();
        let runner = ScriptedRunner::default();
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::SuccessWithWarnings);
        assert_eq!(
            merge_entry(&report),
            StageOutcome::Failed("skipped modules (not an array literal)".to_string())
        );
    }

    #[tokio::test]
    async fn test_unmergeable_config_in_dry_run_still_succeeds() {
        let cwd = unmergeable_project();
        let selection = Selection::builder(".", cwd.path())
            .modules([NuxtModule::NuxtUi])
            .dry_run(true)
            .build()
            .unwrap();
        let runner = ScriptedRunner::default();
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::Success);
        assert_eq!(merge_entry(&report), StageOutcome::Succeeded);
        assert!(report.warnings().next().is_none());
        let config = std::fs::read_to_string(cwd.path().join(NUXT_CONFIG_FILE)).unwrap();
        assert_eq!(config, UNMERGEABLE_CONFIG);
    }

    #[tokio::test]
    async fn test_config_without_root_in_dry_run_still_succeeds() {
        let cwd = unmergeable_project();
        std::fs::write(cwd.path().join(NUXT_CONFIG_FILE), "module.exports = {}\n").unwrap();
        let selection = Selection::builder(".", cwd.path())
            .modules([NuxtModule::NuxtUi])
            .dry_run(true)
            .build()
            .unwrap();
        let runner = ScriptedRunner::default();
        let confirmation = FixedConfirmation::new(true);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::Success);
        assert_eq!(merge_entry(&report), StageOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_dry_run_always_succeeds_and_touches_nothing() {
        let cwd = TempDir::new().unwrap();
        std::fs::create_dir(cwd.path().join("shop")).unwrap();
        let selection = Selection::builder("shop", cwd.path())
            .modules(NuxtModule::ALL)
            .storage(StorageOption::ALL)
            .orm(OrmChoice::Prisma)
            .dry_run(true)
            .build()
            .unwrap();
        let runner = ScriptedRunner::default();
        let confirmation = FixedConfirmation::new(false);
        let logger = RecordingLogger::default();

        let report = completed(
            Orchestrator::new(&selection, &runner, &confirmation, &logger)
                .with_runtime(RuntimeInfo::missing("Bun"))
                .run()
                .await,
        );

        assert_eq!(report.outcome(), Outcome::Success);
        assert_eq!(entry_count(&cwd.path().join("shop")).unwrap(), 0);
        assert_eq!(logger.warnings().len(), 2);
    }
}
