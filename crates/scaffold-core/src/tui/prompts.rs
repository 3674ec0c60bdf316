//! Charm-style CLI prompts using cliclack

use crate::features::{FeatureId, FeatureTable};
use crate::logger::ConsoleLogger;
use crate::orchestrator::{Confirmation, Orchestrator, RunResult};
use crate::product::ProductConfig;
use crate::report::{Outcome, ScaffoldReport, StageOutcome};
use crate::runtime::{bun_tool, check_bun, RuntimeInfo, ShellRunner};
use crate::selection::{
    validate_project_name, AuthChoice, EmailService, NuxtModule, OptionalModule, OrmChoice,
    Selection, StorageOption,
};
use anyhow::{Context, Result};
use console::style;
use std::io;
use std::path::Path;

/// CLI arguments for the create flow
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Log every command and file instead of executing it
    pub dry_run: bool,
}

const DEFAULT_MODULES: [NuxtModule; 3] =
    [NuxtModule::NuxtUi, NuxtModule::Eslint, NuxtModule::TestUtils];

/// Run the CLI with interactive prompts
///
/// Returns `None` when the user cancelled; nothing was scaffolded then.
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<Option<Outcome>> {
    cliclack::intro(format!("{} Project Scaffolder", config.display_name()))?;
    if args.dry_run {
        cliclack::log::warning("Dry run: commands and files are only listed")?;
    }

    let runtime = match handle_bun_check(args.dry_run).await {
        Ok(Some(runtime)) => runtime,
        Ok(None) => return Ok(None),
        Err(e) if is_cancel(&e) => return cancelled(),
        Err(e) => return Err(e),
    };

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let table = FeatureTable::standard();

    let selection = match prompt_selection(&table, &cwd, args.dry_run) {
        Ok(Some(selection)) => selection,
        Ok(None) => return cancelled(),
        Err(e) if is_cancel(&e) => return cancelled(),
        Err(e) => return Err(e),
    };

    let logger = ConsoleLogger;
    let runner = ShellRunner::new(&logger);
    let result = Orchestrator::new(&selection, &runner, &CliclackConfirmation, &logger)
        .with_table(table)
        .with_init_template(config.resolve_init_command())
        .with_runtime(runtime)
        .run()
        .await;

    match result {
        RunResult::Cancelled => cancelled(),
        RunResult::Completed(report) => {
            print_summary(config, &selection, &report)?;
            Ok(Some(report.outcome()))
        }
    }
}

fn is_cancel(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::Interrupted)
}

fn cancelled<T>() -> Result<Option<T>> {
    cliclack::outro_cancel("Scaffolding cancelled")?;
    Ok(None)
}

/// Bun preflight; `None` means the user chose to stop
async fn handle_bun_check(dry_run: bool) -> Result<Option<RuntimeInfo>> {
    let runtime = check_bun();
    if runtime.available {
        cliclack::log::success(format!(
            "{} installed ({})",
            runtime.name,
            runtime.version.as_deref().unwrap_or("unknown")
        ))?;
        return Ok(Some(runtime));
    }
    if dry_run {
        return Ok(Some(runtime));
    }

    let tool = bun_tool();
    let name = tool.config().display_name;
    cliclack::log::warning(format!("{name} is not installed"))?;

    let action: &str = cliclack::select("What would you like to do?")
        .item("install", format!("Install {name} automatically"), "")
        .item("docs", format!("Open documentation ({})", tool.config().docs_url), "")
        .item("abort", "Abort", "")
        .interact()?;

    match action {
        "install" => {
            cliclack::log::info(format!("This will execute: {}", tool.install_command()))?;
            let confirm: bool = cliclack::confirm("Proceed with installation?")
                .initial_value(true)
                .interact()?;
            if !confirm {
                cliclack::outro_cancel(format!("{name} is required to scaffold a project"))?;
                return Ok(None);
            }
            match tool.install().await {
                Ok(()) => cliclack::log::success(format!("{name} installed successfully"))?,
                Err(e) => cliclack::log::error(format!("{e}"))?,
            }
            Ok(Some(check_bun()))
        }
        "docs" => {
            tool.open_docs()?;
            cliclack::outro(format!("After installing {name}, run this command again."))?;
            Ok(None)
        }
        _ => {
            cliclack::outro_cancel("Scaffolding cancelled")?;
            Ok(None)
        }
    }
}

fn prompt_selection(table: &FeatureTable, cwd: &Path, dry_run: bool) -> Result<Option<Selection>> {
    let name: String = cliclack::input("Project name")
        .placeholder("my-nuxt-app (use . for the current directory)")
        .default_input("my-nuxt-app")
        .validate(|input: &String| validate_project_name(input.trim()))
        .interact()?;

    let mut modules = cliclack::multiselect("Select Nuxt modules")
        .initial_values(DEFAULT_MODULES.to_vec())
        .required(false);
    for module in NuxtModule::ALL {
        let (label, hint) = described(table, FeatureId::Module(module));
        modules = modules.item(module, label, hint);
    }
    let modules: Vec<NuxtModule> = modules.interact()?;

    let mut optional = cliclack::multiselect("Select optional modules").required(false);
    for module in OptionalModule::ALL {
        let (label, hint) = described(table, FeatureId::Optional(module));
        optional = optional.item(module, label, hint);
    }
    let optional_modules: Vec<OptionalModule> = optional.interact()?;

    let mut storage = cliclack::multiselect("Select storage services (Docker)").required(false);
    for option in StorageOption::ALL {
        let (label, hint) = described(table, FeatureId::Storage(option));
        storage = storage.item(option, label, hint);
    }
    let storage: Vec<StorageOption> = storage.interact()?;

    let orm = if storage.contains(&StorageOption::Postgres) {
        let (drizzle, drizzle_hint) = described(table, FeatureId::Orm(OrmChoice::Drizzle));
        let (prisma, prisma_hint) = described(table, FeatureId::Orm(OrmChoice::Prisma));
        cliclack::select("Select an ORM for PostgreSQL")
            .item(OrmChoice::Drizzle, drizzle, drizzle_hint)
            .item(OrmChoice::Prisma, prisma, prisma_hint)
            .item(OrmChoice::None, "None", "Use a raw driver")
            .initial_value(OrmChoice::Drizzle)
            .interact()?
    } else {
        OrmChoice::None
    };

    let (better_auth, better_auth_hint) = described(table, FeatureId::Auth(AuthChoice::BetterAuth));
    let auth = cliclack::select("Select authentication")
        .item(AuthChoice::BetterAuth, better_auth, better_auth_hint)
        .item(AuthChoice::None, "None", "")
        .initial_value(AuthChoice::None)
        .interact()?;

    let email_service = if auth == AuthChoice::BetterAuth {
        let (nodemailer, nodemailer_hint) =
            described(table, FeatureId::Email(EmailService::Nodemailer));
        cliclack::select("Select an email service")
            .item(EmailService::Nodemailer, nodemailer, nodemailer_hint)
            .item(EmailService::None, "None", "")
            .initial_value(EmailService::None)
            .interact()?
    } else {
        EmailService::None
    };

    let selection = Selection::builder(name.trim(), cwd)
        .modules(modules)
        .optional_modules(optional_modules)
        .storage(storage)
        .orm(orm)
        .auth(auth)
        .email_service(email_service)
        .dry_run(dry_run)
        .build()?;

    cliclack::note("Configuration", configuration_summary(&selection, table))?;

    let ready: bool = cliclack::confirm("Ready to scaffold your project?")
        .initial_value(true)
        .interact()?;

    Ok(ready.then_some(selection))
}

fn described(table: &FeatureTable, id: FeatureId) -> (&'static str, &'static str) {
    table
        .get(id)
        .map(|d| (d.label, d.hint))
        .unwrap_or_else(|| (id.as_str(), ""))
}

fn configuration_summary(selection: &Selection, table: &FeatureTable) -> String {
    let labels = |ids: Vec<FeatureId>| -> String {
        if ids.is_empty() {
            "none".to_string()
        } else {
            ids.into_iter()
                .map(|id| table.label(id))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    let mut lines = vec![
        format!("Project:  {}", selection.project_name),
        format!("Location: {}", selection.project_path.display()),
        format!(
            "Modules:  {}",
            labels(selection.modules.iter().map(|m| FeatureId::Module(*m)).collect())
        ),
    ];
    if !selection.optional_modules.is_empty() {
        lines.push(format!(
            "Optional: {}",
            labels(
                selection
                    .optional_modules
                    .iter()
                    .map(|m| FeatureId::Optional(*m))
                    .collect()
            )
        ));
    }
    lines.push(format!(
        "Storage:  {}",
        labels(selection.storage.iter().map(|s| FeatureId::Storage(*s)).collect())
    ));
    if let Some(orm) = selection.active_orm() {
        lines.push(format!("ORM:      {}", table.label(FeatureId::Orm(orm))));
    }
    if selection.auth != AuthChoice::None {
        lines.push(format!("Auth:     {}", table.label(FeatureId::Auth(selection.auth))));
    }
    if let Some(service) = selection.active_email_service() {
        lines.push(format!("Email:    {}", table.label(FeatureId::Email(service))));
    }
    lines.join("\n")
}

/// Asks before scaffolding into a non-empty directory; an aborted prompt declines
pub struct CliclackConfirmation;

impl Confirmation for CliclackConfirmation {
    fn confirm_non_empty_directory(&self, dir: &Path, entries: usize) -> bool {
        if let Err(e) = cliclack::log::warning(format!(
            "{} has {} existing items",
            dir.display(),
            entries
        )) {
            tracing::debug!(error = %e, "could not print the directory warning");
        }
        cliclack::confirm("Continue anyway? Existing files may be overwritten")
            .initial_value(false)
            .interact()
            .unwrap_or(false)
    }
}

fn print_summary<C: ProductConfig>(
    config: &C,
    selection: &Selection,
    report: &ScaffoldReport,
) -> Result<()> {
    match report.outcome() {
        Outcome::FatalFailure => {
            let reason = report
                .fatal_error()
                .map(ToString::to_string)
                .unwrap_or_else(|| "a required step failed".to_string());
            cliclack::log::error(format!("Failed to scaffold project: {reason}"))?;
            cliclack::outro_cancel("Scaffolding stopped")?;
            return Ok(());
        }
        Outcome::SuccessWithWarnings => {
            cliclack::log::warning("Project scaffolded with warnings")?;
            for entry in report.warnings() {
                let reason = match &entry.outcome {
                    StageOutcome::Failed(reason) => reason.as_str(),
                    StageOutcome::Succeeded => "",
                };
                cliclack::log::remark(format!("{}: {} ({reason})", entry.stage, entry.subject))?;
            }
        }
        Outcome::Success if selection.dry_run => {
            cliclack::log::success("Dry run complete, nothing was changed")?;
        }
        Outcome::Success => {
            cliclack::log::success("Project scaffolded successfully")?;
        }
    }

    let steps = config.next_steps(selection);

    println!();
    println!("  {}", style("Next steps").bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}  {}", style(format!("{}.", i + 1)).dim(), step);
    }

    cliclack::outro(format!("Docs: {}  Happy coding!", config.docs_url()))?;

    Ok(())
}
