//! Nuxt Scaffold - interactive project scaffolding for Nuxt

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser};
use scaffold_core::tui::CreateArgs;
use scaffold_core::{ProductConfig, Selection};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Nuxt product configuration
#[derive(Clone)]
pub struct NuxtConfig;

impl ProductConfig for NuxtConfig {
    fn name(&self) -> &'static str {
        "nuxt-scaffold"
    }

    fn display_name(&self) -> &'static str {
        "Nuxt"
    }

    fn docs_url(&self) -> &'static str {
        "https://nuxt.com/docs"
    }

    fn cli_description(&self) -> &'static str {
        "Interactive CLI for scaffolding Nuxt projects"
    }

    fn init_command_env(&self) -> &'static str {
        "NUXT_SCAFFOLD_INIT_COMMAND"
    }

    fn next_steps(&self, selection: &Selection) -> Vec<String> {
        let mut steps = Vec::new();

        if !selection.is_current_directory() {
            steps.push(format!("cd {}", selection.project_name));
        }
        steps.push("bun install".to_string());
        if !selection.storage.is_empty() {
            steps.push("bun run db:start".to_string());
        }
        steps.push("bun run dev".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Print every command and file instead of executing it
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// The command line, named and described by the product
fn cli(config: &impl ProductConfig) -> clap::Command {
    Args::command()
        .name(config.name())
        .about(config.cli_description())
}

fn parse_args(config: &impl ProductConfig) -> Args {
    let matches = cli(config).get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = parse_args(&NuxtConfig);
    let result = run(args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = ?e, "scaffolding aborted");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = NuxtConfig;
    let create_args = CreateArgs {
        dry_run: args.dry_run,
    };

    let code = match scaffold_core::run(&config, create_args).await? {
        Some(outcome) => ExitCode::from(outcome.exit_code()),
        None => ExitCode::SUCCESS,
    };
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffold_core::StorageOption;

    #[test]
    fn test_next_steps_for_new_directory_with_storage() {
        let selection = Selection::builder("shop", "/work")
            .storage([StorageOption::Postgres])
            .build()
            .unwrap();

        assert_eq!(
            NuxtConfig.next_steps(&selection),
            vec!["cd shop", "bun install", "bun run db:start", "bun run dev"]
        );
    }

    #[test]
    fn test_next_steps_in_current_directory() {
        let selection = Selection::builder(".", "/work/shop").build().unwrap();

        assert_eq!(NuxtConfig.next_steps(&selection), vec!["bun install", "bun run dev"]);
    }

    #[test]
    fn test_dry_run_flag() {
        let matches = cli(&NuxtConfig)
            .try_get_matches_from(["nuxt-scaffold", "--dry-run"])
            .unwrap();
        assert!(Args::from_arg_matches(&matches).unwrap().dry_run);
        assert!(cli(&NuxtConfig)
            .try_get_matches_from(["nuxt-scaffold", "--force"])
            .is_err());
    }

    #[test]
    fn test_help_comes_from_the_product() {
        let command = cli(&NuxtConfig);
        assert_eq!(command.get_name(), "nuxt-scaffold");
        assert_eq!(
            command.get_about().map(ToString::to_string).as_deref(),
            Some("Interactive CLI for scaffolding Nuxt projects")
        );
    }
}
