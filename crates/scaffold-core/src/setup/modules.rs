//! Nuxt module registration and the files individual modules need

use super::templates;
use super::{Progress, SetupContext};
use crate::report::{ScaffoldReport, Stage, StageOutcome};
use crate::runtime::package_manager::nuxi_module_add;
use crate::runtime::CommandRunner;
use tracing::{debug, warn};

/// `bunx nuxi module add` for every active feature that registers through nuxi
///
/// Best effort: one report per command, failures do not stop the batch.
pub(super) async fn add_nuxi_modules<R: CommandRunner>(
    context: &SetupContext<'_, R>,
    report: &mut ScaffoldReport,
) {
    let commands: Vec<String> = context
        .table
        .active(context.selection)
        .filter_map(|descriptor| descriptor.nuxi_module)
        .map(nuxi_module_add)
        .collect();
    if commands.is_empty() {
        return;
    }

    context.logger.title("Adding Nuxt modules");
    let batch = context
        .runner
        .run_batch(&commands, context.run_options())
        .await;
    debug!(total = commands.len(), ok = batch.success(), "nuxi batch finished");

    for (command, output) in batch.results {
        if output.success {
            report.succeeded(Stage::RegisterModules, command);
        } else {
            warn!(%command, "module registration failed");
            context
                .logger
                .warn(&format!("{command} failed: {}", output.summary()));
            report.failed(Stage::RegisterModules, command, output.summary());
        }
    }
}

pub(super) async fn nuxt_ui<R: CommandRunner>(context: &SetupContext<'_, R>) -> StageOutcome {
    let mut progress = Progress::default();
    progress
        .write_files(
            context.fs,
            &[
                ("app/assets/css/main.css", templates::MAIN_CSS),
                ("app/app.vue", templates::APP_VUE),
            ],
        )
        .await;
    progress.outcome()
}

pub(super) async fn eslint<R: CommandRunner>(context: &SetupContext<'_, R>) -> StageOutcome {
    let fs = context.fs;
    let mut progress = Progress::default();
    progress
        .write_files(fs, &[("eslint.config.mjs", templates::ESLINT_CONFIG)])
        .await;
    progress.check(
        fs.add_scripts(&[("lint", "eslint ."), ("lint:fix", "eslint . --fix")])
            .await,
        "lint scripts",
    );
    progress.outcome()
}

pub(super) async fn test_utils<R: CommandRunner>(context: &SetupContext<'_, R>) -> StageOutcome {
    let fs = context.fs;
    let mut progress = Progress::default();
    progress
        .write_files(
            fs,
            &[
                ("vitest.config.ts", templates::VITEST_CONFIG),
                ("tests/unit/example.test.ts", templates::EXAMPLE_TEST),
            ],
        )
        .await;
    progress.check(
        fs.add_scripts(&[
            ("test", "vitest --passWithNoTests"),
            ("test:unit", "vitest --project unit"),
            ("test:nuxt", "vitest --project nuxt"),
            ("test:watch", "vitest --watch"),
            ("test:related", "vitest related --run"),
        ])
        .await,
        "test scripts",
    );
    progress.outcome()
}

pub(super) async fn content<R: CommandRunner>(context: &SetupContext<'_, R>) -> StageOutcome {
    let mut progress = Progress::default();
    progress
        .write_files(
            context.fs,
            &[
                ("content.config.ts", templates::CONTENT_CONFIG),
                ("content/index.md", templates::CONTENT_INDEX),
            ],
        )
        .await;
    progress.outcome()
}
