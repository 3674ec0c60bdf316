//! Development tooling every project gets: Prettier, Husky, lint-staged, commitlint and
//! editor settings

use super::templates;
use super::{Progress, SetupContext};
use crate::report::StageOutcome;
use crate::runtime::package_manager::bunx;
use crate::runtime::CommandRunner;
use serde_json::{json, Value};

const DEV_ALL: &str = r#"concurrently -k -n "APP,DB,STUDIO" -c "blue,green,magenta" "bun --bun run dev" "docker compose up" "bun run db:studio""#;

fn prettier_config() -> Value {
    json!({
        "plugins": ["prettier-plugin-tailwindcss"],
        "tailwindStylesheet": "./app/assets/css/main.css",
        "tailwindAttributes": [":ui"],
        "semi": false,
        "singleQuote": true,
        "tabWidth": 2,
        "trailingComma": "es5",
        "printWidth": 100
    })
}

fn vscode_settings() -> Value {
    json!({
        "editor.formatOnSave": true,
        "editor.defaultFormatter": "esbenp.prettier-vscode",
        "[vue]": { "editor.defaultFormatter": "esbenp.prettier-vscode" },
        "[typescript]": { "editor.defaultFormatter": "esbenp.prettier-vscode" },
        "files.associations": { "*.css": "tailwindcss" },
        "editor.quickSuggestions": { "strings": "on" },
        "tailwindCSS.classAttributes": ["class", "ui"],
        "tailwindCSS.experimental.classRegex": [
            [r"ui:\s*{([^)]*)\s*}", r#"(?:'|"|`)([^']*)(?:'|"|`)"#]
        ],
        "eslint.useFlatConfig": true
    })
}

fn vscode_extensions() -> Value {
    json!({
        "recommendations": [
            "vue.volar",
            "dbaeumer.vscode-eslint",
            "esbenp.prettier-vscode",
            "bradlc.vscode-tailwindcss",
            "antfu.iconify",
            "antfu.file-nesting"
        ]
    })
}

fn lint_staged() -> Value {
    json!({
        "*.{ts,vue,js,json}": ["bun lint", "bun format", "bun test:related"]
    })
}

fn pretty(value: &Value) -> String {
    let mut text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    text.push('\n');
    text
}

pub(super) async fn setup<R: CommandRunner>(context: &SetupContext<'_, R>) -> StageOutcome {
    let fs = context.fs;
    let mut progress = Progress::default();

    context.logger.step("Configuring Prettier...");
    let prettierrc = pretty(&prettier_config());
    progress
        .write_files(
            fs,
            &[
                (".prettierrc", prettierrc.as_str()),
                (".prettierignore", templates::PRETTIER_IGNORE),
            ],
        )
        .await;
    progress.check(
        fs.add_scripts(&[("format", "prettier --check ."), ("format:fix", "prettier --write .")])
            .await,
        "format scripts",
    );

    context.logger.step("Initializing Husky...");
    let husky = bunx("husky init");
    let output = context.runner.run(&husky, context.run_options()).await;
    if !output.success {
        context
            .logger
            .warn(&format!("{husky} failed: {}", output.summary()));
    }
    progress.check(output.success, &husky);

    context.logger.step("Setting up commitlint...");
    progress
        .write_files(
            fs,
            &[
                (".husky/pre-commit", templates::PRE_COMMIT_HOOK),
                (".husky/commit-msg", templates::COMMIT_MSG_HOOK),
                ("commitlint.config.js", templates::COMMITLINT_CONFIG),
            ],
        )
        .await;
    progress.check(
        fs.set_package_field("lint-staged", lint_staged()).await,
        "lint-staged",
    );

    if !context.selection.storage.is_empty() {
        progress.check(fs.add_scripts(&[("dev:all", DEV_ALL)]).await, "dev:all script");
    }

    let settings = pretty(&vscode_settings());
    let extensions = pretty(&vscode_extensions());
    progress
        .write_files(
            fs,
            &[
                (".vscode/settings.json", settings.as_str()),
                (".vscode/extensions.json", extensions.as_str()),
            ],
        )
        .await;

    progress.outcome()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureTable;
    use crate::fs::ProjectFs;
    use crate::selection::{Selection, StorageOption};
    use crate::testing::{RecordingLogger, ScriptedRunner};
    use tempfile::TempDir;

    #[test]
    fn test_vscode_regex_survives_json_escaping() {
        let text = pretty(&vscode_settings());
        assert!(text.contains(r#""ui:\\s*{([^)]*)\\s*}""#));
        assert!(text.contains(r#""(?:'|\"|`)([^']*)(?:'|\"|`)""#));
    }

    #[test]
    fn test_prettier_config_keeps_key_order() {
        let text = pretty(&prettier_config());
        assert!(text.starts_with("{\n  \"plugins\": ["));
        assert!(text.ends_with("\"printWidth\": 100\n}\n"));
    }

    #[tokio::test]
    async fn test_tooling_with_storage() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"name":"app"}"#).unwrap();
        let selection = Selection::builder("app", dir.path())
            .storage([StorageOption::Postgres])
            .build()
            .unwrap();
        let logger = RecordingLogger::default();
        let fs = ProjectFs::new(dir.path(), false, &logger);
        let runner = ScriptedRunner::default();
        let table = FeatureTable::standard();
        let context = SetupContext {
            selection: &selection,
            table: &table,
            fs: &fs,
            runner: &runner,
            logger: &logger,
        };

        assert!(setup(&context).await.is_success());

        let package = fs.read_json("package.json").await.unwrap();
        assert_eq!(package["scripts"]["dev:all"], DEV_ALL);
        assert_eq!(package["scripts"]["format"], "prettier --check .");
        assert_eq!(package["lint-staged"], lint_staged());
        assert_eq!(
            std::fs::read_to_string(dir.path().join(".husky/pre-commit")).unwrap(),
            "#!/bin/sh\nbun exec lint-staged\n"
        );
        assert!(dir.path().join(".vscode/extensions.json").is_file());
    }

    #[tokio::test]
    async fn test_husky_failure_is_reported_but_files_are_written() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"name":"app"}"#).unwrap();
        let selection = Selection::builder("app", dir.path()).build().unwrap();
        let logger = RecordingLogger::default();
        let fs = ProjectFs::new(dir.path(), false, &logger);
        let runner = ScriptedRunner::default().fail_on("husky");
        let table = FeatureTable::standard();
        let context = SetupContext {
            selection: &selection,
            table: &table,
            fs: &fs,
            runner: &runner,
            logger: &logger,
        };

        let outcome = setup(&context).await;

        assert_eq!(outcome, StageOutcome::Failed("failed: bunx husky init".to_string()));
        assert!(dir.path().join("commitlint.config.js").is_file());
        let package = fs.read_json("package.json").await.unwrap();
        assert!(package["scripts"].get("dev:all").is_none());
    }
}
