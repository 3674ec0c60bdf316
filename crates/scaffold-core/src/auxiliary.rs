//! Auxiliary scaffolding (the GenerateAuxiliary stage): test directories, CI workflows and
//! shared utilities

use crate::fs::ProjectFs;
use crate::report::{ScaffoldReport, Stage};
use crate::selection::{Selection, StorageOption};
use crate::setup::templates;
use crate::yaml::OrderedMap;
use serde::Serialize;
use tracing::debug;

pub const TEST_DIRECTORIES: [&str; 3] = ["tests/unit", "tests/e2e", "tests/nuxt"];

#[derive(Debug, Serialize)]
struct Workflow {
    name: &'static str,
    on: Triggers,
    jobs: OrderedMap<&'static str, Job>,
}

#[derive(Debug, Serialize)]
struct Triggers {
    push: Branches,
    pull_request: Branches,
}

#[derive(Debug, Serialize)]
struct Branches {
    branches: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct Job {
    #[serde(rename = "runs-on")]
    runs_on: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    needs: Option<&'static str>,
    steps: Vec<Step>,
}

#[derive(Debug, Default, Serialize)]
struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uses: Option<&'static str>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    with: OrderedMap<&'static str, &'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<&'static str>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    env: OrderedMap<&'static str, String>,
}

impl Step {
    fn run(name: &'static str, command: &'static str) -> Self {
        Self {
            name: Some(name),
            run: Some(command),
            ..Self::default()
        }
    }
}

/// Which branches a workflow guards and where its migrations point
#[derive(Debug, Clone, Copy)]
pub struct WorkflowKind {
    pub file: &'static str,
    pub name: &'static str,
    pub branches: &'static [&'static str],
    pub migrate_step: &'static str,
    pub database_secret: &'static str,
}

pub const PRODUCTION: WorkflowKind = WorkflowKind {
    file: ".github/workflows/production.yml",
    name: "Production CI",
    branches: &["main"],
    migrate_step: "Run migrations",
    database_secret: "DATABASE_URL",
};

pub const PREVIEW: WorkflowKind = WorkflowKind {
    file: ".github/workflows/preview.yml",
    name: "Preview CI",
    branches: &["preview", "develop"],
    migrate_step: "Run migrations (test database)",
    database_secret: "TEST_DATABASE_URL",
};

fn setup_steps() -> Vec<Step> {
    vec![
        Step {
            uses: Some("actions/checkout@v4"),
            ..Step::default()
        },
        Step {
            name: Some("Setup Bun"),
            uses: Some("oven-sh/setup-bun@v2"),
            with: [("bun-version", "latest")].into_iter().collect(),
            ..Step::default()
        },
        Step::run("Install dependencies", "bun install"),
    ]
}

/// A GitHub Actions workflow; the `migrate` job only exists with PostgreSQL
pub fn workflow(kind: WorkflowKind, with_database: bool) -> Result<String, serde_yaml::Error> {
    let mut build = setup_steps();
    build.extend([
        Step::run("Lint", "bun lint"),
        Step::run("Format check", "bun format"),
        Step::run("Build", "bun run build"),
        Step::run("Test", "bun test"),
    ]);

    let mut jobs = OrderedMap::new();
    jobs.insert(
        "build",
        Job {
            runs_on: "ubuntu-latest",
            needs: None,
            steps: build,
        },
    );

    if with_database {
        let mut migrate = setup_steps();
        migrate.push(Step {
            env: [(
                "DATABASE_URL",
                format!("${{{{ secrets.{} }}}}", kind.database_secret),
            )]
            .into_iter()
            .collect(),
            ..Step::run(kind.migrate_step, "bun run db:migrate")
        });
        jobs.insert(
            "migrate",
            Job {
                runs_on: "ubuntu-latest",
                needs: Some("build"),
                steps: migrate,
            },
        );
    }

    let branches = || Branches {
        branches: kind.branches.to_vec(),
    };
    serde_yaml::to_string(&Workflow {
        name: kind.name,
        on: Triggers {
            push: branches(),
            pull_request: branches(),
        },
        jobs,
    })
}

/// `shared/utils/index.ts`; the env schema is only re-exported when it was generated
pub fn shared_utils_index(selection: &Selection) -> String {
    let mut index = String::from("export * from './error-handling'\n");
    if !selection.storage.is_empty() {
        index.push_str("export * from './env-schema'\n");
    }
    index
}

/// Generate the auxiliary files, one report per unit
pub async fn generate(selection: &Selection, fs: &ProjectFs<'_>, report: &mut ScaffoldReport) {
    let mut created = true;
    for dir in TEST_DIRECTORIES {
        created &= fs.ensure_dir(dir).await;
    }
    record(report, "test directories", created);

    let with_database = selection.has_storage(StorageOption::Postgres);
    for kind in [PRODUCTION, PREVIEW] {
        let written = match workflow(kind, with_database) {
            Ok(yaml) => fs.write_file(kind.file, &yaml).await,
            Err(e) => {
                debug!(file = kind.file, error = %e, "workflow could not be rendered");
                false
            }
        };
        record(report, kind.file, written);
    }

    let error_handling = fs
        .write_file("shared/utils/error-handling.ts", templates::ERROR_HANDLING)
        .await;
    let index = fs
        .write_file("shared/utils/index.ts", &shared_utils_index(selection))
        .await;
    record(report, "shared utilities", error_handling && index);
}

fn record(report: &mut ScaffoldReport, subject: &str, ok: bool) {
    if ok {
        report.succeeded(Stage::GenerateAuxiliary, subject);
    } else {
        report.failed(Stage::GenerateAuxiliary, subject, format!("could not write {subject}"));
    }
}
