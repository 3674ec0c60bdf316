//! Stage bookkeeping for a scaffold run
//!
//! Every unit of work records a [`StageReport`]. The run is summarized by reducing the
//! reports to an [`Outcome`]: a failed fatal stage (or a fatal error raised before a
//! stage could run) is a [`Outcome::FatalFailure`], any other failure downgrades the run
//! to [`Outcome::SuccessWithWarnings`].

use crate::error::ScaffoldError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    InstallBaseline,
    ResolvePackages,
    InstallPackages,
    RegisterModules,
    MergeConfig,
    GenerateAuxiliary,
}

impl Stage {
    /// Stages whose failure leaves nothing useful to build on
    pub fn is_fatal(&self) -> bool {
        matches!(self, Stage::Init | Stage::InstallPackages)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::InstallBaseline => "install-baseline",
            Stage::ResolvePackages => "resolve-packages",
            Stage::InstallPackages => "install-packages",
            Stage::RegisterModules => "register-modules",
            Stage::MergeConfig => "merge-config",
            Stage::GenerateAuxiliary => "generate-auxiliary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Succeeded,
    Failed(String),
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Succeeded)
    }
}

/// One recorded unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    /// What the unit worked on, e.g. a command line or a feature name
    pub subject: String,
    pub outcome: StageOutcome,
}

/// Overall result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    SuccessWithWarnings,
    FatalFailure,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Success | Outcome::SuccessWithWarnings => 0,
            Outcome::FatalFailure => 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScaffoldReport {
    entries: Vec<StageReport>,
    fatal: Option<ScaffoldError>,
}

impl ScaffoldReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: Stage, subject: impl Into<String>, outcome: StageOutcome) {
        self.entries.push(StageReport {
            stage,
            subject: subject.into(),
            outcome,
        });
    }

    pub fn succeeded(&mut self, stage: Stage, subject: impl Into<String>) {
        self.record(stage, subject, StageOutcome::Succeeded);
    }

    pub fn failed(&mut self, stage: Stage, subject: impl Into<String>, reason: impl Into<String>) {
        self.record(stage, subject, StageOutcome::Failed(reason.into()));
    }

    /// Record the error that stopped the run
    pub fn abort(&mut self, error: ScaffoldError) {
        self.fatal = Some(error);
    }

    pub fn entries(&self) -> &[StageReport] {
        &self.entries
    }

    pub fn fatal_error(&self) -> Option<&ScaffoldError> {
        self.fatal.as_ref()
    }

    /// Failed entries of non-fatal stages
    pub fn warnings(&self) -> impl Iterator<Item = &StageReport> {
        self.entries
            .iter()
            .filter(|entry| !entry.outcome.is_success() && !entry.stage.is_fatal())
    }

    /// Whether any unit of `stage` was recorded
    pub fn ran(&self, stage: Stage) -> bool {
        self.entries.iter().any(|entry| entry.stage == stage)
    }

    pub fn outcome(&self) -> Outcome {
        let fatal_stage_failed = self
            .entries
            .iter()
            .any(|entry| entry.stage.is_fatal() && !entry.outcome.is_success());
        if self.fatal.is_some() || fatal_stage_failed {
            Outcome::FatalFailure
        } else if self.warnings().next().is_some() {
            Outcome::SuccessWithWarnings
        } else {
            Outcome::Success
        }
    }
}
