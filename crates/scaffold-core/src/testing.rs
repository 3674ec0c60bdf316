//! Test doubles shared by the unit tests

use crate::logger::Logger;
use crate::runtime::{CommandOutput, CommandRunner, RunOptions};
use crate::orchestrator::Confirmation;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Info,
    Success,
    Warn,
    Error,
    Step,
    Title,
    Dim,
    Command,
}

#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Kind, String)>>,
}

impl RecordingLogger {
    fn push(&self, kind: Kind, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((kind, message.to_string()));
    }

    pub fn of(&self, kind: Kind) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn commands(&self) -> Vec<String> {
        self.of(Kind::Command)
    }

    pub fn steps(&self) -> Vec<String> {
        self.of(Kind::Step)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.of(Kind::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.of(Kind::Error)
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.push(Kind::Info, message);
    }
    fn success(&self, message: &str) {
        self.push(Kind::Success, message);
    }
    fn warn(&self, message: &str) {
        self.push(Kind::Warn, message);
    }
    fn error(&self, message: &str) {
        self.push(Kind::Error, message);
    }
    fn step(&self, message: &str) {
        self.push(Kind::Step, message);
    }
    fn title(&self, message: &str) {
        self.push(Kind::Title, message);
    }
    fn dim(&self, message: &str) {
        self.push(Kind::Dim, message);
    }
    fn command(&self, command: &str) {
        self.push(Kind::Command, command);
    }
}

/// A file a scripted command "creates" relative to its working directory
#[derive(Debug, Clone)]
struct Creates {
    pattern: String,
    path: PathBuf,
    content: String,
}

/// Command runner that records every call and answers from a script
///
/// Commands containing a `fail_on` pattern fail; `creates` simulates the side effects
/// of generators such as `bun create nuxt`.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    failures: Vec<String>,
    creates: Vec<Creates>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn fail_on(mut self, pattern: &str) -> Self {
        self.failures.push(pattern.to_string());
        self
    }

    pub fn creates(mut self, pattern: &str, path: impl Into<PathBuf>, content: &str) -> Self {
        self.creates.push(Creates {
            pattern: pattern.to_string(),
            path: path.into(),
            content: content.to_string(),
        });
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ran(&self, pattern: &str) -> bool {
        self.commands().iter().any(|c| c.contains(pattern))
    }

    fn create_files(&self, command: &str, cwd: &Path) {
        for create in self.creates.iter().filter(|c| command.contains(&c.pattern)) {
            let path = cwd.join(&create.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, &create.content).unwrap();
        }
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &str, options: RunOptions<'_>) -> CommandOutput {
        self.calls.lock().unwrap().push(command.to_string());
        if options.dry_run {
            return CommandOutput::succeeded("");
        }
        if self.failures.iter().any(|pattern| command.contains(pattern)) {
            return CommandOutput::failed(format!("scripted failure: {command}"));
        }
        self.create_files(command, options.cwd);
        CommandOutput::succeeded("")
    }
}

/// Answers every confirmation with a fixed value and counts the questions
#[derive(Debug)]
pub struct FixedConfirmation {
    answer: bool,
    asked: Mutex<usize>,
}

impl FixedConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        *self.asked.lock().unwrap()
    }
}

impl Confirmation for FixedConfirmation {
    fn confirm_non_empty_directory(&self, _dir: &Path, _entries: usize) -> bool {
        *self.asked.lock().unwrap() += 1;
        self.answer
    }
}
