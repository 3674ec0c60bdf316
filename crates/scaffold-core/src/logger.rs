//! User-facing progress output
//!
//! Everything the scaffolder tells the user while it works goes through a [`Logger`]
//! handed to it explicitly. [`ConsoleLogger`] is the terminal implementation.

use colored::Colorize;

pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    /// A unit of work about to start
    fn step(&self, message: &str);
    /// A section heading
    fn title(&self, message: &str);
    fn dim(&self, message: &str);
    /// An external command line, printed before it runs
    fn command(&self, command: &str);
}

/// Colored terminal output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn info(&self, message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    fn success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow(), message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }

    fn step(&self, message: &str) {
        println!("{} {}", "→".cyan(), message);
    }

    fn title(&self, message: &str) {
        println!();
        println!("{}", message.bold().magenta());
        println!();
    }

    fn dim(&self, message: &str) {
        println!("{}", message.dimmed());
    }

    fn command(&self, command: &str) {
        println!("  {} {}", "$".dimmed(), command.dimmed());
    }
}
