//! Product configuration trait for the CLI binary
//!
//! The binary describes the product it scaffolds (identity, docs, the initializer it runs)
//! through this trait; the prompt layer and the orchestrator read everything from it.

use crate::orchestrator::DEFAULT_INIT_TEMPLATE;
use crate::selection::Selection;

pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Initializer command template; `{name}` is replaced with the project directory
    fn init_command_template(&self) -> &'static str {
        DEFAULT_INIT_TEMPLATE
    }

    /// Environment variable that overrides [`ProductConfig::init_command_template`]
    fn init_command_env(&self) -> &'static str;

    /// Instructions shown after the project was created
    fn next_steps(&self, selection: &Selection) -> Vec<String>;

    /// The initializer template, honoring the environment override
    fn resolve_init_command(&self) -> String {
        std::env::var(self.init_command_env())
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.init_command_template().to_string())
    }
}
