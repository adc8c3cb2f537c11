//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::config::ConfigOptions;
use crate::schema::SchemaVersion;

/// Top-level CLI parser for `reqforge`.
#[derive(Debug, Parser)]
#[command(
    name = "reqforge",
    version,
    about = "Chat-completion adapter and solution payload checks"
)]
pub struct Cli {
    /// Provider options shared by the model commands.
    #[command(flatten)]
    pub provider: ProviderArgs,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options forwarded to the provider handler.
#[derive(Debug, Clone, Args)]
pub struct ProviderArgs {
    /// Model to address; unsupported ids fall back to the default model.
    #[arg(long, global = true, env = "REQFORGE_MODEL_ID", default_value = "gpt-4o")]
    pub model_id: String,
    /// API key; `OPENAI_API_KEY` is used when omitted.
    #[arg(long, global = true)]
    pub api_key: Option<String>,
    /// Retries after the first attempt.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,
}

impl ProviderArgs {
    /// Converts the flags into the handler's option bag.
    #[must_use]
    pub fn to_options(&self) -> ConfigOptions {
        let mut options = ConfigOptions::new();
        options.insert("model_id".into(), json!(self.model_id));
        if let Some(key) = &self.api_key {
            options.insert("api_key".into(), json!(key));
        }
        if let Some(retries) = self.max_retries {
            options.insert("max_retries".into(), json!(retries));
        }
        options
    }
}

/// Schema revision selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaArg {
    /// Range-pair limits.
    V1,
    /// Min/max limits.
    V2,
    /// Max-only limits.
    V3,
}

impl From<SchemaArg> for SchemaVersion {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::V1 => Self::V1,
            SchemaArg::V2 => Self::V2,
            SchemaArg::V3 => Self::V3,
        }
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the model requests will be sent to.
    Model,
    /// Send prompts and print the reply.
    Invoke {
        /// System prompt placed before the conversation.
        #[arg(long)]
        system: Option<String>,
        /// User messages, in order.
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Check that the configured credentials and model work.
    Check,
    /// Validate a create-solution JSON payload (`-` reads stdin).
    ValidateSolution {
        /// Payload file.
        file: PathBuf,
        /// Schema revision.
        #[arg(long, value_enum, default_value_t = SchemaArg::V3)]
        schema: SchemaArg,
    },
    /// Validate an `{"id": ...}` JSON payload (`-` reads stdin).
    ValidateId {
        /// Payload file.
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, SchemaArg};
    use crate::schema::SchemaVersion;
    use clap::Parser;

    #[test]
    fn parses_invoke_with_system_prompt() {
        let cli = Cli::parse_from(["reqforge", "invoke", "--system", "be brief", "hello", "again"]);
        let Command::Invoke { system, prompt } = cli.command else { panic!("expected invoke") };
        assert_eq!(system.as_deref(), Some("be brief"));
        assert_eq!(prompt, vec!["hello", "again"]);
    }

    #[test]
    fn invoke_requires_a_prompt() {
        assert!(Cli::try_parse_from(["reqforge", "invoke"]).is_err());
    }

    #[test]
    fn provider_flags_become_options() {
        let cli = Cli::parse_from([
            "reqforge",
            "check",
            "--model-id",
            "GPT-4o-mini",
            "--api-key",
            "sk-x",
            "--max-retries",
            "0",
        ]);
        assert!(matches!(cli.command, Command::Check));
        let options = cli.provider.to_options();
        assert_eq!(options["model_id"], "GPT-4o-mini");
        assert_eq!(options["api_key"], "sk-x");
        assert_eq!(options["max_retries"], 0);
    }

    #[test]
    fn validate_solution_defaults_to_current_schema() {
        let cli = Cli::parse_from(["reqforge", "validate-solution", "payload.json"]);
        let Command::ValidateSolution { schema, .. } = cli.command else {
            panic!("expected validate-solution")
        };
        assert_eq!(SchemaVersion::from(schema), SchemaVersion::CURRENT);

        let cli = Cli::parse_from(["reqforge", "validate-solution", "p.json", "--schema", "v1"]);
        let Command::ValidateSolution { schema, .. } = cli.command else {
            panic!("expected validate-solution")
        };
        assert_eq!(schema, SchemaArg::V1);
    }
}
