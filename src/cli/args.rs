//! CLI argument definitions using clap
//!
//! Commands:
//! - schemakit validate --schema <name> [--input <file>] [--config <path>]
//! - schemakit list [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemakit - structural validation of JSON documents
#[derive(Parser, Debug)]
#[command(name = "schemakit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON document against a registered schema
    Validate {
        /// Name of the schema document
        #[arg(long)]
        schema: String,

        /// JSON input file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long, default_value = "./schemakit.json")]
        config: PathBuf,
    },

    /// List registered schema names
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./schemakit.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_arguments() {
        let cli = Cli::try_parse_from(["schemakit", "validate", "--schema", "user"]).unwrap();
        match cli.command {
            Command::Validate {
                schema,
                input,
                config,
            } => {
                assert_eq!(schema, "user");
                assert!(input.is_none());
                assert_eq!(config, PathBuf::from("./schemakit.json"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_schema() {
        assert!(Cli::try_parse_from(["schemakit", "validate"]).is_err());
    }

    #[test]
    fn test_list_with_config() {
        let cli = Cli::try_parse_from(["schemakit", "list", "--config", "/etc/sk.json"]).unwrap();
        assert!(matches!(cli.command, Command::List { config } if config == PathBuf::from("/etc/sk.json")));
    }
}
