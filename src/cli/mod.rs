//! Command-line interface
//!
//! - validate: check a JSON document against a named schema
//! - list: print registered schema names

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{list, list_response, run, run_command, validate, validate_document, Outcome};
pub use errors::{CliError, CliResult};
pub use io::{read_input, write_error, write_json};
