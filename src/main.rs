//! schemakit CLI entry point
//!
//! Exit status:
//! - 0: the command succeeded and the input (if any) was valid
//! - 1: the input failed validation
//! - 2: the command failed

use schemakit::cli::{self, Outcome};

fn main() {
    match cli::run() {
        Ok(Outcome::Success) => {}
        Ok(Outcome::Invalid) => std::process::exit(1),
        Err(e) => {
            let _ = cli::write_error(e.code_str(), &e.to_string());
            eprintln!("{}: {}", e.code_str(), e);
            std::process::exit(2);
        }
    }
}
