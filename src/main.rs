//! username-guard - check usernames against an allowed/prohibited policy
//!
//! # Usage
//!
//! ```bash
//! # Check names given as arguments
//! username-guard --config policy.toml alice bob root
//!
//! # Or read names from stdin, one per line
//! printf 'alice\nroot\n' | username-guard --config policy.toml
//!
//! # Inline JSON configuration
//! username-guard --json '{"control_type":"prohibited","prohibited":["root"]}' root
//! ```
//!
//! Prints one JSON verdict per name. Exit code 0 when all names were
//! admissible, 1 when any was rejected, 2 on a configuration defect.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use username_guard::{Checker, ConfigError};

/// Print version information
fn print_version() {
    println!("username-guard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"username-guard - check usernames against an allowed/prohibited policy

USAGE:
    username-guard [OPTIONS] [USERNAME...]

    With no USERNAME arguments, names are read from stdin, one per line.

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Path to a TOML policy file
    -j, --json CONFIG       Inline JSON policy

    Without --config or --json, the policy is read from the default
    location (~/.config/username-guard/config.toml); if no file exists
    there, checking is disabled and every name is admissible.

EXIT CODES:
    0    all names admissible
    1    at least one name rejected
    2    configuration defect
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    config_path: Option<String>,
    config_json: Option<String>,
    usernames: Vec<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            config_path: None,
            config_json: None,
            usernames: Vec::new(),
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                "-j" | "--json" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_json = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                arg if arg.starts_with("--json=") => {
                    let json = arg.trim_start_matches("--json=");
                    result.config_json = Some(json.to_string());
                }
                other => result.usernames.push(other.to_string()),
            }
            i += 1;
        }

        result
    }
}

/// Per-name verdict printed to stdout
#[derive(Serialize)]
struct Verdict<'a> {
    username: &'a str,
    allowed: bool,
}

fn load_checker(args: &Args) -> Result<Checker, ConfigError> {
    if let Some(ref json) = args.config_json {
        return Checker::from_json_str(json);
    }
    if let Some(ref path) = args.config_path {
        return Checker::from_toml_file(Path::new(path));
    }

    match username_guard::config::default_config_path() {
        Some(path) if path.exists() => Checker::from_toml_file(&path),
        _ => {
            eprintln!("Warning: no policy configured, all usernames admissible");
            Checker::from_json_str(r#"{"control_type":"disabled"}"#)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    // Fail fast: a defective policy is a startup error, not a per-name one.
    let checker = match load_checker(&args) {
        Ok(checker) => checker,
        Err(e) => {
            eprintln!("Error: invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    let usernames = if args.usernames.is_empty() {
        io::stdin().lock().lines().map_while(Result::ok).collect()
    } else {
        args.usernames
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let mut all_allowed = true;

    for username in &usernames {
        let allowed = checker.check(username);
        all_allowed &= allowed;

        let verdict = Verdict {
            username: username.as_str(),
            allowed,
        };
        let json = serde_json::to_string(&verdict).unwrap_or_else(|_| "{}".to_string());
        let _ = writeln!(handle, "{}", json);
    }
    let _ = handle.flush();

    if all_allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
