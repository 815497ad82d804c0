//! Command-line interface definitions for hostscope.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Keep a registry of nmap results and query it from an interactive shell.
///
/// Any TARGETs are scanned once before the shell starts. Inside the shell,
/// type `help` for the list of commands.
#[derive(Parser, Debug)]
#[command(name = "hostscope")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An interactive host registry driven by nmap scans", long_about = None)]
pub struct Args {
    /// Targets to scan before the shell starts (IP, hostname, or any nmap
    /// target expression)
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "HOSTSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Registry snapshot location (overrides settings)
    #[arg(long, value_name = "PATH", env = "HOSTSCOPE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Give up on a scan after this many seconds (overrides settings)
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["hostscope"]).unwrap();
        assert!(args.targets.is_empty());
        assert!(!args.verbose);
    }

    #[test]
    fn test_targets_and_flags() {
        let args = Args::try_parse_from([
            "hostscope",
            "-v",
            "--timeout",
            "900",
            "10.0.0.5",
            "scanme.nmap.org",
        ])
        .unwrap();
        assert_eq!(args.targets, vec!["10.0.0.5", "scanme.nmap.org"]);
        assert_eq!(args.timeout, Some(900));
        assert!(args.verbose);
    }
}
