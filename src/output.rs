//! Output formatting.
//!
//! Shell output goes to whatever writer the shell was given. The `print_*`
//! helpers are for the binary's own diagnostics and always use the terminal.

use crate::types::Host;
use console::style;
use std::io::{self, Write};

/// Command names listed by `help`.
pub const COMMANDS: [&str; 5] = ["list", "show", "scan", "help", "quit"];

/// Usage hint for `list` without an address.
pub const LIST_USAGE: &str = "usage: list [ip]";

/// Write each port of `host` as `<number>/<protocol> <state> <service>`.
pub fn write_ports<W: Write>(out: &mut W, host: &Host) -> io::Result<()> {
    for port in &host.ports {
        writeln!(out, "{}", port)?;
    }
    Ok(())
}

/// Write one address per line.
pub fn write_addresses<W, I, S>(out: &mut W, addresses: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for address in addresses {
        writeln!(out, "{}", address.as_ref())?;
    }
    Ok(())
}

/// Write the command list.
pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", style("Available commands:").bold())?;
    for command in COMMANDS {
        writeln!(out, "{}", command)?;
    }
    Ok(())
}

/// Write an error line.
pub fn write_error<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("Error:").red().bold(), msg)
}

/// Write an informational line.
pub fn write_info<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("ℹ").blue().bold(), msg)
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}
