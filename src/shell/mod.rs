//! Interactive command shell.
//!
//! Reads one command per line and runs it against the registry. The shell
//! owns the [`Registry`], the scanner, and the snapshot store; nothing here
//! is global, so tests build a shell around a fake scanner and a
//! [`MemoryStore`](crate::storage::MemoryStore).
//!
//! `scan` is the only command that can fail. What happens then is decided by
//! [`ScanErrorPolicy`]: by default the session ends and the error reaches the
//! caller.

mod command;

pub use command::Command;

use crate::config::ScanErrorPolicy;
use crate::error::{ShellError, ShellResult};
use crate::output;
use crate::scanner::ScanBackend;
use crate::storage::{Registry, SnapshotStore};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// Prompt written before every line is read.
pub const PROMPT: &str = "> ";

/// Shell state after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    /// Waiting for the next command.
    Prompting,
    /// `quit` was entered.
    Stopped,
}

/// What to do with a failed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Abort,
    Report,
}

fn disposition(error: &ShellError, policy: ScanErrorPolicy) -> Disposition {
    match (error, policy) {
        // a broken terminal cannot be reported on
        (ShellError::Io(_), _) => Disposition::Abort,
        (_, ScanErrorPolicy::FailFast) => Disposition::Abort,
        (_, ScanErrorPolicy::Continue) => Disposition::Report,
    }
}

/// The interactive shell.
pub struct Shell<S, P> {
    registry: Registry,
    scanner: S,
    store: P,
    policy: ScanErrorPolicy,
}

impl<S, P> Shell<S, P>
where
    S: ScanBackend,
    P: SnapshotStore,
{
    /// Create a shell around an already loaded registry.
    pub fn new(registry: Registry, scanner: S, store: P) -> Self {
        Self {
            registry,
            scanner,
            store,
            policy: ScanErrorPolicy::default(),
        }
    }

    /// Set the scan failure policy.
    pub fn with_policy(mut self, policy: ScanErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get the snapshot store.
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Get the scanner.
    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    /// Scan `targets`, merge the hosts found, and save the registry.
    ///
    /// If saving fails the merged hosts stay in memory and the error is
    /// returned. Returns the number of hosts stored.
    pub async fn scan_targets(&mut self, targets: &[String]) -> ShellResult<usize> {
        let hosts = self.scanner.scan(targets).await?;
        let stored = self.registry.merge(hosts);
        self.registry.save(&self.store)?;
        Ok(stored)
    }

    /// Run the one-shot scan given before the shell starts.
    ///
    /// A failure here never keeps the shell from starting, whatever the
    /// policy: the error is handed back for the caller to report. An empty
    /// target list does nothing.
    pub async fn startup_scan(&mut self, targets: &[String]) -> Option<ShellError> {
        if targets.is_empty() {
            return None;
        }

        match self.scan_targets(targets).await {
            Ok(stored) => {
                debug!(stored, known = self.registry.len(), "startup scan finished");
                None
            }
            Err(e) => {
                warn!(error = %e, "startup scan failed");
                Some(e)
            }
        }
    }

    /// Run one command, writing its output to `out`.
    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> ShellResult<ShellState> {
        debug!(?command, "dispatching");

        match command {
            Command::List(None) => writeln!(out, "{}", output::LIST_USAGE)?,
            Command::List(Some(address)) => match self.registry.get(&address) {
                Some(host) => {
                    if host.ports.is_empty() {
                        debug!(%address, "host was scanned but reported no ports");
                    }
                    output::write_ports(out, host)?;
                }
                None => debug!(%address, "address has never been scanned"),
            },
            Command::Show => output::write_addresses(out, self.registry.addresses())?,
            Command::Scan(targets) => self.scan_command(targets, out).await?,
            Command::Help => output::write_help(out)?,
            Command::Quit => return Ok(ShellState::Stopped),
            Command::Unknown(name) => {
                output::write_error(out, &format!("command '{}' not found", name))?
            }
        }

        Ok(ShellState::Prompting)
    }

    async fn scan_command<W: Write>(&mut self, targets: Vec<String>, out: &mut W) -> ShellResult<()> {
        let targets = if targets.is_empty() {
            let known = self.registry.addresses();
            if known.is_empty() {
                output::write_info(out, "no known hosts to rescan")?;
                return Ok(());
            }
            known
        } else {
            targets
        };

        match self.scan_targets(&targets).await {
            Ok(stored) => output::write_info(
                out,
                &format!(
                    "{} host(s) updated, {} known",
                    stored,
                    self.registry.len()
                ),
            )?,
            Err(e) => match disposition(&e, self.policy) {
                Disposition::Abort => return Err(e),
                Disposition::Report => {
                    warn!(error = %e, "scan failed, continuing");
                    output::write_error(out, &e.to_string())?;
                }
            },
        }

        Ok(())
    }

    /// Prompt, read, and execute lines until `quit` or end of input.
    ///
    /// Input bytes that are not UTF-8 are replaced, so a garbled line is an
    /// unknown command rather than the end of the session.
    pub async fn run<R, W>(&mut self, mut input: R, out: &mut W) -> ShellResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut buf = Vec::new();

        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                writeln!(out)?;
                debug!("end of input");
                return Ok(());
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);

            if self.execute(Command::parse(line), out).await? == ShellState::Stopped {
                return Ok(());
            }
        }
    }
}
