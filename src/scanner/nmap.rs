//! nmap invocation.
//!
//! Runs `nmap -oX - -p- <targets...>` as a child process, waits for it, and
//! decodes the XML it wrote to stdout. This is the only place hostscope
//! executes another program.

use crate::error::{ScanError, ScanResult};
use crate::report;
use crate::scanner::traits::ScanBackend;
use crate::types::Host;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Fixed options: XML report on stdout, all 65535 ports.
pub const SCAN_ARGS: [&str; 3] = ["-oX", "-", "-p-"];

/// How long a timed-out scanner gets to exit after SIGTERM.
const KILL_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
enum Signal {
    Terminate,
    Kill,
}

/// Send `signal` to every process in the group led by `leader`.
#[cfg(unix)]
fn signal_group(leader: Option<u32>, signal: Signal) {
    let Some(pgid) = leader.and_then(|pid| libc::pid_t::try_from(pid).ok()) else {
        return;
    };
    let signo = match signal {
        Signal::Terminate => libc::SIGTERM,
        Signal::Kill => libc::SIGKILL,
    };

    // SAFETY: killpg only sends a signal; the group was created for this scan
    // and the leader has not been reaped yet.
    if unsafe { libc::killpg(pgid, signo) } != 0 {
        debug!(pgid, ?signal, error = %std::io::Error::last_os_error(), "killpg failed");
    }
}

/// Without process groups only the direct child is killed, on drop.
#[cfg(not(unix))]
fn signal_group(_leader: Option<u32>, _signal: Signal) {}

/// Scanner backend that shells out to nmap.
///
/// # Performance Characteristics
///
/// - **Blocking**: the caller waits for the whole scan; a full port range
///   scan of a single host commonly takes minutes
/// - **Timeout**: none by default; [`with_timeout`](Self::with_timeout)
///   stops the scanner's whole process group when the limit passes
/// - **Privileges**: whatever nmap needs; use a wrapper such as `sudo` via
///   [`with_leading_args`](Self::with_leading_args)
#[derive(Debug, Clone)]
pub struct NmapScanner {
    program: String,
    leading_args: Vec<String>,
    timeout: Option<Duration>,
}

impl NmapScanner {
    /// Default executable name, looked up on `PATH`.
    pub const DEFAULT_PROGRAM: &'static str = "nmap";

    /// Create a scanner that runs `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            timeout: None,
        }
    }

    /// Build a scanner from a command vector such as `["sudo", "nmap"]`.
    ///
    /// Returns `None` for an empty vector.
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, rest) = command.split_first()?;
        Some(Self::new(program.clone()).with_leading_args(rest.to_vec()))
    }

    /// Arguments placed between the program and the fixed scan options.
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    /// Set the timeout. `None` waits for as long as the scan takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the program that will be executed.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full argument list passed to the program for `targets`.
    pub fn args(&self, targets: &[String]) -> Vec<String> {
        self.leading_args
            .iter()
            .cloned()
            .chain(SCAN_ARGS.iter().map(|arg| arg.to_string()))
            .chain(targets.iter().cloned())
            .collect()
    }

    async fn run(&self, targets: &[String]) -> ScanResult<std::process::Output> {
        let mut command = Command::new(&self.program);
        command
            .args(self.args(targets))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // own process group, so a timeout reaches nmap behind a wrapper too
        #[cfg(unix)]
        command.process_group(0);

        debug!(program = %self.program, ?targets, timeout = ?self.timeout, "starting scanner");

        let child = command.spawn().map_err(|e| self.unavailable(e))?;
        let group = child.id();
        let output = child.wait_with_output();
        tokio::pin!(output);

        let output = match self.timeout {
            Some(limit) => match timeout(limit, &mut output).await {
                Ok(output) => output,
                Err(_) => {
                    self.stop_group(group, &mut output).await;
                    return Err(ScanError::ScanTimedOut(limit));
                }
            },
            None => output.await,
        };

        output.map_err(|e| self.unavailable(e))
    }

    /// Terminate the scanner's process group after a timeout.
    ///
    /// SIGTERM first: `sudo` relays it to an nmap the caller may not signal
    /// directly. Whatever is left after the grace period gets SIGKILL.
    async fn stop_group<F>(&self, group: Option<u32>, output: &mut F)
    where
        F: std::future::Future + Unpin,
    {
        warn!(program = %self.program, "scan timed out, stopping scanner");
        signal_group(group, Signal::Terminate);
        if timeout(KILL_GRACE, output).await.is_err() {
            signal_group(group, Signal::Kill);
        }
    }

    fn unavailable(&self, e: std::io::Error) -> ScanError {
        ScanError::ScanUnavailable {
            program: self.program.clone(),
            reason: e.to_string(),
        }
    }
}

impl Default for NmapScanner {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

#[async_trait]
impl ScanBackend for NmapScanner {
    async fn scan(&self, targets: &[String]) -> ScanResult<Vec<Host>> {
        validate_targets(targets)?;

        let output = self.run(targets).await?;

        if !output.status.success() {
            return Err(ScanError::ScanFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| ScanError::MalformedReport(format!("report is not UTF-8: {}", e)))?;
        let hosts = report::parse(&stdout)?;

        info!(targets = targets.len(), hosts = hosts.len(), "scan finished");
        Ok(hosts)
    }
}

/// Reject target lists the scanner must never see.
///
/// A target starting with `-` would be read as an nmap option.
fn validate_targets(targets: &[String]) -> ScanResult<()> {
    if targets.is_empty() {
        return Err(ScanError::InvalidTargets("no targets given".to_string()));
    }

    for target in targets {
        if target.trim().is_empty() {
            return Err(ScanError::InvalidTargets("empty target".to_string()));
        }
        if target.starts_with('-') {
            return Err(ScanError::InvalidTargets(format!(
                "'{}' looks like an option, not a target",
                target
            )));
        }
    }

    Ok(())
}
