//! OS command execution
//!
//! Side effects such as toggling interfaces or running DHCP are described as
//! [`OsCommand`] values and executed through an [`OsCommandRunner`], so the
//! processor never spawns a process directly.

mod netif;

pub use netif::{down_hci_instance, down_net_interface, reset_hci_instance, up_net_interface, NetConfig};

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use std::io;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// How a command is handed to the OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Program plus argument vector, no shell involved
    Argv { program: String, args: Vec<String> },
    /// Command line interpreted by `sh -c`
    Shell(String),
}

impl Invocation {
    pub fn argv<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::Argv {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Argv { program, args } => {
                write!(f, "{}", program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Invocation::Shell(line) => f.write_str(line),
        }
    }
}

/// A named OS command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsCommand {
    /// Stable identifier, used in logs and to script failures
    pub label: &'static str,
    pub invocation: Invocation,
}

/// Executes OS commands and reports their exit code
#[async_trait]
pub trait OsCommandRunner: Send + Sync {
    /// Run to completion. `Err` means the process could not be started.
    async fn run(&self, command: &OsCommand) -> io::Result<i32>;
}

/// Runs commands on the host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl OsCommandRunner for SystemRunner {
    async fn run(&self, command: &OsCommand) -> io::Result<i32> {
        let status = match &command.invocation {
            Invocation::Argv { program, args } => {
                tokio::process::Command::new(program)
                    .args(args)
                    .status()
                    .await?
            }
            Invocation::Shell(line) => {
                tokio::process::Command::new("sh")
                    .arg("-c")
                    .arg(line)
                    .status()
                    .await?
            }
        };
        // Killed by a signal: no exit code
        Ok(status.code().unwrap_or(-1))
    }
}

/// Records commands instead of running them
#[derive(Debug, Default)]
pub struct DryRunRunner {
    executed: RwLock<Vec<OsCommand>>,
    failing: HashSet<&'static str>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report exit code 1 for every command with this label
    #[cfg(test)]
    pub fn failing(mut self, label: &'static str) -> Self {
        self.failing.insert(label);
        self
    }

    /// Commands seen so far, oldest first
    #[cfg(test)]
    pub async fn executed(&self) -> Vec<OsCommand> {
        self.executed.read().await.clone()
    }

    /// Labels of the commands seen so far
    #[cfg(test)]
    pub async fn labels(&self) -> Vec<&'static str> {
        self.executed.read().await.iter().map(|c| c.label).collect()
    }
}

#[async_trait]
impl OsCommandRunner for DryRunRunner {
    async fn run(&self, command: &OsCommand) -> io::Result<i32> {
        info!("[OS] (dry run) {}", command.invocation);
        self.executed.write().await.push(command.clone());
        Ok(if self.failing.contains(command.label) { 1 } else { 0 })
    }
}

/// Failure of a required step
#[derive(Error, Debug)]
pub enum OsError {
    #[error("{label}: could not start `{invocation}`: {source}")]
    Spawn {
        label: &'static str,
        invocation: Invocation,
        #[source]
        source: io::Error,
    },

    #[error("{label}: `{invocation}` exited with status {code}")]
    ExitStatus {
        label: &'static str,
        invocation: Invocation,
        code: i32,
    },
}

/// One entry of an execution plan
#[derive(Debug, Clone)]
pub struct Step {
    pub command: OsCommand,
    /// When set, failure aborts the plan and is returned to the caller
    pub required: bool,
}

impl Step {
    pub fn required(command: OsCommand) -> Self {
        Self { command, required: true }
    }

    pub fn best_effort(command: OsCommand) -> Self {
        Self { command, required: false }
    }
}

/// Run a single command, turning a non-zero exit into an error
pub async fn run_checked(runner: &dyn OsCommandRunner, command: &OsCommand) -> Result<(), OsError> {
    info!("[OS] Running {}", command.invocation);
    match runner.run(command).await {
        Ok(0) => Ok(()),
        Ok(code) => Err(OsError::ExitStatus {
            label: command.label,
            invocation: command.invocation.clone(),
            code,
        }),
        Err(source) => Err(OsError::Spawn {
            label: command.label,
            invocation: command.invocation.clone(),
            source,
        }),
    }
}

/// Execute steps in order.
///
/// Best-effort failures are logged and skipped. The first required failure
/// stops the plan.
pub async fn run_plan(runner: &dyn OsCommandRunner, steps: &[Step]) -> Result<(), OsError> {
    for step in steps {
        match run_checked(runner, &step.command).await {
            Ok(()) => {}
            Err(e) if step.required => return Err(e),
            Err(e) => warn!("[OS] {}", e),
        }
    }
    Ok(())
}

/// Run every command in order, logging failures and carrying on
pub async fn run_best_effort(runner: &dyn OsCommandRunner, commands: &[OsCommand]) {
    for command in commands {
        if let Err(e) = run_checked(runner, command).await {
            warn!("[OS] {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(label: &'static str) -> OsCommand {
        OsCommand {
            label,
            invocation: Invocation::Shell(format!("echo {}", label)),
        }
    }

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::argv("ifconfig", ["ethsta0", "hw", "ether", "aa:bb:cc:dd:ee:ff"]);
        assert_eq!(inv.to_string(), "ifconfig ethsta0 hw ether aa:bb:cc:dd:ee:ff");
        assert_eq!(Invocation::Shell("sudo dhclient ethsta0 -r".into()).to_string(), "sudo dhclient ethsta0 -r");
    }

    #[tokio::test]
    async fn test_best_effort_failure_does_not_stop_plan() {
        let runner = DryRunRunner::new().failing("first");
        let steps = [Step::best_effort(cmd("first")), Step::required(cmd("second"))];

        run_plan(&runner, &steps).await.unwrap();
        assert_eq!(runner.labels().await, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_required_failure_stops_plan() {
        let runner = DryRunRunner::new().failing("first");
        let steps = [Step::required(cmd("first")), Step::best_effort(cmd("second"))];

        let err = run_plan(&runner, &steps).await.unwrap_err();
        assert!(matches!(err, OsError::ExitStatus { label: "first", code: 1, .. }));
        assert_eq!(runner.labels().await, vec!["first"]);
    }

    #[tokio::test]
    async fn test_best_effort_runs_everything() {
        let runner = DryRunRunner::new().failing("first").failing("second");
        run_best_effort(&runner, &[cmd("first"), cmd("second"), cmd("third")]).await;
        assert_eq!(runner.labels().await, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_system_runner_reports_exit_code() {
        let runner = SystemRunner;
        let ok = OsCommand { label: "true", invocation: Invocation::Shell("exit 0".into()) };
        let bad = OsCommand { label: "false", invocation: Invocation::Shell("exit 3".into()) };

        assert_eq!(runner.run(&ok).await.unwrap(), 0);
        assert_eq!(runner.run(&bad).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_system_runner_spawn_failure() {
        let runner = SystemRunner;
        let missing = OsCommand {
            label: "missing",
            invocation: Invocation::argv("/nonexistent/hosted-ctrl-test-binary", Vec::<String>::new()),
        };
        let err = run_checked(&runner, &missing).await.unwrap_err();
        assert!(matches!(err, OsError::Spawn { label: "missing", .. }));
    }
}
