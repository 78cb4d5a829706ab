// # ovn-nbctl Process Runner
//
// `CommandRunner` that spawns the configured `ovn-nbctl` executable once per
// call and waits for it to exit.
//
// ## Timeouts
//
// `--timeout=<secs>` makes `ovn-nbctl` give up on an unreachable database by
// itself. The child is additionally bounded by a wall-clock limit slightly
// above that value and killed when it is exceeded.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error};

use crate::config::NbctlConfig;
use crate::error::{Error, Result};
use crate::traits::{CommandOutput, CommandRunner};

/// Slack added on top of the configured timeout before the child is killed
const KILL_GRACE: Duration = Duration::from_secs(5);

/// Runs `ovn-nbctl` as a child process
#[derive(Debug, Clone)]
pub struct NbctlProcess {
    config: NbctlConfig,
}

impl NbctlProcess {
    /// Create a runner from a validated configuration
    pub fn new(config: NbctlConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &NbctlConfig {
        &self.config
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.config.program.as_str())
            .chain(self.config.global_args().iter().map(String::as_str))
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl CommandRunner for NbctlProcess {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        let command_line = self.command_line(args);
        debug!("Running {}", command_line);

        let mut command = Command::new(&self.config.program);
        command
            .args(self.config.global_args())
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let limit = self.config.timeout() + KILL_GRACE;
        let output = match tokio::time::timeout(limit, command.output()).await {
            Ok(result) => result.map_err(|e| {
                error!("Failed to spawn {}: {}", self.config.program, e);
                Error::Io(e)
            })?,
            Err(_) => {
                error!("{} did not finish within {:?}", command_line, limit);
                return Err(Error::Timeout(limit));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::command_failed(
                command_line,
                output.status.to_string(),
                stderr.trim_end(),
            ));
        }

        Ok(CommandOutput { stdout, stderr })
    }

    fn runner_name(&self) -> &'static str {
        "process"
    }
}
