// # Command Runner Trait
//
// The seam between this crate and the process that actually talks to the
// northbound database (normally `ovn-nbctl`).
//
// A runner receives the command-specific arguments only. Global options such
// as `--db` or `--timeout` are the runner's own business.
//
// ## Usage
//
// ```rust,ignore
// use ovn_addrset_core::CommandRunner;
//
// let runner = /* CommandRunner implementation */;
// let output = runner.run(&["list".to_string(), "address_set".to_string()]).await?;
// println!("{}", output.stdout);
// ```

use async_trait::async_trait;

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error (commands may warn and still succeed)
    pub stderr: String,
}

impl CommandOutput {
    /// Create an output with only stdout set
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Trait for database command runners
///
/// # Contract
///
/// - One invocation per call. No retries, no backoff.
/// - A command that exits unsuccessfully is reported as
///   [`Error::CommandFailed`](crate::Error::CommandFailed) carrying stderr.
/// - Timeouts and cancellation are implemented here, not by callers.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command with the given arguments
    ///
    /// # Returns
    ///
    /// - `Ok(CommandOutput)`: The command exited successfully
    /// - `Err(Error)`: The command could not be run, failed or timed out
    async fn run(&self, args: &[String]) -> Result<CommandOutput, crate::Error>;

    /// Name of the runner (for logging)
    fn runner_name(&self) -> &'static str;
}
