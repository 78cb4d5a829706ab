//! Configuration types
//!
//! This module defines how `ovn-nbctl` is invoked.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `ovn-nbctl` invocation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NbctlConfig {
    /// Executable to spawn
    #[serde(default = "default_program")]
    pub program: String,

    /// Northbound database remote (e.g. `unix:/var/run/ovn/ovnnb_db.sock`)
    ///
    /// When unset, `ovn-nbctl` uses its compiled-in default socket.
    #[serde(default)]
    pub db: Option<String>,

    /// Seconds `ovn-nbctl` may wait for the database (`--timeout`)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra global options placed before every command
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl NbctlConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            program: default_program(),
            db: None,
            timeout_secs: default_timeout_secs(),
            extra_args: Vec::new(),
        }
    }

    /// Set the database remote
    pub fn with_db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    /// Set the timeout in seconds
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Global options passed ahead of every command
    pub fn global_args(&self) -> Vec<String> {
        let mut args = vec![format!("--timeout={}", self.timeout_secs)];
        if let Some(db) = &self.db {
            args.push(format!("--db={}", db));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.program.trim().is_empty() {
            return Err(crate::Error::config("nbctl program cannot be empty"));
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "nbctl timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        if let Some(db) = &self.db
            && db.trim().is_empty()
        {
            return Err(crate::Error::config("nbctl db remote cannot be empty"));
        }

        Ok(())
    }
}

impl Default for NbctlConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_program() -> String {
    "ovn-nbctl".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}
