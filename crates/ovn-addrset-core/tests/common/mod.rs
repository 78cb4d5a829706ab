//! Test doubles shared by the contract tests
//!
//! - `ScriptedRunner`: a `CommandRunner` that records every argument list
//!   and replays queued responses
//! - `FailingNorthbound`: a `NorthboundClient` whose every call fails

#![allow(dead_code)]

use ovn_addrset_core::error::{Error, Result};
use ovn_addrset_core::traits::{
    AddressSetOp, AddressSetQuery, AddressSetRecord, CommandOutput, CommandRunner,
    NorthboundClient,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Headings requested by every address set query
pub const HEADINGS: &str = r#"["_uuid","name","external_ids","addresses"]"#;

/// A scripted command runner
///
/// Responses are consumed in order. When the script runs dry, commands
/// succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<Vec<String>>>,
    responses: Mutex<VecDeque<Result<CommandOutput>>>,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful response
    pub fn respond(&self, stdout: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(CommandOutput::stdout(stdout)));
    }

    /// Queue a failed response
    pub fn fail(&self, stderr: &str) {
        self.responses.lock().unwrap().push_back(Err(Error::command_failed(
            "ovn-nbctl",
            "exit status: 1",
            stderr,
        )));
    }

    /// Every argument list run so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// The subcommand of each call, skipping leading options
    pub fn verbs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|args| args.iter().find(|a| !a.starts_with("--")).cloned())
            .collect()
    }
}

#[async_trait::async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[String]) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandOutput::default()))
    }

    fn runner_name(&self) -> &'static str {
        "scripted"
    }
}

/// Builder for `find address_set` JSON output
#[derive(Default)]
pub struct FindOutput {
    rows: Vec<String>,
}

impl FindOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row; a `None` name produces empty `external_ids`
    pub fn row(mut self, hashed_name: &str, name: Option<&str>, addresses: &[&str]) -> Self {
        let external_ids = match name {
            Some(name) => format!(r#"["map",[["name","{}"]]]"#, name),
            None => r#"["map",[]]"#.to_string(),
        };
        let addresses = match addresses {
            [single] => format!(r#""{}""#, single),
            many => format!(
                r#"["set",[{}]]"#,
                many.iter()
                    .map(|a| format!(r#""{}""#, a))
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        };
        self.rows.push(format!(
            r#"[["uuid","uuid-{}"],"{}",{},{}]"#,
            self.rows.len(),
            hashed_name,
            external_ids,
            addresses
        ));
        self
    }

    pub fn build(&self) -> String {
        format!(r#"{{"data":[{}],"headings":{}}}"#, self.rows.join(","), HEADINGS)
    }
}

/// A northbound client that always fails
#[derive(Default)]
pub struct FailingNorthbound {
    calls: AtomicUsize,
}

impl FailingNorthbound {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NorthboundClient for FailingNorthbound {
    async fn query(&self, _query: &AddressSetQuery) -> Result<Vec<AddressSetRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::northbound("database unavailable"))
    }

    async fn mutate(&self, _op: &AddressSetOp) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::northbound("database unavailable"))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
