// # ovn-nbctl Northbound Client
//
// Translates typed address set queries and mutations into `ovn-nbctl`
// argument lists and runs them through a `CommandRunner`.
//
// ## Commands
//
// | operation | arguments |
// |---|---|
// | query | `--format=json --columns=_uuid,name,external_ids,addresses find address_set [name=<h>]` |
// | create | `create address_set name=<h> external-ids:name=<n> [addresses=<ip> <ip> ...]` |
// | set | `set address_set <h> addresses=<ip> <ip> ...` |
// | clear | `clear address_set <h> addresses` |
// | destroy | `--if-exists destroy address_set <h>` |
//
// String values are written as quoted OVSDB atoms so that IPv6 literals and
// arbitrary semantic names survive the `ovn-nbctl` value parser.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::output::parse_address_sets;
use crate::error::{Error, Result};
use crate::traits::{AddressSetOp, AddressSetQuery, AddressSetRecord, CommandRunner, NorthboundClient};

const TABLE: &str = "address_set";
const QUERY_COLUMNS: &str = "--columns=_uuid,name,external_ids,addresses";

/// Northbound client backed by `ovn-nbctl`
#[derive(Clone)]
pub struct NbctlClient {
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for NbctlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NbctlClient")
            .field("runner", &self.runner.runner_name())
            .finish()
    }
}

impl NbctlClient {
    /// Create a client over the given runner
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Arguments for a query
    pub fn query_args(query: &AddressSetQuery) -> Result<Vec<String>> {
        let mut args = vec![
            "--format=json".to_string(),
            QUERY_COLUMNS.to_string(),
            "find".to_string(),
            TABLE.to_string(),
        ];
        if let AddressSetQuery::ByName(hashed_name) = query {
            args.push(format!("name={}", record_ref(hashed_name)?));
        }
        Ok(args)
    }

    /// Arguments for a mutation
    pub fn mutate_args(op: &AddressSetOp) -> Result<Vec<String>> {
        let args = match op {
            AddressSetOp::Create {
                hashed_name,
                name,
                addresses,
            } => {
                let mut args = vec![
                    "create".to_string(),
                    TABLE.to_string(),
                    format!("name={}", record_ref(hashed_name)?),
                    format!("external-ids:name={}", quote(name)),
                ];
                if !addresses.is_empty() {
                    args.push(format!("addresses={}", address_list(addresses)));
                }
                args
            }
            AddressSetOp::SetAddresses {
                hashed_name,
                addresses,
            } => {
                if addresses.is_empty() {
                    return Err(Error::invalid_input(
                        "set with no addresses; clear the column instead",
                    ));
                }
                vec![
                    "set".to_string(),
                    TABLE.to_string(),
                    record_ref(hashed_name)?.to_string(),
                    format!("addresses={}", address_list(addresses)),
                ]
            }
            AddressSetOp::ClearAddresses { hashed_name } => vec![
                "clear".to_string(),
                TABLE.to_string(),
                record_ref(hashed_name)?.to_string(),
                "addresses".to_string(),
            ],
            AddressSetOp::DestroyIfExists { hashed_name } => vec![
                "--if-exists".to_string(),
                "destroy".to_string(),
                TABLE.to_string(),
                record_ref(hashed_name)?.to_string(),
            ],
        };
        Ok(args)
    }
}

#[async_trait]
impl NorthboundClient for NbctlClient {
    async fn query(&self, query: &AddressSetQuery) -> Result<Vec<AddressSetRecord>> {
        let args = Self::query_args(query)?;
        debug!("nbctl {:?}", args);
        let output = self.runner.run(&args).await?;
        parse_address_sets(&output.stdout)
    }

    async fn mutate(&self, op: &AddressSetOp) -> Result<()> {
        let args = Self::mutate_args(op)?;
        debug!("nbctl {:?}", args);
        self.runner.run(&args).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "ovn-nbctl"
    }
}

/// A hashed name used as a bare record reference
///
/// Record references are not quoted by `ovn-nbctl`, so anything that would
/// need quoting is rejected instead.
fn record_ref(hashed_name: &str) -> Result<&str> {
    let valid = !hashed_name.is_empty()
        && hashed_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(hashed_name)
    } else {
        Err(Error::invalid_input(format!(
            "{:?} is not a valid address set name",
            hashed_name
        )))
    }
}

/// Quote a string as an OVSDB atom (JSON string syntax)
fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn address_list(addresses: &[String]) -> String {
    addresses
        .iter()
        .map(|address| quote(address))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_query_args() {
        assert_eq!(
            NbctlClient::query_args(&AddressSetQuery::All).unwrap(),
            strings(&["--format=json", QUERY_COLUMNS, "find", "address_set"])
        );
        assert_eq!(
            NbctlClient::query_args(&AddressSetQuery::by_name("a123")).unwrap(),
            strings(&["--format=json", QUERY_COLUMNS, "find", "address_set", "name=a123"])
        );
    }

    #[test]
    fn test_create_args() {
        let op = AddressSetOp::Create {
            hashed_name: "a123".to_string(),
            name: "ns1.0".to_string(),
            addresses: vec!["10.0.0.1".to_string(), "fd00::1".to_string()],
        };
        assert_eq!(
            NbctlClient::mutate_args(&op).unwrap(),
            strings(&[
                "create",
                "address_set",
                "name=a123",
                "external-ids:name=\"ns1.0\"",
                "addresses=\"10.0.0.1\" \"fd00::1\"",
            ])
        );
    }

    #[test]
    fn test_create_without_addresses_omits_column() {
        let op = AddressSetOp::Create {
            hashed_name: "a123".to_string(),
            name: "ns1".to_string(),
            addresses: Vec::new(),
        };
        let args = NbctlClient::mutate_args(&op).unwrap();
        assert_eq!(args.len(), 4);
        assert!(!args.iter().any(|a| a.starts_with("addresses")));
    }

    #[test]
    fn test_set_clear_destroy_args() {
        let set = AddressSetOp::SetAddresses {
            hashed_name: "a1".to_string(),
            addresses: vec!["3.3.3.3".to_string()],
        };
        assert_eq!(
            NbctlClient::mutate_args(&set).unwrap(),
            strings(&["set", "address_set", "a1", "addresses=\"3.3.3.3\""])
        );

        let clear = AddressSetOp::ClearAddresses {
            hashed_name: "a1".to_string(),
        };
        assert_eq!(
            NbctlClient::mutate_args(&clear).unwrap(),
            strings(&["clear", "address_set", "a1", "addresses"])
        );

        let destroy = AddressSetOp::DestroyIfExists {
            hashed_name: "a1".to_string(),
        };
        assert_eq!(
            NbctlClient::mutate_args(&destroy).unwrap(),
            strings(&["--if-exists", "destroy", "address_set", "a1"])
        );
    }

    #[test]
    fn test_rejects_unusable_input() {
        let set = AddressSetOp::SetAddresses {
            hashed_name: "a1".to_string(),
            addresses: Vec::new(),
        };
        assert!(matches!(
            NbctlClient::mutate_args(&set),
            Err(Error::InvalidInput(_))
        ));

        let destroy = AddressSetOp::DestroyIfExists {
            hashed_name: "ns1.0".to_string(),
        };
        assert!(NbctlClient::mutate_args(&destroy).is_err());
        assert!(NbctlClient::query_args(&AddressSetQuery::by_name("")).is_err());
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"we"ird\name"#), r#""we\"ird\\name""#);
    }
}
