//! Decoding of `ovn-nbctl --format=json` table output
//!
//! The output is an object with `headings` (column names) and `data` (one
//! array per row, cells in heading order). Cells use the OVSDB JSON datum
//! encoding:
//!
//! | datum | encoding |
//! |---|---|
//! | string | `"text"` |
//! | uuid | `["uuid", "550e8400-..."]` |
//! | set | `["set", [atom, ...]]`, or the bare atom when it has one element |
//! | map | `["map", [[key, value], ...]]` |

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::traits::AddressSetRecord;

#[derive(Debug, Deserialize)]
struct Table {
    headings: Vec<String>,
    data: Vec<Vec<Value>>,
}

/// Decode `find address_set` output into records
///
/// Blank output (no rows, or a command that prints nothing) decodes to an
/// empty list.
pub(crate) fn parse_address_sets(stdout: &str) -> Result<Vec<AddressSetRecord>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let table: Table = serde_json::from_str(stdout)?;
    let column = |name: &str| table.headings.iter().position(|h| h == name);

    let name_idx = column("name")
        .ok_or_else(|| Error::northbound("address_set output has no name column"))?;
    let uuid_idx = column("_uuid");
    let external_ids_idx = column("external_ids");
    let addresses_idx = column("addresses");

    let mut records = Vec::with_capacity(table.data.len());
    for row in &table.data {
        let cell = |idx: usize| {
            row.get(idx).ok_or_else(|| {
                Error::northbound(format!(
                    "address_set row has {} cells, expected {}",
                    row.len(),
                    table.headings.len()
                ))
            })
        };

        let mut record = AddressSetRecord::new(atom_string(cell(name_idx)?)?);
        if let Some(idx) = uuid_idx {
            record.uuid = Some(atom_string(cell(idx)?)?);
        }
        if let Some(idx) = external_ids_idx {
            record.external_ids = map_pairs(cell(idx)?)?;
        }
        if let Some(idx) = addresses_idx {
            record.addresses = set_strings(cell(idx)?)?;
        }
        records.push(record);
    }

    Ok(records)
}

fn atom_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Array(tagged) => match tagged.as_slice() {
            [Value::String(tag), Value::String(s)] if tag == "uuid" || tag == "named-uuid" => {
                Ok(s.clone())
            }
            _ => Err(unexpected("atom", value)),
        },
        _ => Err(unexpected("atom", value)),
    }
}

fn set_strings(value: &Value) -> Result<BTreeSet<String>> {
    if let Value::Array(tagged) = value
        && let [Value::String(tag), Value::Array(elements)] = tagged.as_slice()
        && tag == "set"
    {
        return elements.iter().map(atom_string).collect();
    }

    Ok(BTreeSet::from([atom_string(value)?]))
}

fn map_pairs(value: &Value) -> Result<BTreeMap<String, String>> {
    let pairs = match value {
        Value::Array(tagged) => match tagged.as_slice() {
            [Value::String(tag), Value::Array(pairs)] if tag == "map" => pairs,
            _ => return Err(unexpected("map", value)),
        },
        _ => return Err(unexpected("map", value)),
    };

    pairs
        .iter()
        .map(|pair| match pair {
            Value::Array(kv) => match kv.as_slice() {
                [k, v] => Ok((atom_string(k)?, atom_string(v)?)),
                _ => Err(unexpected("map pair", pair)),
            },
            _ => Err(unexpected("map pair", pair)),
        })
        .collect()
}

fn unexpected(kind: &str, value: &Value) -> Error {
    Error::northbound(format!("unexpected OVSDB {} encoding: {}", kind, value))
}
