//! Core traits
//!
//! - [`CommandRunner`]: Run a database command and capture its output
//! - [`NorthboundClient`]: Typed queries and mutations of address sets

pub mod command_runner;
pub mod northbound;

pub use command_runner::{CommandOutput, CommandRunner};
pub use northbound::{
    AddressSetOp, AddressSetQuery, AddressSetRecord, EXTERNAL_ID_NAME, NorthboundClient,
};
