// # ovn-nbctl Backend
//
// - `NbctlClient`: `NorthboundClient` speaking the `ovn-nbctl` command language
// - `NbctlProcess`: `CommandRunner` spawning the `ovn-nbctl` executable

pub mod client;
mod output;
pub mod process;

pub use client::NbctlClient;
pub use process::NbctlProcess;

use std::sync::Arc;

use crate::config::NbctlConfig;
use crate::error::Result;

/// Build a client that spawns `ovn-nbctl` according to `config`
pub fn connect(config: NbctlConfig) -> Result<NbctlClient> {
    let runner = NbctlProcess::new(config)?;
    Ok(NbctlClient::new(Arc::new(runner)))
}
