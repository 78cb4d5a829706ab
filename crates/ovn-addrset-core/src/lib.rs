// # ovn-addrset-core
//
// Address set synchronization with the OVN northbound database.
//
// ## Architecture Overview
//
// - **hash**: Maps semantic names (`namespace.suffix...`) to valid OVN
//   address set names
// - **AddressSetStore**: Create, update and delete address sets
// - **AddressSetEnumerator**: List stored address sets by semantic name
// - **NorthboundClient**: Typed access to the `Address_Set` table
//   (`NbctlClient` over `ovn-nbctl`, or `MemoryNorthbound`)
// - **CommandRunner**: Runs database commands (`NbctlProcess`)
// - **annotation**: Decodes pod network annotations
//
// ## Usage
//
// ```rust,no_run
// use std::sync::Arc;
// use ovn_addrset_core::{AddressSetEnumerator, AddressSetStore, NbctlConfig, nbctl};
//
// #[tokio::main]
// async fn main() -> ovn_addrset_core::Result<()> {
//     let client = Arc::new(nbctl::connect(NbctlConfig::default())?);
//     let store = AddressSetStore::new(client.clone());
//
//     store.ensure("default.allow-web", &["10.244.1.5"]).await?;
//
//     AddressSetEnumerator::new(client)
//         .for_each_name(|name, namespace, suffix| {
//             println!("{} ({} / {})", name, namespace, suffix);
//         })
//         .await
// }
// ```

pub mod annotation;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod hash;
pub mod membership;
pub mod memory;
pub mod nbctl;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use annotation::{OvnAnnotation, extract_ip, extract_mac};
pub use config::NbctlConfig;
pub use enumerate::{AddressSetEnumerator, AddressSetName};
pub use error::{Error, Result};
pub use hash::hashed_address_set;
pub use membership::contains;
pub use memory::MemoryNorthbound;
pub use nbctl::{NbctlClient, NbctlProcess};
pub use store::{AddressSetStore, MutationOutcome};
pub use traits::{CommandOutput, CommandRunner, NorthboundClient};
