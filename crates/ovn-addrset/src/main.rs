// # ovn-addrset
//
// Thin command line front end over `ovn-addrset-core`, for inspecting and
// repairing address sets by hand.
//
// ## Configuration
//
// Every option can also be given through the environment:
//
// - `OVN_NBCTL`: `ovn-nbctl` executable (default `ovn-nbctl`)
// - `OVN_NB_DB`: northbound database remote (default: `ovn-nbctl`'s own)
// - `OVN_NBCTL_TIMEOUT`: seconds to wait for the database (default 15)
// - `OVN_ADDRSET_LOG_LEVEL`: trace, debug, info, warn or error (default warn)
//
// ## Example
//
// ```bash
// export OVN_NB_DB=unix:/var/run/ovn/ovnnb_db.sock
//
// ovn-addrset ensure default.allow-web 10.244.1.5 10.244.2.7
// ovn-addrset list
// ovn-addrset delete default.allow-web
// ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ovn_addrset_core::{
    AddressSetEnumerator, AddressSetStore, NbctlConfig, extract_ip, extract_mac,
    hashed_address_set, nbctl,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum AddrsetExitCode {
    /// Command completed
    Success = 0,
    /// Configuration error
    ConfigError = 1,
    /// The database command failed
    RuntimeError = 2,
}

impl From<AddrsetExitCode> for ExitCode {
    fn from(code: AddrsetExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Manage OVN address sets by semantic name
#[derive(Debug, Parser)]
#[command(name = "ovn-addrset", version, about)]
struct Cli {
    /// ovn-nbctl executable
    #[arg(long, env = "OVN_NBCTL", default_value = "ovn-nbctl")]
    nbctl: String,

    /// Northbound database remote
    #[arg(long, env = "OVN_NB_DB")]
    db: Option<String>,

    /// Seconds to wait for the database
    #[arg(long, env = "OVN_NBCTL_TIMEOUT", default_value_t = 15)]
    timeout: u64,

    /// Log level
    #[arg(long, env = "OVN_ADDRSET_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the stored name for a semantic name
    Hash {
        /// Semantic name (namespace.suffix...)
        name: String,
    },
    /// List stored address sets by semantic name
    List,
    /// Create an address set or replace its addresses
    Ensure {
        /// Semantic name
        name: String,
        /// Addresses; none leaves the set empty
        addresses: Vec<String>,
    },
    /// Replace the addresses of an existing address set
    Set {
        /// Semantic name
        name: String,
        /// Addresses; none clears the set
        addresses: Vec<String>,
    },
    /// Delete an address set (missing sets are ignored)
    Delete {
        /// Semantic name, or the stored name with --hashed
        name: String,
        /// Treat NAME as an already hashed name
        #[arg(long)]
        hashed: bool,
    },
    /// Decode a pod network annotation
    Annotation {
        /// Field to extract
        field: AnnotationField,
        /// Annotation JSON
        annotation: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnnotationField {
    Ip,
    Mac,
}

impl Cli {
    fn nbctl_config(&self) -> NbctlConfig {
        let mut config = NbctlConfig::new()
            .with_program(self.nbctl.clone())
            .with_timeout_secs(self.timeout);
        config.db = self.db.clone();
        config
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            other => anyhow::bail!(
                "OVN_ADDRSET_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return AddrsetExitCode::ConfigError.into();
        }
    };

    let config = cli.nbctl_config();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return AddrsetExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AddrsetExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AddrsetExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(cli.command, config).await {
            Ok(()) => AddrsetExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                eprintln!("Error: {:#}", e);
                AddrsetExitCode::RuntimeError
            }
        }
    })
    .into()
}

async fn run(command: Command, config: NbctlConfig) -> Result<()> {
    match command {
        Command::Hash { name } => {
            println!("{}", hashed_address_set(&name));
        }
        Command::Annotation { field, annotation } => {
            let value = match field {
                AnnotationField::Ip => extract_ip(&annotation),
                AnnotationField::Mac => extract_mac(&annotation),
            };
            println!("{}", value);
        }
        Command::List => {
            let client = Arc::new(nbctl::connect(config)?);
            let names = AddressSetEnumerator::new(client).names().await?;
            debug!("Found {} named address set(s)", names.len());
            for name in names {
                println!(
                    "{}\t{}\t{}\t{}",
                    name.hashed_name(),
                    name.name,
                    name.namespace,
                    name.suffix
                );
            }
        }
        Command::Ensure { name, addresses } => {
            let store = AddressSetStore::new(Arc::new(nbctl::connect(config)?));
            let outcome = store.ensure(&name, &addresses).await?;
            println!("{:?} {}", outcome, hashed_address_set(&name));
        }
        Command::Set { name, addresses } => {
            let store = AddressSetStore::new(Arc::new(nbctl::connect(config)?));
            store
                .set_addresses(&hashed_address_set(&name), &addresses)
                .await?;
        }
        Command::Delete { name, hashed } => {
            let store = AddressSetStore::new(Arc::new(nbctl::connect(config)?));
            let hashed_name = if hashed {
                name
            } else {
                hashed_address_set(&name)
            };
            store.delete(&hashed_name).await?;
        }
    }
    Ok(())
}
