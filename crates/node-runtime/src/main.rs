//! # Harvest-Chain Node Runtime
//!
//! Runs one contract call against the configured store and prints the JSON
//! result:
//!
//! ```text
//! node-runtime InitializeWallets
//! node-runtime --identity ProducerUser RegisterHarvest KOPI-001 "Pak Budi" \
//!     "-7.315, 110.173" Temanggung Arabica 10000
//! node-runtime ListAllBatches
//! ```
//!
//! Configuration comes from `HC_*` environment variables; the log filter
//! from `HC_LOG` (default `info`). Logs go to stderr, results to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use node_runtime::container::config::DEFAULT_LOG_FILTER;
use node_runtime::container::{load_config, RuntimeContainer};
use node_runtime::Function;

/// Harvest-Chain local contract runner
#[derive(Parser, Debug)]
#[command(name = "node-runtime")]
#[command(about = "Run one Harvest-Chain contract function against the local store")]
struct Args {
    /// Enrolled identity to call as
    #[arg(short, long, default_value = "ProducerUser")]
    identity: String,

    /// Print the callable functions and exit
    #[arg(long)]
    list_functions: bool,

    /// Contract function name, e.g. RegisterHarvest
    #[arg(required_unless_present = "list_functions")]
    function: Option<String>,

    /// Positional arguments of the function
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if args.list_functions {
        for function in Function::ALL {
            println!("{}", function.listing());
        }
        return Ok(());
    }
    let function = args.function.context("No function given")?;

    let mut container =
        RuntimeContainer::new(config).context("Failed to start the node runtime")?;

    let result = container
        .dispatcher
        .invoke(&args.identity, &function, &args.args)
        .with_context(|| format!("{function} failed for identity {}", args.identity))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to render result")?
    );

    let forwarded = container.bank_gateway.forwarded();
    if forwarded > 0 {
        tracing::info!(forwarded, "[runtime] Bank transfer requests handed off");
    }
    Ok(())
}
