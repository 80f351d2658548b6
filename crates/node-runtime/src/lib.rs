//! # Node Runtime Library
//!
//! Hosts the Harvest-Chain contract on one machine. The `main.rs` binary is
//! a thin CLI over this library.
//!
//! ## Modules
//!
//! - `container/` - Configuration, store selection and wiring
//! - `adapters/` - Identity directory and bank gateway event sink
//! - `dispatch/` - Name-addressed calls with positional string arguments

pub mod adapters;
pub mod container;
pub mod dispatch;

pub use adapters::{BankGateway, EnrolledCaller, IdentityDirectory};
pub use container::{
    load_config, ConfigError, ContainerError, RuntimeConfig, RuntimeContainer, StorageBackend,
};
pub use dispatch::{DispatchError, Dispatcher, Function};
