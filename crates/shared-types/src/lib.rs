//! # Shared Types Crate
//!
//! Types every Harvest-Chain subsystem agrees on.
//!
//! ## Contents
//!
//! - **Entities**: `Role`, `Money`, timestamp formatting
//! - **Errors**: `ContractError`, the single failure type of a contract call
//! - **Ports**: `RoleResolver`, `Clock`, `EventSink` plus their reference adapters
//!
//! ## Design Principles
//!
//! - **Explicit collaborators**: nothing here is global; callers hand the
//!   resolver, clock and sink to the service that needs them.
//! - **Typed roles**: a role identifier string is parsed into `Role` once,
//!   at the authorization boundary.

pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::*;
pub use errors::*;
pub use ports::*;
