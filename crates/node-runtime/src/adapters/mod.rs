//! # Runtime Adapters
//!
//! Implementations of the collaborator ports the lifecycle service consumes:
//!
//! - `identity` - Enrolled users as `RoleResolver`s
//! - `bank_gateway` - `EventSink` forwarding bank transfer requests

pub mod bank_gateway;
pub mod identity;

pub use bank_gateway::BankGateway;
pub use identity::{EnrolledCaller, IdentityDirectory};
