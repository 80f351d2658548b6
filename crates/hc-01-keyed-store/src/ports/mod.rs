//! # Ports
//!
//! - `outbound`: the store interface the host application implements.

pub mod outbound;
