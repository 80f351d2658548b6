pub mod inbound;

pub use inbound::{BatchLifecycleApi, BatchQueryApi, BatchScan};
