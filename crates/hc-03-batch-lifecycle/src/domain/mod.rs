pub mod capability;
pub mod entities;
pub mod policy;
pub mod requests;
pub mod settlement;
pub mod status;

pub use capability::authorize;
pub use entities::*;
pub use policy::LifecyclePolicy;
pub use requests::*;
pub use settlement::{settle, AcceptedSettlement, SettlementInput, SettlementOutcome};
pub use status::{BatchStatus, Operation, TRANSITIONS};
