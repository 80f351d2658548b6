//! Role capability check, run once at the entry of every batch operation.

use super::status::Operation;
use shared_types::{ContractError, Role, RoleResolver};

/// Admit the caller if its role identifier matches the operation's role.
pub fn authorize(operation: Operation, caller: &dyn RoleResolver) -> Result<Role, ContractError> {
    let required = operation.required_role();
    let actual = caller.caller_role();
    if actual == required.id() {
        return Ok(required);
    }
    tracing::warn!(
        operation = operation.name(),
        required = required.id(),
        actual = %actual,
        "[hc-03] Caller refused"
    );
    Err(ContractError::Unauthorized {
        operation: operation.name(),
        required: required.id(),
        actual,
    })
}
