//! # Identity Directory Adapter
//!
//! Maps enrolled user identities onto the role they act for. The resolved
//! identity is the `RoleResolver` handed to the lifecycle service.

use std::collections::BTreeMap;

use shared_types::{Role, RoleResolver};

/// Enrolled identities and their roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDirectory {
    members: BTreeMap<String, Role>,
}

impl Default for IdentityDirectory {
    /// One enrolled user per role.
    fn default() -> Self {
        let mut directory = Self::empty();
        directory.enroll("ProducerUser", Role::Producer);
        directory.enroll("LogisticsUser", Role::Logistics);
        directory.enroll("CooperativeUser", Role::Cooperative);
        directory.enroll("RegulatorUser", Role::Regulator);
        directory.enroll("ImporterUser", Role::Importer);
        directory
    }
}

impl IdentityDirectory {
    /// Directory with nobody enrolled.
    pub fn empty() -> Self {
        Self {
            members: BTreeMap::new(),
        }
    }

    /// Enroll `identity` as acting for `role`. Re-enrolling replaces the role.
    pub fn enroll(&mut self, identity: impl Into<String>, role: Role) {
        let identity = identity.into();
        if let Some(previous) = self.members.insert(identity.clone(), role) {
            if previous != role {
                tracing::info!(%identity, from = %previous, to = %role, "[runtime] Identity re-enrolled");
            }
        }
    }

    /// Caller handle for an enrolled identity, `None` if unknown.
    pub fn resolve(&self, identity: &str) -> Option<EnrolledCaller> {
        self.members.get(identity).map(|&role| EnrolledCaller {
            identity: identity.to_string(),
            role,
        })
    }

    /// Enrolled identities in name order.
    pub fn identities(&self) -> impl Iterator<Item = (&str, Role)> {
        self.members.iter().map(|(name, role)| (name.as_str(), *role))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// An identity that passed the directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledCaller {
    identity: String,
    role: Role,
}

impl EnrolledCaller {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl RoleResolver for EnrolledCaller {
    fn caller_role(&self) -> String {
        self.role.id().to_string()
    }
}
