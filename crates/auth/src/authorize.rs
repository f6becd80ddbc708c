use serde::Serialize;
use thiserror::Error;

use fizzy_core::{AccountId, LedgerError};

use crate::{Capability, CapabilityCheck, RoleRegistry};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {account} lacks capability '{capability}'")]
    Forbidden {
        account: AccountId,
        capability: Capability,
    },
}

impl From<AuthzError> for LedgerError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Forbidden {
                account,
                capability,
            } => LedgerError::unauthorized(account, capability.as_str()),
        }
    }
}

/// Require `account` to hold `required`.
///
/// - No IO
/// - No panics
/// - No ledger logic (pure policy check)
pub fn authorize<C>(check: &C, account: AccountId, required: &Capability) -> Result<(), AuthzError>
where
    C: CapabilityCheck + ?Sized,
{
    if check.has_capability(account, required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            account,
            capability: required.clone(),
        })
    }
}

/// Audit view of an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    pub account: AccountId,
    pub required_capability: String,
    pub granted: bool,
    /// Roles the account holds in the registry.
    pub roles: Vec<String>,
    pub reason: String,
}

/// Explain why `account` would be allowed or denied `required`.
pub fn explain_authorization(
    registry: &RoleRegistry,
    account: AccountId,
    required: &Capability,
) -> AuthorizationExplanation {
    let roles: Vec<String> = registry
        .roles_of(account)
        .map(|r| r.as_str().to_string())
        .collect();

    let granting_role = registry.roles_of(account).find(|role| {
        registry
            .capabilities_of(role)
            .any(|granted| granted.covers(required))
    });

    let (granted, reason) = match granting_role {
        Some(role) => (true, format!("role '{role}' grants '{required}'")),
        None if roles.is_empty() => (false, format!("account holds no roles; '{required}' requires one")),
        None => (
            false,
            format!("none of the roles {roles:?} grants '{required}'"),
        ),
    };

    AuthorizationExplanation {
        account,
        required_capability: required.as_str().to_string(),
        granted,
        roles,
        reason,
    }
}
