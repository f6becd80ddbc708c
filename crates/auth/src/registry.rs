use std::collections::{BTreeMap, BTreeSet};

use fizzy_core::{AccountId, LedgerResult};

use crate::{Capability, Role};

/// "May `account` exercise `capability`?"
///
/// The ledger only depends on this question, so multiple minters or a role
/// handover can be introduced by swapping the implementation without touching
/// transfer or burn logic.
pub trait CapabilityCheck {
    fn has_capability(&self, account: AccountId, capability: &Capability) -> bool;
}

/// Role registry for a ledger.
///
/// Each role has exactly one holder and a fixed set of granted capabilities.
/// The registry is built once at ledger construction and has no mutation API,
/// so the executor cannot change for the lifetime of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    holders: BTreeMap<Role, AccountId>,
    grants: BTreeMap<Role, BTreeSet<Capability>>,
}

impl RoleRegistry {
    /// Registry with `executor` holding [`Role::EXECUTOR`], which grants [`Capability::MINT`].
    pub fn new(executor: AccountId) -> LedgerResult<Self> {
        let executor = executor.ensure_not_null("executor")?;

        let mut holders = BTreeMap::new();
        holders.insert(Role::EXECUTOR, executor);

        let mut grants = BTreeMap::new();
        grants.insert(Role::EXECUTOR, BTreeSet::from([Capability::MINT]));

        Ok(Self { holders, grants })
    }

    pub fn is_executor(&self, account: AccountId) -> bool {
        self.holder(&Role::EXECUTOR) == Some(account)
    }

    /// The executor account (always present).
    pub fn executor(&self) -> AccountId {
        self.holder(&Role::EXECUTOR).unwrap_or(AccountId::NULL)
    }

    pub fn holder(&self, role: &Role) -> Option<AccountId> {
        self.holders.get(role).copied()
    }

    pub fn capabilities_of(&self, role: &Role) -> impl Iterator<Item = &Capability> {
        self.grants.get(role).into_iter().flatten()
    }

    /// Roles currently held by `account`.
    pub fn roles_of(&self, account: AccountId) -> impl Iterator<Item = &Role> {
        self.holders
            .iter()
            .filter(move |(_, holder)| **holder == account)
            .map(|(role, _)| role)
    }
}

impl CapabilityCheck for RoleRegistry {
    fn has_capability(&self, account: AccountId, capability: &Capability) -> bool {
        if account.is_null() {
            return false;
        }
        self.roles_of(account)
            .flat_map(|role| self.capabilities_of(role))
            .any(|granted| granted.covers(capability))
    }
}

#[cfg(test)]
mod tests {
    use fizzy_core::LedgerError;

    use super::*;

    #[test]
    fn executor_holds_mint_capability() {
        let executor = AccountId::new();
        let registry = RoleRegistry::new(executor).unwrap();

        assert!(registry.is_executor(executor));
        assert_eq!(registry.executor(), executor);
        assert!(registry.has_capability(executor, &Capability::MINT));
        assert_eq!(
            registry.capabilities_of(&Role::EXECUTOR).collect::<Vec<_>>(),
            vec![&Capability::MINT]
        );
    }

    #[test]
    fn other_accounts_hold_nothing() {
        let registry = RoleRegistry::new(AccountId::new()).unwrap();
        let stranger = AccountId::new();

        assert!(!registry.is_executor(stranger));
        assert!(!registry.has_capability(stranger, &Capability::MINT));
        assert!(!registry.has_capability(AccountId::NULL, &Capability::MINT));
        assert_eq!(registry.roles_of(stranger).count(), 0);
    }

    #[test]
    fn executor_only_gets_what_the_role_grants() {
        let executor = AccountId::new();
        let registry = RoleRegistry::new(executor).unwrap();

        assert!(!registry.has_capability(executor, &Capability::new("token.pause")));
    }

    #[test]
    fn null_executor_is_rejected() {
        let err = RoleRegistry::new(AccountId::NULL).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAccount(_)));
    }
}
