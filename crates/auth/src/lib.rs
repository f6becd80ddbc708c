//! `fizzy-auth`: capability checks and the role registry.
//!
//! Pure policy: no IO, no ledger state. The ledger asks "may this account do
//! X?" through [`CapabilityCheck`] and never looks at roles directly.

pub mod authorize;
pub mod capability;
pub mod registry;
pub mod roles;

pub use authorize::{AuthorizationExplanation, AuthzError, authorize, explain_authorization};
pub use capability::Capability;
pub use registry::{CapabilityCheck, RoleRegistry};
pub use roles::Role;
