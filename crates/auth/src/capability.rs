use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Capability identifier (e.g. "token.mint").
///
/// Capabilities are opaque strings. The wildcard `"*"` grants everything and
/// exists for policy layers that want an all-powerful role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    /// Create new units out of nothing.
    pub const MINT: Capability = Capability(Cow::Borrowed("token.mint"));

    pub const WILDCARD: Capability = Capability(Cow::Borrowed("*"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }

    /// Whether holding `self` satisfies a requirement for `required`.
    pub fn covers(&self, required: &Capability) -> bool {
        self.is_wildcard() || self == required
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
