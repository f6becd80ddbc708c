use serde::{Deserialize, Serialize};

use fizzy_core::Amount;

/// Immutable descriptive fields of a token, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    /// Number of decimal places one whole token is split into.
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Base units for `whole` tokens at this token's scale.
    pub fn whole_tokens(&self, whole: u128) -> Option<Amount> {
        Amount::from_whole(whole, self.decimals)
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new("Fizzy Money Token", "FMT", 18)
    }
}
