use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::domain::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Fresh random identifier for a newly opened account.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl core::fmt::Display for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PinCode(String);

impl PinCode {
    pub const LENGTH: usize = 4;

    pub fn parse(raw: &str) -> Result<Self, Error> {
        if raw.chars().count() != Self::LENGTH {
            return Err(Error::InvalidPin);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Compares in constant time over the stored PIN's bytes.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the PIN itself.
impl core::fmt::Debug for PinCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PinCode(****)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub pin_code: PinCode,
    pub balance: Decimal, // never negative after a committed operation
}

impl Account {
    pub fn open(name: impl Into<String>, pin_code: PinCode) -> Self {
        Self {
            id: AccountId::generate(),
            name: name.into(),
            pin_code,
            balance: Decimal::ZERO,
        }
    }
}
