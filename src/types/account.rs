//! Account-related types for the transfer ledger
//!
//! This module defines the account identifier and the balance row used
//! for snapshots and output.

use rust_decimal::Decimal;
use std::borrow::Borrow;
use std::fmt;

/// Opaque account identifier
///
/// Accounts are never registered up front: the first transfer that names
/// an identifier brings the account into existence with a zero balance.
/// Ordering is lexicographic on the underlying string and is the order in
/// which the ledger acquires per-account locks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        AccountId(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        AccountId(id)
    }
}

impl From<&AccountId> for AccountId {
    fn from(id: &AccountId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for AccountId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Balance of a single account at the time a snapshot was taken
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    /// The account this row describes
    pub account: AccountId,

    /// Signed balance; negative means the account owes the system
    pub balance: Decimal,
}

impl AccountBalance {
    /// Create a balance row
    pub fn new(account: AccountId, balance: Decimal) -> Self {
        AccountBalance { account, balance }
    }
}
