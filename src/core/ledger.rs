//! Balance ledger module
//!
//! This module provides the `Ledger`, the single authority over account
//! balances. It applies transfers atomically and enforces the overdraft
//! policy.
//!
//! # Design
//!
//! Each account balance lives behind its own mutex, and the mutexes are
//! reached through a `DashMap`. A transfer locks exactly two accounts, always
//! in ascending identifier order, so transfers over the same pair in opposite
//! directions cannot deadlock and transfers over disjoint accounts proceed in
//! parallel.
//!
//! A ledger-wide gate is held shared by every transfer and exclusively by
//! `snapshot()`. A snapshot therefore never observes a transfer that has
//! debited the sender but not yet credited the receiver.
//!
//! # Invariant
//!
//! Every debit is matched by a credit of the same amount, so the balances of
//! all accounts always sum to zero.

use crate::core::transaction_log::TransactionLog;
use crate::types::{AccountBalance, AccountId, EntryId, LedgerError};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, warn};

/// Rule governing whether a debit may drive a balance negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverdraftPolicy {
    /// Balances may go arbitrarily negative
    #[default]
    AllowOverdraft,

    /// A transfer that would leave the sender below zero is rejected
    RejectIfInsufficient,
}

/// Ledger configuration
///
/// Under `RejectIfInsufficient` a zero-sum ledger starts with every balance
/// at zero, so money can only enter circulation through an issuer: an
/// account that is exempt from the overdraft check.
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    /// Overdraft rule applied to senders
    pub overdraft: OverdraftPolicy,

    /// Accounts allowed to go negative regardless of the policy
    pub issuers: HashSet<AccountId>,
}

impl LedgerConfig {
    /// Create a configuration with the given policy and no issuers
    pub fn new(overdraft: OverdraftPolicy) -> Self {
        LedgerConfig {
            overdraft,
            issuers: HashSet::new(),
        }
    }

    /// Add an issuer exempt from the overdraft check
    pub fn with_issuer(mut self, account: impl Into<AccountId>) -> Self {
        self.issuers.insert(account.into());
        self
    }
}

/// Validate a transfer without touching any balance
///
/// Shared by `Ledger::apply_transfer` and `Transaction::new`, so both reject
/// the same inputs with the same errors.
///
/// # Errors
///
/// - `InvalidAmount` if `amount` is zero or negative
/// - `SameAccount` if `sender` and `receiver` are equal
pub fn validate_transfer(
    sender: &AccountId,
    receiver: &AccountId,
    amount: Decimal,
) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }
    if sender == receiver {
        return Err(LedgerError::same_account(sender));
    }
    Ok(())
}

type BalanceCell = Arc<Mutex<Decimal>>;

/// Authoritative store of account balances
///
/// The ledger is `Send + Sync` and is meant to be shared by reference (or
/// through an `Arc`) between every caller that executes transfers.
#[derive(Debug, Default)]
pub struct Ledger {
    /// Per-account balance cells, created on first reference
    balances: DashMap<AccountId, BalanceCell>,

    /// Shared by transfers, exclusive for consistent snapshots
    gate: RwLock<()>,

    config: LedgerConfig,
}

impl Ledger {
    /// Create an empty ledger that allows overdrafts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger with the given overdraft policy
    pub fn with_policy(policy: OverdraftPolicy) -> Self {
        Self::with_config(LedgerConfig::new(policy))
    }

    /// Create an empty ledger with a full configuration
    pub fn with_config(config: LedgerConfig) -> Self {
        Ledger {
            balances: DashMap::new(),
            gate: RwLock::new(()),
            config,
        }
    }

    /// The active overdraft policy
    pub fn policy(&self) -> OverdraftPolicy {
        self.config.overdraft
    }

    /// The ledger configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Current balance of an account
    ///
    /// Accounts that were never referenced have a balance of zero. This is a
    /// read-only operation: it never creates an account and never fails.
    pub fn get_balance<Q>(&self, account: &Q) -> Decimal
    where
        AccountId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        // Clone the cell out so no map shard stays locked while we wait on it
        let cell = match self.balances.get(account) {
            Some(entry) => Arc::clone(entry.value()),
            None => return Decimal::ZERO,
        };
        let balance = *cell.lock();
        balance
    }

    /// Atomically move `amount` from `sender` to `receiver`
    ///
    /// Both accounts are locked for the whole debit and credit pair, so
    /// either both sides are applied or neither is.
    ///
    /// # Returns
    ///
    /// The sender and receiver balances immediately after the transfer.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `SameAccount` if `sender == receiver`
    /// - `InsufficientFunds` if overdrafts are rejected, the sender is not an
    ///   issuer, and the sender would end up below zero
    /// - `ArithmeticOverflow` if either balance would leave the decimal range
    /// - `PrecisionLoss` if either balance cannot hold the exact result
    pub fn apply_transfer(
        &self,
        sender: &AccountId,
        receiver: &AccountId,
        amount: Decimal,
    ) -> Result<(Decimal, Decimal), LedgerError> {
        self.transfer_with(sender, receiver, amount, |sender_balance, receiver_balance| {
            (sender_balance, receiver_balance)
        })
    }

    /// Apply a transfer and append it to `log` before releasing the accounts
    ///
    /// The log entry is written while both account locks are still held, so
    /// for every account the log lists its balances in the order they were
    /// applied. Replaying the log reproduces each recorded balance.
    ///
    /// # Errors
    ///
    /// Same as `apply_transfer`; nothing is recorded on failure.
    pub fn apply_and_record(
        &self,
        sender: &AccountId,
        receiver: &AccountId,
        amount: Decimal,
        log: &TransactionLog,
    ) -> Result<(EntryId, Decimal, Decimal), LedgerError> {
        self.transfer_with(sender, receiver, amount, |sender_balance, receiver_balance| {
            let id = log.record(sender, receiver, amount, sender_balance, receiver_balance);
            (id, sender_balance, receiver_balance)
        })
    }

    /// Core of every transfer; `on_applied` runs with both accounts locked
    fn transfer_with<T>(
        &self,
        sender: &AccountId,
        receiver: &AccountId,
        amount: Decimal,
        on_applied: impl FnOnce(Decimal, Decimal) -> T,
    ) -> Result<T, LedgerError> {
        validate_transfer(sender, receiver, amount)?;

        let _gate = self.gate.read();

        let sender_cell = self.cell(sender);
        let receiver_cell = self.cell(receiver);

        // Lock order is ascending account id, regardless of transfer direction
        let (mut sender_balance, mut receiver_balance) = if sender < receiver {
            let sender_guard = sender_cell.lock();
            let receiver_guard = receiver_cell.lock();
            (sender_guard, receiver_guard)
        } else {
            let receiver_guard = receiver_cell.lock();
            let sender_guard = sender_cell.lock();
            (sender_guard, receiver_guard)
        };

        let new_sender_balance = sender_balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", sender))?;

        if new_sender_balance < Decimal::ZERO && self.rejects_overdraft(sender) {
            let balance = *sender_balance;
            warn!(
                sender = %sender,
                receiver = %receiver,
                balance = %balance,
                amount = %amount,
                "Transfer rejected: insufficient funds"
            );
            return Err(LedgerError::insufficient_funds(sender, balance, amount));
        }

        let new_receiver_balance = receiver_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", receiver))?;

        // Results beyond 28 significant digits are rounded silently
        if sender_balance.checked_sub(new_sender_balance) != Some(amount) {
            return Err(LedgerError::precision_loss("debit", sender));
        }
        if new_receiver_balance.checked_sub(*receiver_balance) != Some(amount) {
            return Err(LedgerError::precision_loss("credit", receiver));
        }

        *sender_balance = new_sender_balance;
        *receiver_balance = new_receiver_balance;

        debug!(
            sender = %sender,
            receiver = %receiver,
            amount = %amount,
            sender_balance = %new_sender_balance,
            receiver_balance = %new_receiver_balance,
            "Transfer applied"
        );

        Ok(on_applied(new_sender_balance, new_receiver_balance))
    }

    /// Consistent view of every referenced account, sorted by account id
    ///
    /// Waits for in-flight transfers to finish and holds new ones off while
    /// the balances are copied.
    pub fn snapshot(&self) -> Vec<AccountBalance> {
        let _gate = self.gate.write();

        let mut balances: Vec<AccountBalance> = self
            .balances
            .iter()
            .map(|entry| AccountBalance::new(entry.key().clone(), *entry.value().lock()))
            .collect();
        balances.sort_by(|a, b| a.account.cmp(&b.account));
        balances
    }

    /// Sum of all balances in a consistent snapshot
    ///
    /// Always zero: a transfer whose result would be rounded is rejected.
    pub fn total(&self) -> Decimal {
        self.snapshot().iter().map(|row| row.balance).sum()
    }

    /// Number of accounts referenced so far
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether no account has been referenced yet
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    fn rejects_overdraft(&self, sender: &AccountId) -> bool {
        self.config.overdraft == OverdraftPolicy::RejectIfInsufficient
            && !self.config.issuers.contains(sender)
    }

    fn cell(&self, account: &AccountId) -> BalanceCell {
        if let Some(entry) = self.balances.get(account) {
            return Arc::clone(entry.value());
        }
        Arc::clone(self.balances.entry(account.clone()).or_default().value())
    }
}
