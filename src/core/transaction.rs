//! Transaction value object
//!
//! A `Transaction` validates a transfer at construction time and drives one
//! execution against a `Ledger` and `TransactionLog` pair.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed --execute ok--> Executed(id, balances)
//! Constructed --execute err-> Constructed (retry permitted)
//! Executed    --execute----> AlreadyExecuted error (terminal)
//! ```

use crate::core::ledger::{validate_transfer, Ledger};
use crate::core::transaction_log::TransactionLog;
use crate::types::{AccountId, EntryId, LedgerError};
use rust_decimal::Decimal;
use std::fmt;

/// Execution state of a transaction
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Constructed,
    Executed {
        id: EntryId,
        sender_balance: Decimal,
        receiver_balance: Decimal,
    },
}

/// A transfer of a fixed amount between two named accounts
///
/// Construction fails fast with the same rules the ledger applies, so an
/// invalid transfer never reaches shared state.
///
/// # Examples
///
/// ```
/// use transfer_ledger::{Ledger, Transaction, TransactionLog};
/// use rust_decimal::Decimal;
///
/// let ledger = Ledger::new();
/// let log = TransactionLog::new();
///
/// let mut tx = Transaction::new("Alice", "Bob", Decimal::new(500, 1)).unwrap();
/// let id = tx.execute(&ledger, &log).unwrap();
///
/// assert_eq!(tx.get_sender_balance().unwrap(), Decimal::new(-500, 1));
/// assert_eq!(log.get(id).unwrap().amount, Decimal::new(500, 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    sender: AccountId,
    receiver: AccountId,
    amount: Decimal,
    state: State,
}

impl Transaction {
    /// Create a transaction after validating its inputs
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `SameAccount` if `sender` and `receiver` are equal
    pub fn new(
        sender: impl Into<AccountId>,
        receiver: impl Into<AccountId>,
        amount: Decimal,
    ) -> Result<Self, LedgerError> {
        let sender = sender.into();
        let receiver = receiver.into();
        validate_transfer(&sender, &receiver, amount)?;

        Ok(Transaction {
            sender,
            receiver,
            amount,
            state: State::Constructed,
        })
    }

    /// Apply this transfer to `ledger` and record it in `log`
    ///
    /// On success the issued identifier and the resulting balances are stored
    /// on the transaction. A ledger failure leaves the transaction unexecuted,
    /// so the call may be retried.
    ///
    /// # Errors
    ///
    /// - `AlreadyExecuted` if a previous call succeeded; balances are untouched
    /// - Any error returned by `Ledger::apply_and_record`
    pub fn execute(
        &mut self,
        ledger: &Ledger,
        log: &TransactionLog,
    ) -> Result<EntryId, LedgerError> {
        if let State::Executed { id, .. } = self.state {
            return Err(LedgerError::already_executed(id));
        }

        let (id, sender_balance, receiver_balance) =
            ledger.apply_and_record(&self.sender, &self.receiver, self.amount, log)?;

        self.state = State::Executed {
            id,
            sender_balance,
            receiver_balance,
        };

        Ok(id)
    }

    /// Human-readable rendering: `"<sender> -> <receiver>: <amount>"`
    ///
    /// The amount keeps the scale it was constructed with.
    pub fn details(&self) -> String {
        self.to_string()
    }

    /// Sender balance right after this transaction executed
    ///
    /// # Errors
    ///
    /// Returns `NotExecutedYet` before a successful `execute`.
    pub fn get_sender_balance(&self) -> Result<Decimal, LedgerError> {
        match self.state {
            State::Executed { sender_balance, .. } => Ok(sender_balance),
            State::Constructed => Err(LedgerError::NotExecutedYet),
        }
    }

    /// Receiver balance right after this transaction executed
    ///
    /// # Errors
    ///
    /// Returns `NotExecutedYet` before a successful `execute`.
    pub fn get_receiver_balance(&self) -> Result<Decimal, LedgerError> {
        match self.state {
            State::Executed {
                receiver_balance, ..
            } => Ok(receiver_balance),
            State::Constructed => Err(LedgerError::NotExecutedYet),
        }
    }

    pub fn sender(&self) -> &AccountId {
        &self.sender
    }

    pub fn receiver(&self) -> &AccountId {
        &self.receiver
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Log identifier issued on successful execution
    pub fn id(&self) -> Option<EntryId> {
        match self.state {
            State::Executed { id, .. } => Some(id),
            State::Constructed => None,
        }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self.state, State::Executed { .. })
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.sender, self.receiver, self.amount)
    }
}
