//! Account and ledger transaction entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Welcome balance for newly registered accounts
pub const DEFAULT_INITIAL_BALANCE: u64 = 1000;

/// Identity of an account holder (the chat id it registered with)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(i64);

impl SubjectId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SubjectId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// A bonus account
///
/// `balance` is only ever changed by the ledger service, and always together
/// with an appended [`TransactionRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account holder
    pub subject: SubjectId,

    /// Phone number given at registration
    pub phone: String,

    /// Current bonus balance
    pub balance: u64,

    /// Balance at registration, before any transaction
    pub initial_balance: u64,

    /// Registration time
    pub registered_at: DateTime<Utc>,
}

impl Account {
    /// Creates a freshly registered account holding `initial_balance`
    pub fn new(subject: SubjectId, phone: impl Into<String>, initial_balance: u64) -> Self {
        Self {
            subject,
            phone: phone.into(),
            balance: initial_balance,
            initial_balance,
            registered_at: Utc::now(),
        }
    }

    /// Checks `balance == initial + Σaccruals − Σwrite-offs` against a history
    pub fn reconciles_with(&self, history: &[TransactionRecord]) -> bool {
        let mut expected = Some(self.initial_balance);
        for record in history.iter().filter(|r| r.subject == self.subject) {
            expected = expected.and_then(|b| record.kind.apply(b, record.amount));
        }
        expected == Some(self.balance)
    }
}

/// Direction of a balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Bonus credited for a purchase
    Accrual,
    /// Bonus spent against a purchase
    WriteOff,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Accrual => "Accrual",
            TransactionKind::WriteOff => "WriteOff",
        }
    }

    /// Applies `amount` in this direction, `None` on overflow or underflow
    pub fn apply(&self, balance: u64, amount: u64) -> Option<u64> {
        match self {
            TransactionKind::Accrual => balance.checked_add(amount),
            TransactionKind::WriteOff => balance.checked_sub(amount),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Accrual" => Ok(TransactionKind::Accrual),
            "WriteOff" => Ok(TransactionKind::WriteOff),
            other => Err(format!("Invalid transaction kind: {}", other)),
        }
    }
}

/// Immutable ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Account the entry belongs to
    pub subject: SubjectId,

    /// Accrual or write-off
    pub kind: TransactionKind,

    /// Always positive
    pub amount: u64,

    /// Commit time
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(subject: SubjectId, kind: TransactionKind, amount: u64) -> Self {
        debug_assert!(amount > 0, "ledger entries carry positive amounts");
        Self {
            id: Uuid::new_v4(),
            subject,
            kind,
            amount,
            created_at: Utc::now(),
        }
    }

    pub fn accrual(subject: SubjectId, amount: u64) -> Self {
        Self::new(subject, TransactionKind::Accrual, amount)
    }

    pub fn write_off(subject: SubjectId, amount: u64) -> Self {
        Self::new(subject, TransactionKind::WriteOff, amount)
    }
}
