//! Ledger repository trait defining persistence for accounts and transactions.

use async_trait::async_trait;

use crate::domain::entities::account::{Account, SubjectId, TransactionRecord};
use crate::errors::DomainResult;

/// A balance change and the ledger entry that justifies it
///
/// Committed as a single unit: either both the new balance and the record are
/// stored, or neither is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceMutation {
    /// Balance the caller read before computing the change
    pub expected_balance: u64,

    /// Balance to store
    pub new_balance: u64,

    /// Entry appended to the subject's ledger
    pub record: TransactionRecord,
}

impl BalanceMutation {
    pub fn subject(&self) -> SubjectId {
        self.record.subject
    }
}

/// Repository trait for account balances and the append-only ledger
///
/// The service layer serializes mutations per subject; implementations add a
/// second line of defence by refusing a commit whose `expected_balance` no
/// longer matches the stored balance (compare-and-swap), which keeps the
/// guarantee when several processes share one database.
///
/// # Failure contract
/// * Missing account - `LedgerError::SubjectNotFound`
/// * Balance moved underneath - `LedgerError::ConcurrencyConflict`
/// * Persistence error - `LedgerError::StorageFailure`, fully rolled back
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Persist a newly registered account
    ///
    /// # Returns
    /// * `Ok(Account)` - The stored account
    /// * `Err(DomainError)` - `LedgerError::AlreadyRegistered` if the subject exists
    async fn create_account(&self, account: Account) -> DomainResult<Account>;

    /// Find an account by subject
    async fn find_account(&self, subject: SubjectId) -> DomainResult<Option<Account>>;

    /// Atomically apply a balance mutation and append its record
    ///
    /// # Returns
    /// * `Ok(Account)` - The account as committed
    async fn commit(&self, mutation: BalanceMutation) -> DomainResult<Account>;

    /// All ledger entries of a subject in commit order
    async fn transactions(&self, subject: SubjectId) -> DomainResult<Vec<TransactionRecord>>;
}
