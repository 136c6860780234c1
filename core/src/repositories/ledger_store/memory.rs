//! Process-local ledger repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::account::{Account, SubjectId, TransactionRecord};
use crate::errors::{DomainResult, LedgerError};

use super::r#trait::{BalanceMutation, LedgerRepository};

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<SubjectId, Account>,
    transactions: HashMap<SubjectId, Vec<TransactionRecord>>,
}

/// In-memory ledger repository
///
/// Balance update and record append happen under one write lock with no
/// suspension point in between, so a commit is either fully visible or not
/// at all.
#[derive(Clone, Default)]
pub struct InMemoryLedgerRepository {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn create_account(&self, account: Account) -> DomainResult<Account> {
        let mut state = self.state.write().await;

        if state.accounts.contains_key(&account.subject) {
            return Err(LedgerError::AlreadyRegistered {
                subject: account.subject,
            }
            .into());
        }

        state.accounts.insert(account.subject, account.clone());
        Ok(account)
    }

    async fn find_account(&self, subject: SubjectId) -> DomainResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&subject).cloned())
    }

    async fn commit(&self, mutation: BalanceMutation) -> DomainResult<Account> {
        let subject = mutation.subject();
        let mut state = self.state.write().await;

        let account = state
            .accounts
            .get_mut(&subject)
            .ok_or(LedgerError::SubjectNotFound { subject })?;

        if account.balance != mutation.expected_balance {
            return Err(LedgerError::ConcurrencyConflict.into());
        }

        account.balance = mutation.new_balance;
        let committed = account.clone();

        state
            .transactions
            .entry(subject)
            .or_default()
            .push(mutation.record);

        Ok(committed)
    }

    async fn transactions(&self, subject: SubjectId) -> DomainResult<Vec<TransactionRecord>> {
        let state = self.state.read().await;
        Ok(state.transactions.get(&subject).cloned().unwrap_or_default())
    }
}
