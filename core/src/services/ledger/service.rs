//! Ledger service: registration, queries and atomic balance mutations

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use bp_shared::utils::phone::{is_valid_ru_mobile, mask_phone_number, normalize_phone_number};

use crate::domain::entities::account::{Account, SubjectId, TransactionRecord};
use crate::domain::value_objects::{AccrualReceipt, Settlement, SettlementQuote};
use crate::errors::{DomainError, DomainResult, LedgerError};
use crate::repositories::{BalanceMutation, LedgerRepository};

use super::config::LedgerServiceConfig;
use super::locks::SubjectLocks;
use super::rules;

/// Service for the bonus ledger
///
/// Every mutation of a subject's balance runs while holding that subject's
/// lock, so at most one settle or accrue is in flight per subject. The
/// repository commits the new balance and its ledger entry as one unit.
pub struct LedgerService<R: LedgerRepository> {
    repository: Arc<R>,
    locks: SubjectLocks,
    config: LedgerServiceConfig,
}

impl<R: LedgerRepository> LedgerService<R> {
    pub fn new(repository: Arc<R>, config: LedgerServiceConfig) -> Self {
        Self {
            repository,
            locks: SubjectLocks::new(),
            config,
        }
    }

    pub fn config(&self) -> &LedgerServiceConfig {
        &self.config
    }

    /// Registers an account holding the configured welcome balance
    ///
    /// # Returns
    /// * `Ok(Account)` - The new account
    /// * `Err(DomainError::MalformedInput)` - Not a Russian mobile number
    /// * `Err(LedgerError::AlreadyRegistered)` - Subject already has an account
    pub async fn register(&self, subject: SubjectId, phone: &str) -> DomainResult<Account> {
        let phone = normalize_phone_number(phone);
        if !is_valid_ru_mobile(&phone) {
            return Err(DomainError::malformed(
                "phone must be 8XXXXXXXXXX or +7XXXXXXXXXX",
            ));
        }

        let account = self
            .repository
            .create_account(Account::new(subject, phone, self.config.initial_balance))
            .await?;

        info!(
            subject = %subject,
            phone = %mask_phone_number(&account.phone),
            balance = account.balance,
            "Account registered"
        );

        Ok(account)
    }

    pub async fn account(&self, subject: SubjectId) -> DomainResult<Account> {
        self.repository
            .find_account(subject)
            .await?
            .ok_or_else(|| LedgerError::SubjectNotFound { subject }.into())
    }

    pub async fn balance(&self, subject: SubjectId) -> DomainResult<u64> {
        Ok(self.account(subject).await?.balance)
    }

    /// Ledger entries of `subject` in commit order
    pub async fn history(&self, subject: SubjectId) -> DomainResult<Vec<TransactionRecord>> {
        self.account(subject).await?;
        self.repository.transactions(subject).await
    }

    /// Previews a settlement without locking or mutating anything
    ///
    /// The figures may be stale by the time a settlement runs.
    pub async fn quote(
        &self,
        subject: SubjectId,
        purchase_amount: u64,
        cap: Option<u64>,
    ) -> DomainResult<SettlementQuote> {
        rules::ensure_positive_purchase(purchase_amount)?;
        let balance = self.balance(subject).await?;
        let bonus = rules::settlement_bonus(balance, purchase_amount, cap)?;

        Ok(SettlementQuote {
            subject,
            purchase_amount,
            bonus_applicable: bonus,
            remainder_due: purchase_amount - bonus,
            balance,
        })
    }

    /// Writes off up to half of the purchase from the balance
    pub async fn settle(&self, subject: SubjectId, purchase_amount: u64) -> DomainResult<Settlement> {
        self.settle_capped(subject, purchase_amount, None).await
    }

    /// Like [`settle`](Self::settle), additionally bounded by a token's spending cap
    ///
    /// # Returns
    /// * `Ok(Settlement)` - Committed write-off
    /// * `Err(LedgerError::InsufficientBonus)` - Nothing to write off
    /// * `Err(LedgerError::ConcurrencyConflict)` - Subject busy past the lock timeout
    pub async fn settle_capped(
        &self,
        subject: SubjectId,
        purchase_amount: u64,
        cap: Option<u64>,
    ) -> DomainResult<Settlement> {
        rules::ensure_positive_purchase(purchase_amount)?;
        let _guard = self.locks.acquire(subject, self.config.lock_timeout).await?;

        let account = self.account(subject).await?;
        let bonus = rules::settlement_bonus(account.balance, purchase_amount, cap).map_err(|e| {
            debug!(subject = %subject, purchase_amount, balance = account.balance, "No bonus applicable");
            e
        })?;

        let committed = self
            .commit(BalanceMutation {
                expected_balance: account.balance,
                new_balance: account.balance - bonus,
                record: TransactionRecord::write_off(subject, bonus),
            })
            .await?;

        info!(
            subject = %subject,
            purchase_amount,
            bonus_applied = bonus,
            new_balance = committed.balance,
            "Bonus settled"
        );

        Ok(Settlement {
            subject,
            purchase_amount,
            bonus_applied: bonus,
            remainder_due: purchase_amount - bonus,
            new_balance: committed.balance,
        })
    }

    /// Credits `floor(purchase * percent / 100)` to the balance
    ///
    /// A purchase too small to earn anything is not an error: the receipt
    /// reports zero and no ledger entry is written.
    pub async fn accrue(
        &self,
        subject: SubjectId,
        purchase_amount: u64,
        percent: u32,
    ) -> DomainResult<AccrualReceipt> {
        rules::ensure_positive_purchase(purchase_amount)?;
        let bonus = rules::accrual_bonus(purchase_amount, percent)?;
        let _guard = self.locks.acquire(subject, self.config.lock_timeout).await?;

        let account = self.account(subject).await?;
        if bonus == 0 {
            debug!(subject = %subject, purchase_amount, percent, "Accrual rounds down to zero");
            return Ok(AccrualReceipt {
                subject,
                purchase_amount,
                bonus_added: 0,
                new_balance: account.balance,
            });
        }

        let committed = self
            .commit(BalanceMutation {
                expected_balance: account.balance,
                new_balance: rules::credit(account.balance, bonus)?,
                record: TransactionRecord::accrual(subject, bonus),
            })
            .await?;

        info!(
            subject = %subject,
            purchase_amount,
            bonus_added = bonus,
            new_balance = committed.balance,
            "Bonus accrued"
        );

        Ok(AccrualReceipt {
            subject,
            purchase_amount,
            bonus_added: bonus,
            new_balance: committed.balance,
        })
    }

    /// Accrues at the configured rate
    pub async fn accrue_default(
        &self,
        subject: SubjectId,
        purchase_amount: u64,
    ) -> DomainResult<AccrualReceipt> {
        self.accrue(subject, purchase_amount, self.config.accrual_percent)
            .await
    }

    /// [`settle_capped`](Self::settle_capped) that gives up once `cancel` resolves
    ///
    /// On cancellation nothing has been committed and `LedgerError::Cancelled`
    /// is returned.
    pub async fn settle_until<C>(
        &self,
        subject: SubjectId,
        purchase_amount: u64,
        cap: Option<u64>,
        cancel: C,
    ) -> DomainResult<Settlement>
    where
        C: Future<Output = ()>,
    {
        cancellable(subject, cancel, self.settle_capped(subject, purchase_amount, cap)).await
    }

    /// [`accrue`](Self::accrue) that gives up once `cancel` resolves
    pub async fn accrue_until<C>(
        &self,
        subject: SubjectId,
        purchase_amount: u64,
        percent: u32,
        cancel: C,
    ) -> DomainResult<AccrualReceipt>
    where
        C: Future<Output = ()>,
    {
        cancellable(subject, cancel, self.accrue(subject, purchase_amount, percent)).await
    }

    async fn commit(&self, mutation: BalanceMutation) -> DomainResult<Account> {
        let subject = mutation.subject();
        self.repository.commit(mutation).await.map_err(|e| {
            match &e {
                DomainError::Ledger(LedgerError::ConcurrencyConflict) => {
                    warn!(subject = %subject, "Balance changed underneath a locked mutation")
                }
                _ => error!(subject = %subject, error = %e, "Ledger commit failed"),
            }
            e
        })
    }
}

async fn cancellable<T, C, F>(subject: SubjectId, cancel: C, operation: F) -> DomainResult<T>
where
    C: Future<Output = ()>,
    F: Future<Output = DomainResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel => {
            info!(subject = %subject, "Ledger operation cancelled");
            Err(LedgerError::Cancelled.into())
        }
        result = operation => result,
    }
}
