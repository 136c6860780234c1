//! MySQL implementation of the LedgerRepository trait.
//!
//! Every commit runs in one transaction that locks the account row with
//! `SELECT ... FOR UPDATE`, so the balance check, the update and the ledger
//! insert are serialized against any other process sharing the database.
//! The row-lock wait is capped by `innodb_lock_wait_timeout`, set per commit
//! from the configured lock timeout. Lock wait timeouts and deadlocks surface
//! as `ConcurrencyConflict`.
//! A transaction dropped before `COMMIT` is rolled back by SQLx.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlDatabaseError, MySqlPool, Row};
use std::time::Duration;
use uuid::Uuid;

use bp_core::domain::entities::account::{Account, SubjectId, TransactionKind, TransactionRecord};
use bp_core::errors::{DomainResult, LedgerError};
use bp_core::repositories::{BalanceMutation, LedgerRepository};

/// MySQL error number for `ER_LOCK_WAIT_TIMEOUT`
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;
/// MySQL error number for `ER_LOCK_DEADLOCK`
const ER_LOCK_DEADLOCK: u16 = 1213;

const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(2);

/// MySQL implementation of LedgerRepository
pub struct MySqlLedgerRepository {
    /// Database connection pool
    pool: MySqlPool,
    /// Value of `innodb_lock_wait_timeout` for commit transactions
    lock_wait_seconds: u64,
}

impl MySqlLedgerRepository {
    /// Create a new MySQL ledger repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            lock_wait_seconds: lock_wait_seconds(DEFAULT_LOCK_WAIT),
        }
    }

    /// Bound how long a commit waits for another holder of the account row
    ///
    /// InnoDB counts this in whole seconds, so the wait is rounded up to at
    /// least one second.
    pub fn with_lock_wait_timeout(mut self, timeout: Duration) -> Self {
        self.lock_wait_seconds = lock_wait_seconds(timeout);
        self
    }

    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, LedgerError> {
        Ok(Account {
            subject: SubjectId::new(row.try_get("subject_id").map_err(column_error)?),
            phone: row.try_get("phone").map_err(column_error)?,
            balance: row.try_get("balance").map_err(column_error)?,
            initial_balance: row.try_get("initial_balance").map_err(column_error)?,
            registered_at: row
                .try_get::<DateTime<Utc>, _>("registered_at")
                .map_err(column_error)?,
        })
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<TransactionRecord, LedgerError> {
        let id: String = row.try_get("id").map_err(column_error)?;
        let kind: String = row.try_get("kind").map_err(column_error)?;

        Ok(TransactionRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| LedgerError::storage(format!("Invalid UUID: {}", e)))?,
            subject: SubjectId::new(row.try_get("subject_id").map_err(column_error)?),
            kind: kind.parse::<TransactionKind>().map_err(LedgerError::storage)?,
            amount: row.try_get("amount").map_err(column_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error)?,
        })
    }
}

fn column_error(e: sqlx::Error) -> LedgerError {
    LedgerError::storage(format!("Failed to read column: {}", e))
}

fn query_error(e: sqlx::Error) -> LedgerError {
    tracing::error!(error = %e, "Ledger query failed");
    LedgerError::storage(format!("Database query failed: {}", e))
}

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn lock_wait_seconds(timeout: Duration) -> u64 {
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    millis.div_ceil(1000).max(1)
}

fn is_lock_contention(number: u16) -> bool {
    matches!(number, ER_LOCK_WAIT_TIMEOUT | ER_LOCK_DEADLOCK)
}

fn mysql_error_number(e: &sqlx::Error) -> Option<u16> {
    match e {
        sqlx::Error::Database(db) => db
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(MySqlDatabaseError::number),
        _ => None,
    }
}

/// Like [`query_error`], but row-lock contention becomes a conflict
fn commit_error(e: sqlx::Error) -> LedgerError {
    match mysql_error_number(&e) {
        Some(number) if is_lock_contention(number) => {
            tracing::warn!(error = %e, code = number, "Account row lock contended");
            LedgerError::ConcurrencyConflict
        }
        _ => query_error(e),
    }
}

#[async_trait]
impl LedgerRepository for MySqlLedgerRepository {
    async fn create_account(&self, account: Account) -> DomainResult<Account> {
        let query = r#"
            INSERT INTO accounts (subject_id, phone, balance, initial_balance, registered_at)
            VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(account.subject.value())
            .bind(&account.phone)
            .bind(account.balance)
            .bind(account.initial_balance)
            .bind(account.registered_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    LedgerError::AlreadyRegistered {
                        subject: account.subject,
                    }
                } else {
                    query_error(e)
                }
            })?;

        Ok(account)
    }

    async fn find_account(&self, subject: SubjectId) -> DomainResult<Option<Account>> {
        let query = r#"
            SELECT subject_id, phone, balance, initial_balance, registered_at
            FROM accounts
            WHERE subject_id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(subject.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn commit(&self, mutation: BalanceMutation) -> DomainResult<Account> {
        let subject = mutation.subject();
        let mut tx = self.pool.begin().await.map_err(query_error)?;

        // Session scoped; every commit sets it before taking the row lock
        sqlx::query(&format!(
            "SET SESSION innodb_lock_wait_timeout = {}",
            self.lock_wait_seconds
        ))
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        let row = sqlx::query(
            r#"
            SELECT subject_id, phone, balance, initial_balance, registered_at
            FROM accounts
            WHERE subject_id = ?
            FOR UPDATE
            "#,
        )
        .bind(subject.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(commit_error)?;

        let Some(row) = row else {
            return Err(LedgerError::SubjectNotFound { subject }.into());
        };
        let mut account = Self::row_to_account(&row)?;

        if account.balance != mutation.expected_balance {
            tracing::warn!(
                subject = %subject,
                expected = mutation.expected_balance,
                actual = account.balance,
                "Stored balance moved before commit"
            );
            return Err(LedgerError::ConcurrencyConflict.into());
        }

        sqlx::query("UPDATE accounts SET balance = ? WHERE subject_id = ?")
            .bind(mutation.new_balance)
            .bind(subject.value())
            .execute(&mut *tx)
            .await
            .map_err(commit_error)?;

        let record = &mutation.record;
        sqlx::query(
            r#"
            INSERT INTO transactions (id, subject_id, kind, amount, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(subject.value())
        .bind(record.kind.as_str())
        .bind(record.amount)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await
        .map_err(commit_error)?;

        tx.commit().await.map_err(commit_error)?;

        account.balance = mutation.new_balance;
        Ok(account)
    }

    async fn transactions(&self, subject: SubjectId) -> DomainResult<Vec<TransactionRecord>> {
        let query = r#"
            SELECT id, subject_id, kind, amount, created_at
            FROM transactions
            WHERE subject_id = ?
            ORDER BY seq ASC
        "#;

        let rows = sqlx::query(query)
            .bind(subject.value())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| Self::row_to_record(row).map_err(Into::into))
            .collect()
    }
}
