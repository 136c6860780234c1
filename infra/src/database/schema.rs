//! Ledger table definitions
//!
//! Balances are unsigned so the database itself refuses a negative balance.
//! `seq` gives the commit order of ledger entries.

pub const CREATE_ACCOUNTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS accounts (
        subject_id      BIGINT          NOT NULL PRIMARY KEY,
        phone           VARCHAR(16)     NOT NULL,
        balance         BIGINT UNSIGNED NOT NULL,
        initial_balance BIGINT UNSIGNED NOT NULL,
        registered_at   DATETIME(3)     NOT NULL
    ) ENGINE = InnoDB
"#;

pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS transactions (
        seq         BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        id          CHAR(36)        NOT NULL UNIQUE,
        subject_id  BIGINT          NOT NULL,
        kind        VARCHAR(16)     NOT NULL,
        amount      BIGINT UNSIGNED NOT NULL,
        created_at  DATETIME(3)     NOT NULL,
        INDEX idx_transactions_subject (subject_id, seq),
        CONSTRAINT fk_transactions_account
            FOREIGN KEY (subject_id) REFERENCES accounts (subject_id)
    ) ENGINE = InnoDB
"#;

/// Statements run in order by [`DatabasePool::bootstrap_schema`](super::DatabasePool::bootstrap_schema)
pub const BOOTSTRAP: [&str; 2] = [CREATE_ACCOUNTS_TABLE, CREATE_TRANSACTIONS_TABLE];
