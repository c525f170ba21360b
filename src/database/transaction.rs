use std::{future::Future, pin::Pin};

use anyhow::Result;
use sqlx::{Sqlite, SqlitePool, Transaction};

#[derive(Debug)]
pub struct DatabaseTransaction;

impl DatabaseTransaction {
    /// Run a closure inside a transaction, committing on `Ok` and rolling back on `Err`.
    pub async fn run<T, F>(pool: &SqlitePool, f: F) -> Result<T>
    where
        F: for<'a> FnOnce(
            &'a mut Transaction<'static, Sqlite>,
        ) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>,
        T: Send,
    {
        let mut tx = pool.begin().await?;

        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Transaction failed with error: {}, rolling back", err);
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!(
                        "Rollback failed after error (orig: {}, rollback: {})",
                        err,
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}
