use std::{future::Future, pin::Pin};

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{EngineError, ResultEngine};

mod access;
mod accounts;
mod balances;
mod bills;
mod budgets;
mod categories;
mod goals;
mod reconcile;
mod reports;
mod transactions;
mod transfers;

pub use access::Caller;
pub use transactions::TransactionListFilter;

/// Boxed future returned by a unit-of-work body.
pub(crate) type TxFuture<'c, T> = Pin<Box<dyn Future<Output = ResultEngine<T>> + Send + 'c>>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    password_cost: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Runs `f` inside one DB transaction.
    ///
    /// Commits when `f` returns `Ok`, otherwise rolls back explicitly and
    /// returns the original error. Every read the body needs must go through
    /// the `DatabaseTransaction` it receives, never through `self.database`.
    pub(crate) async fn with_tx<T, F>(&self, op: &'static str, f: F) -> ResultEngine<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c Engine, &'c DatabaseTransaction) -> TxFuture<'c, T> + Send,
    {
        let db_tx = self.database.begin().await?;
        let result = f(self, &db_tx).await;
        match result {
            Ok(value) => {
                db_tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                match &err {
                    EngineError::Database(db_err) => {
                        tracing::error!(op, error = %db_err, "unit of work failed, rolling back");
                    }
                    other => {
                        tracing::warn!(op, error = %other, "unit of work rejected, rolling back");
                    }
                }
                if let Err(rollback_err) = db_tx.rollback().await {
                    tracing::error!(op, error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    password_cost: Option<u32>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// bcrypt cost for newly created users. Defaults to
    /// [`bcrypt::DEFAULT_COST`].
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = Some(cost);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            password_cost: self.password_cost.unwrap_or(bcrypt::DEFAULT_COST),
        })
    }
}
