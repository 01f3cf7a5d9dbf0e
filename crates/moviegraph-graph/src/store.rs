//! The store seam: what the executor needs from a graph database session.

use async_trait::async_trait;

use crate::client::GraphError;
use crate::record::Record;
use crate::statement::{AccessMode, Params, Statement};

/// A shared handle able to open transactions.
#[async_trait]
pub trait GraphStore: Send + Sync {
    type Txn: Transaction;

    async fn begin(&self, mode: AccessMode) -> Result<Self::Txn, GraphError>;
}

/// An open transaction. Dropped without commit means discarded.
#[async_trait]
pub trait Transaction: Send {
    /// Run `statement` with fully resolved `params`, returning its rows.
    async fn run(&mut self, statement: &Statement, params: &Params)
        -> Result<Vec<Record>, GraphError>;

    async fn commit(self) -> Result<(), GraphError>;

    async fn rollback(self) -> Result<(), GraphError>;
}
