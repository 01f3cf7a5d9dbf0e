//! Runs a batch of statements inside exactly one transaction.
//!
//! Statements execute strictly in order. Any failure rolls the whole batch
//! back; success commits once, after the last statement. Correlation tokens
//! declared through [`Statement::bind`] are threaded from earlier results into
//! later parameters without being interpreted. No retries are attempted.

use crate::client::GraphError;
use crate::record::Record;
use crate::statement::{Batch, ParamValue, Params, Statement};
use crate::store::{GraphStore, Transaction};

/// Rows produced by every statement of a committed batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    results: Vec<Vec<Record>>,
}

impl BatchOutcome {
    /// Rows of statement `index`; empty if out of range.
    pub fn rows(&self, index: usize) -> &[Record] {
        self.results.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows of the last statement in the batch.
    pub fn final_rows(&self) -> &[Record] {
        self.results.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Clone)]
pub struct TransactionExecutor<S> {
    store: S,
}

impl<S: GraphStore> TransactionExecutor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Execute `batch` atomically in a transaction of the batch's access mode.
    pub async fn execute(&self, batch: &Batch) -> Result<BatchOutcome, GraphError> {
        batch.check()?;

        let mut txn = self.store.begin(batch.mode()).await?;
        tracing::debug!(mode = ?batch.mode(), statements = batch.len(), "Batch started");

        match run_statements(&mut txn, batch).await {
            Ok(outcome) => {
                txn.commit().await?;
                tracing::debug!(statements = batch.len(), "Batch committed");
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                tracing::debug!(error = %e, "Batch rolled back");
                Err(e)
            }
        }
    }
}

async fn run_statements<T: Transaction>(
    txn: &mut T,
    batch: &Batch,
) -> Result<BatchOutcome, GraphError> {
    let mut results: Vec<Vec<Record>> = Vec::with_capacity(batch.len());

    for (index, statement) in batch.statements().iter().enumerate() {
        let params = resolve_params(statement, &results)?;
        let rows = txn.run(statement, &params).await?;
        statement.cardinality().check(index, rows.len())?;
        results.push(rows);
    }

    Ok(BatchOutcome { results })
}

/// Statement params plus every bound correlation token.
fn resolve_params(statement: &Statement, results: &[Vec<Record>]) -> Result<Params, GraphError> {
    let mut params = statement.params().clone();
    for binding in statement.bindings() {
        let identity = results
            .get(binding.source)
            .and_then(|rows| rows.first())
            .and_then(|row| row.get(&binding.column))
            .map(|node| node.identity)
            .ok_or_else(|| {
                GraphError::Statement(format!(
                    "no `{}` node in the result of statement {} to bind as ${}",
                    binding.column, binding.source, binding.param
                ))
            })?;
        params.insert(binding.param.clone(), ParamValue::Integer(identity));
    }
    Ok(params)
}
