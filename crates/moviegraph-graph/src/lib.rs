//! moviegraph-graph — Cypher translation and transactional execution.
//!
//! Every read and write the API performs flows through this crate: the
//! builders in [`queries`] and [`mutations`] turn structured requests into
//! parameterized statements, and [`TransactionExecutor`] runs a batch of
//! them inside exactly one store transaction.

pub mod client;
pub mod executor;
pub mod mutations;
pub mod queries;
pub mod record;
pub mod statement;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use client::{GraphConfig, GraphError, Neo4jStore};
pub use executor::{BatchOutcome, TransactionExecutor};
pub use record::{NodeRecord, Record};
pub use statement::{AccessMode, Batch, Cardinality, ParamValue, Params, Statement};
pub use store::{GraphStore, Transaction};
