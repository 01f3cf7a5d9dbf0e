//! Neo4j connection management and the neo4rs-backed store.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

use moviegraph_core::ValidationError;

use crate::record::{NodeRecord, Record};
use crate::statement::{AccessMode, ParamValue, Params, Statement};
use crate::store::{GraphStore, Transaction};

/// Errors from graph operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GraphError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Statement error: {0}")]
    Statement(String),

    #[error("Mapping error: {0}")]
    Mapping(String),
}

impl GraphError {
    /// Stable short name used in logs and error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Connection(_) => "connection",
            Self::Constraint(_) => "constraint",
            Self::Statement(_) => "statement",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl From<neo4rs::Error> for GraphError {
    fn from(err: neo4rs::Error) -> Self {
        let message = err.to_string();
        match err {
            neo4rs::Error::IOError { .. }
            | neo4rs::Error::ConnectionError
            | neo4rs::Error::AuthenticationError(_) => Self::Connection(message),
            _ => classify_status(message),
        }
    }
}

/// Map a server failure to our taxonomy by its Neo4j status code.
fn classify_status(message: String) -> GraphError {
    if message.contains("Neo.ClientError.Schema") {
        GraphError::Constraint(message)
    } else if message.contains("Neo.ClientError.Security")
        || message.contains("Neo.TransientError")
    {
        GraphError::Connection(message)
    } else {
        GraphError::Statement(message)
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

/// Thread-safe Neo4j store with connection pooling.
///
/// Obtained once per process and lent to every call. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Get a reference to the underlying neo4rs Graph for direct operations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    type Txn = Neo4jTransaction;

    async fn begin(&self, mode: AccessMode) -> Result<Neo4jTransaction, GraphError> {
        // Bolt transactions opened through neo4rs carry no access mode; read
        // batches are guaranteed write-free by `Batch::check` instead.
        let txn = self.graph.start_txn().await?;
        tracing::debug!(?mode, "Transaction opened");
        Ok(Neo4jTransaction { txn })
    }
}

/// An open neo4rs transaction.
pub struct Neo4jTransaction {
    txn: neo4rs::Txn,
}

#[async_trait]
impl Transaction for Neo4jTransaction {
    async fn run(
        &mut self,
        statement: &Statement,
        params: &Params,
    ) -> Result<Vec<Record>, GraphError> {
        let q = to_query(statement.text(), params);
        let mut stream = self.txn.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(self.txn.handle()).await? {
            rows.push(row_to_record(
                &row,
                statement.returns(),
                statement.list_returns(),
            )?);
        }
        Ok(rows)
    }

    async fn commit(self) -> Result<(), GraphError> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), GraphError> {
        self.txn.rollback().await?;
        Ok(())
    }
}

fn to_query(text: &str, params: &Params) -> Query {
    params
        .iter()
        .fold(neo4rs::query(text), |q, (name, value)| match value {
            ParamValue::Integer(v) => q.param(name.as_str(), *v),
            ParamValue::Float(v) => q.param(name.as_str(), *v),
            ParamValue::String(v) => q.param(name.as_str(), v.clone()),
            ParamValue::Boolean(v) => q.param(name.as_str(), *v),
        })
}

fn row_to_record(
    row: &neo4rs::Row,
    columns: &[String],
    lists: &[String],
) -> Result<Record, GraphError> {
    let mut record = Record::new();
    for column in columns {
        let node: neo4rs::Node = row.get(column).map_err(|e| {
            GraphError::Mapping(format!("Failed to read node column `{column}`: {e}"))
        })?;
        record.insert(column, neo4j_node_to_record(&node));
    }
    for column in lists {
        let nodes: Vec<neo4rs::Node> = row.get(column).map_err(|e| {
            GraphError::Mapping(format!("Failed to read list column `{column}`: {e}"))
        })?;
        record.insert_list(column, nodes.iter().map(neo4j_node_to_record).collect());
    }
    Ok(record)
}

/// Convert a neo4rs::Node to our store-agnostic NodeRecord.
fn neo4j_node_to_record(node: &neo4rs::Node) -> NodeRecord {
    let mut properties = serde_json::Map::new();
    for key in node.keys() {
        if let Some(value) = property_value(node, key) {
            properties.insert(key.to_string(), value);
        }
    }

    NodeRecord {
        identity: node.id(),
        labels: node.labels().into_iter().map(str::to_string).collect(),
        properties,
    }
}

fn property_value(node: &neo4rs::Node, key: &str) -> Option<serde_json::Value> {
    // Integers first: a float read would also accept them.
    if let Ok(v) = node.get::<i64>(key) {
        return Some(v.into());
    }
    if let Ok(v) = node.get::<f64>(key) {
        return serde_json::Number::from_f64(v).map(serde_json::Value::Number);
    }
    if let Ok(v) = node.get::<bool>(key) {
        return Some(v.into());
    }
    node.get::<String>(key).ok().map(serde_json::Value::String)
}
