//! A recording in-memory store for unit tests.
//!
//! It does not evaluate Cypher. Each `run` is answered by a caller-supplied
//! responder, and every begin/run/commit/rollback is logged. Statements run
//! inside a transaction only become "visible" once that transaction commits.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::client::GraphError;
use crate::record::Record;
use crate::statement::{AccessMode, Params, Statement};
use crate::store::{GraphStore, Transaction};

type Responder = dyn Fn(&Statement, &Params) -> Result<Vec<Record>, GraphError> + Send + Sync;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Begin(AccessMode),
    Run { text: String, params: Params },
    Commit,
    Rollback,
}

struct Inner {
    responder: Box<Responder>,
    reachable: bool,
    events: Mutex<Vec<StoreEvent>>,
    visible: Mutex<Vec<(String, Params)>>,
}

#[derive(Clone)]
pub struct RecordingStore {
    inner: Arc<Inner>,
}

impl RecordingStore {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Statement, &Params) -> Result<Vec<Record>, GraphError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                responder: Box::new(responder),
                reachable: true,
                events: Mutex::new(Vec::new()),
                visible: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Every statement succeeds with zero rows.
    pub fn empty() -> Self {
        Self::new(|_, _| Ok(Vec::new()))
    }

    /// Every `begin` fails with a connection error.
    pub fn unreachable() -> Self {
        let mut store = Self::empty();
        if let Some(inner) = Arc::get_mut(&mut store.inner) {
            inner.reachable = false;
        }
        store
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        lock(&self.inner.events).clone()
    }

    /// Text and resolved params of every statement run, committed or not.
    pub fn runs(&self) -> Vec<(String, Params)> {
        lock(&self.inner.events)
            .iter()
            .filter_map(|e| match e {
                StoreEvent::Run { text, params } => Some((text.clone(), params.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn begin_count(&self) -> usize {
        lock(&self.inner.events)
            .iter()
            .filter(|e| matches!(e, StoreEvent::Begin(_)))
            .count()
    }

    /// Statements from committed transactions only.
    pub fn visible_writes(&self) -> Vec<(String, Params)> {
        lock(&self.inner.visible).clone()
    }

    fn record(&self, event: StoreEvent) {
        lock(&self.inner.events).push(event);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct RecordingTransaction {
    store: RecordingStore,
    staged: Vec<(String, Params)>,
}

#[async_trait]
impl GraphStore for RecordingStore {
    type Txn = RecordingTransaction;

    async fn begin(&self, mode: AccessMode) -> Result<RecordingTransaction, GraphError> {
        if !self.inner.reachable {
            return Err(GraphError::Connection("store unreachable".into()));
        }
        self.record(StoreEvent::Begin(mode));
        Ok(RecordingTransaction {
            store: self.clone(),
            staged: Vec::new(),
        })
    }
}

#[async_trait]
impl Transaction for RecordingTransaction {
    async fn run(
        &mut self,
        statement: &Statement,
        params: &Params,
    ) -> Result<Vec<Record>, GraphError> {
        self.store.record(StoreEvent::Run {
            text: statement.text().to_string(),
            params: params.clone(),
        });
        let rows = (self.store.inner.responder)(statement, params)?;
        self.staged.push((statement.text().to_string(), params.clone()));
        Ok(rows)
    }

    async fn commit(self) -> Result<(), GraphError> {
        self.store.record(StoreEvent::Commit);
        lock(&self.store.inner.visible).extend(self.staged);
        Ok(())
    }

    async fn rollback(self) -> Result<(), GraphError> {
        self.store.record(StoreEvent::Rollback);
        Ok(())
    }
}
