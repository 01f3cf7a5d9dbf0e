//! Parameterized statements and the batches they are executed in.
//!
//! Statement text only ever references values through `$name` placeholders;
//! the values themselves travel in [`Params`].

use std::collections::BTreeMap;

use crate::client::GraphError;

/// Transaction access mode, fixed per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// A statement parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

pub type Params = BTreeMap<String, ParamValue>;

/// A correlation token: the identity of the node in `column` of the first row
/// returned by statement `source` becomes parameter `param`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub param: String,
    pub source: usize,
    pub column: String,
}

/// How many rows a statement is allowed to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cardinality {
    #[default]
    Any,
    AtMostOne,
    ExactlyOne,
}

impl Cardinality {
    /// Validate the row count of statement `index`.
    ///
    /// More rows than allowed is a constraint violation (an ambiguous match);
    /// a missing required row means the statement did not do what it was
    /// generated to do.
    pub fn check(&self, index: usize, rows: usize) -> Result<(), GraphError> {
        match (self, rows) {
            (Self::AtMostOne | Self::ExactlyOne, n) if n > 1 => Err(GraphError::Constraint(
                format!("statement {index} matched {n} rows where at most one was expected"),
            )),
            (Self::ExactlyOne, 0) => Err(GraphError::Statement(format!(
                "statement {index} returned no row where exactly one was expected"
            ))),
            _ => Ok(()),
        }
    }
}

/// One parameterized unit of Cypher.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    params: Params,
    access: AccessMode,
    bindings: Vec<Binding>,
    returns: Vec<String>,
    list_returns: Vec<String>,
    cardinality: Cardinality,
}

impl Statement {
    fn new(access: AccessMode, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Params::new(),
            access,
            bindings: Vec::new(),
            returns: Vec::new(),
            list_returns: Vec::new(),
            cardinality: Cardinality::Any,
        }
    }

    pub fn read(text: impl Into<String>) -> Self {
        Self::new(AccessMode::Read, text)
    }

    pub fn write(text: impl Into<String>) -> Self {
        Self::new(AccessMode::Write, text)
    }

    pub fn param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    /// Consume the identity of `column` from statement `source`'s first row.
    pub fn bind(mut self, param: &str, source: usize, column: &str) -> Self {
        self.bindings.push(Binding {
            param: param.to_string(),
            source,
            column: column.to_string(),
        });
        self
    }

    /// Declare a node-valued column returned by this statement.
    pub fn returning(mut self, column: &str) -> Self {
        self.returns.push(column.to_string());
        self
    }

    /// Declare a column holding a list of nodes, such as a pattern
    /// comprehension.
    pub fn returning_list(mut self, column: &str) -> Self {
        self.list_returns.push(column.to_string());
        self
    }

    pub fn expecting(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn access(&self) -> AccessMode {
        self.access
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn returns(&self) -> &[String] {
        &self.returns
    }

    pub fn list_returns(&self) -> &[String] {
        &self.list_returns
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

/// An ordered list of statements executed within one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    mode: AccessMode,
    statements: Vec<Statement>,
}

impl Batch {
    pub fn new(mode: AccessMode) -> Self {
        Self {
            mode,
            statements: Vec::new(),
        }
    }

    /// A read batch holding a single statement.
    pub fn read(statement: Statement) -> Self {
        let mut batch = Self::new(AccessMode::Read);
        batch.push(statement);
        batch
    }

    pub fn write() -> Self {
        Self::new(AccessMode::Write)
    }

    /// Append a statement, returning its index for later bindings.
    pub fn push(&mut self, statement: Statement) -> usize {
        self.statements.push(statement);
        self.statements.len() - 1
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Structural checks that need no store access.
    pub fn check(&self) -> Result<(), GraphError> {
        if self.statements.is_empty() {
            return Err(GraphError::Statement("batch contains no statements".into()));
        }
        for (index, statement) in self.statements.iter().enumerate() {
            if self.mode == AccessMode::Read && statement.access == AccessMode::Write {
                return Err(GraphError::Statement(format!(
                    "statement {index} writes but the batch is read-only"
                )));
            }
            if let Some(b) = statement.bindings.iter().find(|b| b.source >= index) {
                return Err(GraphError::Statement(format!(
                    "statement {index} binds ${} from statement {}, which has not run yet",
                    b.param, b.source
                )));
            }
        }
        Ok(())
    }
}
