//! Store-agnostic result rows and their mapping onto API entities.

use std::collections::BTreeMap;

use moviegraph_core::{Movie, Person};
use serde_json::Value;

use crate::client::GraphError;

/// A raw graph node: internal identity, labels, and property map.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeRecord {
    pub identity: i64,
    pub labels: Vec<String>,
    pub properties: serde_json::Map<String, Value>,
}

impl NodeRecord {
    pub fn new(identity: i64, label: &str) -> Self {
        Self {
            identity,
            labels: vec![label.to_string()],
            properties: serde_json::Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// One result row, keyed by returned column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: BTreeMap<String, NodeRecord>,
    lists: BTreeMap<String, Vec<NodeRecord>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, node: NodeRecord) -> Self {
        self.insert(column, node);
        self
    }

    pub fn insert(&mut self, column: &str, node: NodeRecord) {
        self.columns.insert(column.to_string(), node);
    }

    pub fn with_list(mut self, column: &str, nodes: Vec<NodeRecord>) -> Self {
        self.insert_list(column, nodes);
        self
    }

    pub fn insert_list(&mut self, column: &str, nodes: Vec<NodeRecord>) {
        self.lists.insert(column.to_string(), nodes);
    }

    pub fn get(&self, column: &str) -> Option<&NodeRecord> {
        self.columns.get(column)
    }

    pub fn get_list(&self, column: &str) -> Option<&[NodeRecord]> {
        self.lists.get(column).map(Vec::as_slice)
    }

    fn node(&self, column: &str) -> Result<&NodeRecord, GraphError> {
        self.get(column)
            .ok_or_else(|| GraphError::Mapping(format!("Row has no column `{column}`")))
    }

    /// Map the node in `column` to a Movie.
    pub fn movie(&self, column: &str) -> Result<Movie, GraphError> {
        movie_from_node(self.node(column)?)
    }

    /// Map the node in `column` to a Movie whose actors are the Person nodes
    /// in list column `actors`.
    pub fn movie_with_actors(&self, column: &str, actors: &str) -> Result<Movie, GraphError> {
        let mut movie = self.movie(column)?;
        movie.actors = self
            .get_list(actors)
            .ok_or_else(|| GraphError::Mapping(format!("Row has no list column `{actors}`")))?
            .iter()
            .map(person_from_node)
            .collect::<Result<_, _>>()?;
        Ok(movie)
    }

    /// Map the node in `column` to a Person.
    pub fn person(&self, column: &str) -> Result<Person, GraphError> {
        person_from_node(self.node(column)?)
    }
}

pub fn movie_from_node(node: &NodeRecord) -> Result<Movie, GraphError> {
    expect_label(node, Movie::LABEL)?;
    Ok(Movie {
        title: required_string(node, "title")?,
        year: node.properties.get("year").and_then(Value::as_i64),
        plot: node
            .properties
            .get("plot")
            .and_then(Value::as_str)
            .map(str::to_string),
        imdb_rating: node.properties.get("imdbRating").and_then(Value::as_f64),
        actors: Vec::new(),
    })
}

pub fn person_from_node(node: &NodeRecord) -> Result<Person, GraphError> {
    expect_label(node, Person::LABEL)?;
    Ok(Person {
        name: required_string(node, "name")?,
    })
}

fn expect_label(node: &NodeRecord, label: &str) -> Result<(), GraphError> {
    if node.has_label(label) {
        Ok(())
    } else {
        Err(GraphError::Mapping(format!(
            "Node {} has labels {:?}, expected {label}",
            node.identity, node.labels
        )))
    }
}

fn required_string(node: &NodeRecord, key: &str) -> Result<String, GraphError> {
    node.properties
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            GraphError::Mapping(format!(
                "Node {} is missing required property `{key}`",
                node.identity
            ))
        })
}
