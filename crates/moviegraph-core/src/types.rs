//! Core domain types for the movie graph.
//!
//! Entities are owned by the graph store; these are transient, per-request
//! shapes. Field names serialize in camelCase to match the API surface.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

// ── Entities ──────────────────────────────────────────────────────

/// A movie node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub title: String,
    pub year: Option<i64>,
    pub plot: Option<String>,
    /// Stored rating; read-only from the API's point of view.
    pub imdb_rating: Option<f64>,
    /// People with an `ACTED_IN` edge to this movie, one hop deep.
    #[serde(default)]
    pub actors: Vec<Person>,
}

/// A person node. Acts in zero or more movies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
}

/// The directed `(:Person)-[:ACTED_IN]->(:Movie)` relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActedIn;

impl ActedIn {
    pub const TYPE: &'static str = "ACTED_IN";
}

impl Movie {
    pub const LABEL: &'static str = "Movie";
}

impl Person {
    pub const LABEL: &'static str = "Person";
}

// ── Inputs ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActorInput {
    pub name: String,
}

/// Payload of `createMovie`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieInput {
    pub title: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub actors: Vec<ActorInput>,
}

/// Payload of `addActor`. The movie is located by title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddActorInput {
    pub movie_title: String,
    pub actor: ActorInput,
}

impl CreateMovieInput {
    /// Check required fields: `title` and every actor `name`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        for (i, actor) in self.actors.iter().enumerate() {
            require(&format!("actors[{i}].name"), &actor.name)?;
        }
        Ok(())
    }
}

impl AddActorInput {
    /// Check required fields: `movieTitle` and `actor.name`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("movieTitle", &self.movie_title)?;
        require("actor.name", &self.actor.name)
    }
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

// ── Read Options ──────────────────────────────────────────────────

/// Restriction for the `movies` read. All fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieFilter {
    #[serde(default)]
    pub imdb_rating_greater_than: Option<f64>,
}

/// Sortable Movie properties.
///
/// Property names cannot be statement parameters, so ordering is limited to
/// this closed set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MovieSortField {
    Title,
    Year,
    ImdbRating,
}

impl MovieSortField {
    /// Name of the stored node property.
    pub fn property(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Year => "year",
            Self::ImdbRating => "imdbRating",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieSort {
    pub field: MovieSortField,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: SortOrder,
}

/// Sort and limit options for the `movies` read.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieOptions {
    /// Maximum rows returned. Zero is a legal limit and yields nothing.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Sort keys, applied left-to-right as tie-breakers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort: Vec<MovieSort>,
}

/// Transports send `null` for unset optional inputs; treat it as absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
