//! moviegraph-core: Entity model and API input shapes for the movie graph.
//!
//! This crate provides the plain data types shared by every layer:
//! - Entity types (Movie, Person) and the ACTED_IN relationship
//! - Create/add inputs submitted by API clients
//! - Filter, sort, and limit options for the `movies` read
//! - Required-field validation

pub mod error;
pub mod types;

pub use error::ValidationError;
pub use types::{
    ActedIn, ActorInput, AddActorInput, CreateMovieInput, Movie, MovieFilter, MovieOptions,
    MovieSort, MovieSortField, Person, SortOrder,
};
