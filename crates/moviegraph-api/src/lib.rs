//! moviegraph-api: Resolver dispatch for the movie graph API.
//!
//! Binds each API operation to a handler that builds statements, runs them
//! through the transaction executor, and maps rows back into entities.
//! Failures are logged with the operation name and re-raised unchanged.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod resolvers;

pub use dispatch::{MoviesArgs, Operation};
pub use error::ApiError;
pub use resolvers::MovieApi;
