//! Operation handlers: build → execute → map.

use std::future::Future;

use tracing::Instrument;
use uuid::Uuid;

use moviegraph_core::{AddActorInput, CreateMovieInput, Movie, MovieFilter, MovieOptions, Person};
use moviegraph_graph::mutations::{add_actor_batch, create_movie_batch, PERSON};
use moviegraph_graph::queries::{movies_batch, ACTORS, MOVIE};
use moviegraph_graph::{GraphError, GraphStore, TransactionExecutor};

/// The API's resolver set over a shared store handle.
pub struct MovieApi<S> {
    executor: TransactionExecutor<S>,
}

impl<S: GraphStore> MovieApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            executor: TransactionExecutor::new(store),
        }
    }

    /// `movies(where, options)`: every matching movie with its actors,
    /// possibly none.
    pub async fn movies(
        &self,
        filter: Option<&MovieFilter>,
        options: Option<&MovieOptions>,
    ) -> Result<Vec<Movie>, GraphError> {
        resolve("movies", async {
            let batch = movies_batch(filter, options);
            let outcome = self.executor.execute(&batch).await?;
            outcome
                .final_rows()
                .iter()
                .map(|row| row.movie_with_actors(MOVIE, ACTORS))
                .collect::<Result<Vec<_>, _>>()
        })
        .await
    }

    /// `createMovie(input)`: the created movie, with the actors linked by the
    /// last statement of the batch.
    pub async fn create_movie(&self, input: &CreateMovieInput) -> Result<Movie, GraphError> {
        resolve("createMovie", async {
            let batch = create_movie_batch(input)?;
            let outcome = self.executor.execute(&batch).await?;
            let row = outcome
                .final_rows()
                .first()
                .ok_or_else(|| GraphError::Mapping("createMovie returned no movie row".into()))?;
            row.movie_with_actors(MOVIE, ACTORS)
        })
        .await
    }

    /// `addActor(input)`: the upserted person, whether or not the movie exists.
    pub async fn add_actor(&self, input: &AddActorInput) -> Result<Person, GraphError> {
        resolve("addActor", async {
            let batch = add_actor_batch(input)?;
            let outcome = self.executor.execute(&batch).await?;
            if outcome.final_rows().is_empty() {
                tracing::warn!(
                    movie_title = %input.movie_title,
                    "No movie with this title; person created without an edge"
                );
            }
            let row = outcome
                .rows(0)
                .first()
                .ok_or_else(|| GraphError::Mapping("addActor returned no person row".into()))?;
            row.person(PERSON)
        })
        .await
    }
}

/// Run a handler inside its operation span, logging any failure before
/// handing it back untouched.
async fn resolve<T, F>(operation: &'static str, handler: F) -> Result<T, GraphError>
where
    F: Future<Output = Result<T, GraphError>>,
{
    let span = tracing::info_span!("resolver", operation, request_id = %Uuid::new_v4());
    async move {
        let result = handler.await;
        match &result {
            Ok(_) => tracing::debug!("Resolver completed"),
            Err(e) => tracing::error!(operation, kind = e.kind(), error = %e, "Resolver failed"),
        }
        result
    }
    .instrument(span)
    .await
}
