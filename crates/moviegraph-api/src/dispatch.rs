//! Name-based operation dispatch over JSON payloads.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use moviegraph_core::{AddActorInput, CreateMovieInput, MovieFilter, MovieOptions};
use moviegraph_graph::GraphStore;

use crate::error::{ApiError, Result};
use crate::resolvers::MovieApi;

/// The operations exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Movies,
    CreateMovie,
    AddActor,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::CreateMovie => "createMovie",
            Self::AddActor => "addActor",
        }
    }
}

/// Arguments of the `movies` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviesArgs {
    #[serde(rename = "where", default)]
    pub filter: Option<MovieFilter>,
    #[serde(default)]
    pub options: Option<MovieOptions>,
}

impl<S: GraphStore> MovieApi<S> {
    /// Route a JSON payload to the handler bound to `operation` and serialize
    /// its result.
    pub async fn dispatch(&self, operation: Operation, payload: Value) -> Result<Value> {
        tracing::debug!(operation = operation.name(), "Dispatching");
        match operation {
            Operation::Movies => {
                let args: MoviesArgs = if payload.is_null() {
                    MoviesArgs::default()
                } else {
                    parse(operation, payload)?
                };
                let movies = self
                    .movies(args.filter.as_ref(), args.options.as_ref())
                    .await?;
                Ok(serde_json::to_value(movies)?)
            }
            Operation::CreateMovie => {
                let input: CreateMovieInput = parse(operation, payload)?;
                let movie = self.create_movie(&input).await?;
                Ok(serde_json::to_value(movie)?)
            }
            Operation::AddActor => {
                let input: AddActorInput = parse(operation, payload)?;
                let person = self.add_actor(&input).await?;
                Ok(serde_json::to_value(person)?)
            }
        }
    }
}

fn parse<T: DeserializeOwned>(operation: Operation, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| ApiError::InvalidPayload {
        operation: operation.name(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use moviegraph_graph::testing::RecordingStore;
    use moviegraph_graph::{NodeRecord, Record};
    use serde_json::json;

    #[tokio::test]
    async fn null_payload_lists_all_movies() {
        let store = RecordingStore::new(|_, _| {
            Ok(vec![Record::new()
                .with(
                    "m",
                    NodeRecord::new(1, "Movie")
                        .with_property("title", "Heat")
                        .with_property("imdbRating", 8.3),
                )
                .with_list(
                    "actors",
                    vec![NodeRecord::new(2, "Person").with_property("name", "Al Pacino")],
                )])
        });
        let api = MovieApi::new(store.clone());

        let response = api.dispatch(Operation::Movies, Value::Null).await.unwrap();
        assert_eq!(
            response,
            json!([{
                "title": "Heat",
                "year": null,
                "plot": null,
                "imdbRating": 8.3,
                "actors": [{"name": "Al Pacino"}]
            }])
        );
        assert_eq!(
            store.runs()[0].0,
            "MATCH (m:Movie) RETURN m, [(m)<-[:ACTED_IN]-(a:Person) | a] AS actors"
        );
    }

    #[tokio::test]
    async fn where_argument_becomes_a_parameter() {
        let store = RecordingStore::empty();
        let api = MovieApi::new(store.clone());

        let payload = json!({"where": {"imdbRatingGreaterThan": 7}, "options": {"limit": 5}});
        let response = api.dispatch(Operation::Movies, payload).await.unwrap();
        assert_eq!(response, json!([]));

        let runs = store.runs();
        let (text, params) = &runs[0];
        assert_eq!(
            text,
            "MATCH (m:Movie) WHERE m.imdbRating > $imdbRatingGreaterThan \
             RETURN m, [(m)<-[:ACTED_IN]-(a:Person) | a] AS actors LIMIT $limit"
        );
        assert_eq!(params.len(), 2);
    }

    #[tokio::test]
    async fn null_options_fields_fall_back_to_defaults() {
        let store = RecordingStore::empty();
        let api = MovieApi::new(store.clone());

        let payload = json!({
            "where": null,
            "options": {"limit": null, "sort": [{"field": "year", "order": null}]}
        });
        api.dispatch(Operation::Movies, payload).await.unwrap();

        let payload = json!({"options": {"sort": null}});
        api.dispatch(Operation::Movies, payload).await.unwrap();

        let runs = store.runs();
        assert!(runs[0].0.ends_with("ORDER BY m.year ASC"));
        assert!(runs[0].1.is_empty());
        assert!(!runs[1].0.contains("ORDER BY"));
        assert!(runs[1].1.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected_before_the_store() {
        let store = RecordingStore::empty();
        let api = MovieApi::new(store.clone());

        let err = api
            .dispatch(Operation::AddActor, json!({"movieTitle": "Heat"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_payload");
        assert_eq!(store.begin_count(), 0);
    }

    #[tokio::test]
    async fn validation_failure_surfaces_as_validation_kind() {
        let store = RecordingStore::empty();
        let api = MovieApi::new(store.clone());

        let err = api
            .dispatch(Operation::CreateMovie, json!({"title": "", "actors": []}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(store.begin_count(), 0);
    }
}
