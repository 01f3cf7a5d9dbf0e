//! Write statement builders for `createMovie` and `addActor`.
//!
//! Persons are upserted by name (MERGE). Edges are only created between
//! nodes the same statement has matched, so no edge is ever dangling.

use moviegraph_core::{ActedIn, AddActorInput, CreateMovieInput, ValidationError};

use crate::queries::{return_movie_with_actors, ACTORS, MOVIE};
use crate::statement::{Batch, Cardinality, Params, Statement};

/// Column the person is returned under.
pub const PERSON: &str = "p";

/// Build the `createMovie` batch: one CREATE for the movie, then one statement
/// per actor that upserts the person and links it to the movie by identity.
pub fn create_movie_batch(input: &CreateMovieInput) -> Result<Batch, ValidationError> {
    input.validate()?;

    let mut params = Params::new();
    params.insert("title".to_string(), input.title.clone().into());

    let mut assignments = Vec::new();
    if let Some(year) = input.year {
        assignments.push("m.year = $year");
        params.insert("year".to_string(), year.into());
    }
    if let Some(plot) = &input.plot {
        assignments.push("m.plot = $plot");
        params.insert("plot".to_string(), plot.clone().into());
    }

    let mut cypher = "CREATE (m:Movie {title: $title})".to_string();
    if !assignments.is_empty() {
        cypher.push_str(&format!(" SET {}", assignments.join(", ")));
    }
    cypher.push(' ');
    cypher.push_str(&return_movie_with_actors());

    let mut batch = Batch::write();
    let movie = batch.push(
        Statement::write(cypher)
            .with_params(params)
            .returning(MOVIE)
            .returning_list(ACTORS)
            .expecting(Cardinality::ExactlyOne),
    );

    let link = format!(
        "MATCH (m:Movie) WHERE id(m) = $movieId
         MERGE (p:Person {{name: $actorName}})
         CREATE (p)-[:{}]->(m)
         {}",
        ActedIn::TYPE,
        return_movie_with_actors()
    );
    for actor in &input.actors {
        batch.push(
            Statement::write(link.clone())
                .param("actorName", actor.name.as_str())
                .bind("movieId", movie, MOVIE)
                .returning(MOVIE)
                .returning_list(ACTORS)
                .expecting(Cardinality::ExactlyOne),
        );
    }

    Ok(batch)
}

/// Build the `addActor` batch: upsert the person, then link it to the movie
/// found by title.
///
/// An unknown title matches zero rows and creates no edge. More than one movie
/// with the title aborts the batch rather than linking to all of them.
pub fn add_actor_batch(input: &AddActorInput) -> Result<Batch, ValidationError> {
    input.validate()?;

    let mut batch = Batch::write();
    batch.push(
        Statement::write("MERGE (p:Person {name: $name}) RETURN p")
            .param("name", input.actor.name.as_str())
            .returning(PERSON)
            .expecting(Cardinality::ExactlyOne),
    );

    let link = format!(
        "MATCH (m:Movie {{title: $movieTitle}}), (p:Person {{name: $name}})
         CREATE (p)-[:{}]->(m)
         RETURN p",
        ActedIn::TYPE
    );
    batch.push(
        Statement::write(link)
            .param("name", input.actor.name.as_str())
            .param("movieTitle", input.movie_title.as_str())
            .returning(PERSON)
            .expecting(Cardinality::AtMostOne),
    );

    Ok(batch)
}
