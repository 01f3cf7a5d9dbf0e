//! Read statement builder for the `movies` query.

use moviegraph_core::{ActedIn, MovieFilter, MovieOptions};

use crate::statement::{Batch, Params, Statement};

/// Column the matched movie is returned under.
pub const MOVIE: &str = "m";

/// Column the movie's actors are returned under.
pub const ACTORS: &str = "actors";

/// `RETURN` clause for `m` and its actors. The pattern comprehension takes no
/// parameters and yields an empty list for a movie nobody acted in.
pub(crate) fn return_movie_with_actors() -> String {
    format!(
        "RETURN m, [(m)<-[:{}]-(a:Person) | a] AS {ACTORS}",
        ActedIn::TYPE
    )
}

/// Build the `movies` read.
///
/// Clause order is fixed: MATCH, WHERE, RETURN, ORDER BY, LIMIT. Each optional
/// clause appears only when its input is set, and every value travels as a
/// parameter. Sort properties come from a closed enum and are the only
/// identifiers spliced into the text.
pub fn movies_statement(filter: Option<&MovieFilter>, options: Option<&MovieOptions>) -> Statement {
    let mut clauses = vec!["MATCH (m:Movie)".to_string()];
    let mut params = Params::new();

    if let Some(rating) = filter.and_then(|f| f.imdb_rating_greater_than) {
        clauses.push("WHERE m.imdbRating > $imdbRatingGreaterThan".to_string());
        params.insert("imdbRatingGreaterThan".to_string(), rating.into());
    }

    clauses.push(return_movie_with_actors());

    if let Some(options) = options {
        if !options.sort.is_empty() {
            let keys = options
                .sort
                .iter()
                .map(|s| format!("m.{} {}", s.field.property(), s.order.keyword()))
                .collect::<Vec<_>>()
                .join(", ");
            clauses.push(format!("ORDER BY {keys}"));
        }
        if let Some(limit) = options.limit {
            clauses.push("LIMIT $limit".to_string());
            params.insert("limit".to_string(), limit.into());
        }
    }

    Statement::read(clauses.join(" "))
        .with_params(params)
        .returning(MOVIE)
        .returning_list(ACTORS)
}

/// The `movies` read as a single-statement read batch.
pub fn movies_batch(filter: Option<&MovieFilter>, options: Option<&MovieOptions>) -> Batch {
    Batch::read(movies_statement(filter, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{AccessMode, ParamValue};
    use moviegraph_core::{MovieSort, MovieSortField, SortOrder};

    fn sort(field: MovieSortField, order: SortOrder) -> MovieSort {
        MovieSort { field, order }
    }

    #[test]
    fn unrestricted_scan() {
        let stmt = movies_statement(None, None);
        assert_eq!(
            stmt.text(),
            "MATCH (m:Movie) RETURN m, [(m)<-[:ACTED_IN]-(a:Person) | a] AS actors"
        );
        assert!(stmt.params().is_empty());
        assert_eq!(stmt.access(), AccessMode::Read);

        let empty = movies_statement(Some(&MovieFilter::default()), Some(&MovieOptions::default()));
        assert_eq!(
            empty.text(),
            "MATCH (m:Movie) RETURN m, [(m)<-[:ACTED_IN]-(a:Person) | a] AS actors"
        );
    }

    #[test]
    fn rating_filter_is_parameterized() {
        let filter = MovieFilter {
            imdb_rating_greater_than: Some(7.5),
        };
        let stmt = movies_statement(Some(&filter), None);
        assert_eq!(
            stmt.text(),
            "MATCH (m:Movie) WHERE m.imdbRating > $imdbRatingGreaterThan \
             RETURN m, [(m)<-[:ACTED_IN]-(a:Person) | a] AS actors"
        );
        assert!(!stmt.text().contains("7.5"));
        assert_eq!(
            stmt.params().get("imdbRatingGreaterThan"),
            Some(&ParamValue::Float(7.5))
        );
    }

    #[test]
    fn zero_limit_is_emitted() {
        let options = MovieOptions {
            limit: Some(0),
            sort: Vec::new(),
        };
        let stmt = movies_statement(None, Some(&options));
        assert_eq!(
            stmt.text(),
            "MATCH (m:Movie) RETURN m, [(m)<-[:ACTED_IN]-(a:Person) | a] AS actors LIMIT $limit"
        );
        assert_eq!(stmt.params().get("limit"), Some(&ParamValue::Integer(0)));
    }

    #[test]
    fn sort_keys_keep_input_order() {
        let options = MovieOptions {
            limit: None,
            sort: vec![
                sort(MovieSortField::Year, SortOrder::Desc),
                sort(MovieSortField::ImdbRating, SortOrder::Asc),
                sort(MovieSortField::Title, SortOrder::Desc),
            ],
        };
        let stmt = movies_statement(None, Some(&options));
        assert_eq!(
            stmt.text(),
            "MATCH (m:Movie) RETURN m, [(m)<-[:ACTED_IN]-(a:Person) | a] AS actors \
             ORDER BY m.year DESC, m.imdbRating ASC, m.title DESC"
        );
        assert!(stmt.params().is_empty());
    }

    #[test]
    fn full_clause_order() {
        let filter = MovieFilter {
            imdb_rating_greater_than: Some(6.0),
        };
        let options = MovieOptions {
            limit: Some(10),
            sort: vec![sort(MovieSortField::ImdbRating, SortOrder::Desc)],
        };
        let stmt = movies_statement(Some(&filter), Some(&options));
        let text = stmt.text();

        let positions: Vec<usize> = ["MATCH", "WHERE", "RETURN", "ORDER BY", "LIMIT"]
            .iter()
            .map(|kw| text.find(kw).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(stmt.params().len(), 2);
    }

    #[test]
    fn actors_come_back_as_a_list_column() {
        let stmt = movies_statement(None, None);
        assert_eq!(stmt.returns(), [MOVIE.to_string()]);
        assert_eq!(stmt.list_returns(), [ACTORS.to_string()]);
        assert!(stmt.params().is_empty());
    }

    #[test]
    fn batch_is_read_only() {
        let batch = movies_batch(None, None);
        assert_eq!(batch.mode(), AccessMode::Read);
        assert_eq!(batch.len(), 1);
        assert!(batch.check().is_ok());
    }
}
