use super::builder::{search_term, DocumentQuery, Literal, Predicate};
use super::pagination::Page;
use crate::db::EntityKind;
use crate::util::QueryParams;

/// Optional constraints for a movie listing. Unset values add no predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    pub q: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub top_rated: bool,
    pub actor_id: Option<String>,
}

impl MovieFilter {
    /// Read `q`, `genre`, `year`, `rating`, `topRated` and `actorId`.
    /// Values that do not parse count as unset, as do empty strings, a zero
    /// year and a zero rating.
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            q: params.get("q").and_then(search_term),
            genre: non_empty(params.get("genre")),
            year: params.get_parsed::<i32>("year").filter(|y| *y != 0),
            rating: params
                .get_parsed::<f64>("rating")
                .filter(|r| r.is_finite() && *r > 0.0),
            top_rated: params.get_bool("topRated"),
            actor_id: non_empty(params.get("actorId")),
        }
    }

    pub fn to_query(&self, page: Page) -> DocumentQuery {
        let mut query = DocumentQuery::new(EntityKind::Movie, page);

        if let Some(ref q) = self.q {
            query = query.and(Predicate::Contains {
                field: "text_search",
                needle: q.clone(),
            });
        }
        if let Some(ref genre) = self.genre {
            query = query.and(Predicate::Includes {
                field: "genres",
                value: genre.clone(),
                ignore_case: true,
            });
        }
        if let Some(year) = self.year {
            query = query.and(Predicate::Equals {
                field: "year",
                value: Literal::Integer(i64::from(year)),
            });
        }
        if let Some(rating) = self.rating {
            query = query.and(Predicate::AtLeast {
                field: "rating",
                value: Literal::Real(rating),
            });
        }
        if self.top_rated {
            query = query.and(Predicate::Equals {
                field: "top_rated",
                value: Literal::Bool(true),
            });
        }
        if let Some(ref actor_id) = self.actor_id {
            query = query.and(Predicate::Includes {
                field: "cast_ids",
                value: actor_id.clone(),
                ignore_case: false,
            });
        }

        query
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorFilter {
    pub q: Option<String>,
}

impl ActorFilter {
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            q: params.get("q").and_then(search_term),
        }
    }

    pub fn to_query(&self, page: Page) -> DocumentQuery {
        let query = DocumentQuery::new(EntityKind::Actor, page);
        match self.q {
            Some(ref q) => query.and(Predicate::Contains {
                field: "text_search",
                needle: q.clone(),
            }),
            None => query,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
