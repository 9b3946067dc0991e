use anyhow::Context;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub partition_key: String,
    pub title: String,
    pub genres: Vec<String>,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<i64>,
    pub top_rated: bool,
    /// Actor ids in billing order.
    pub cast: Vec<String>,
    pub text_search: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub partition_key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
    pub professions: Vec<String>,
    /// Movie ids, in the order the store lists them.
    pub movies: Vec<String>,
    pub text_search: String,
}

/// Raw `movies` row. Sequence columns hold JSON arrays.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieRow {
    pub id: String,
    pub partition_key: String,
    pub title: String,
    pub genres: String,
    pub year: i32,
    pub runtime: Option<i32>,
    pub rating: f64,
    pub votes: Option<i64>,
    pub top_rated: bool,
    pub cast_ids: String,
    pub text_search: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActorRow {
    pub id: String,
    pub partition_key: String,
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub professions: String,
    pub movies: String,
    pub text_search: String,
}

impl TryFrom<MovieRow> for Movie {
    type Error = anyhow::Error;

    fn try_from(row: MovieRow) -> Result<Self, Self::Error> {
        let genres = serde_json::from_str(&row.genres)
            .with_context(|| format!("decoding genres of movie {}", row.id))?;
        let cast = serde_json::from_str(&row.cast_ids)
            .with_context(|| format!("decoding cast of movie {}", row.id))?;

        Ok(Movie {
            id: row.id,
            partition_key: row.partition_key,
            title: row.title,
            genres,
            year: row.year,
            runtime: row.runtime,
            rating: row.rating,
            votes: row.votes,
            top_rated: row.top_rated,
            cast,
            text_search: row.text_search,
        })
    }
}

impl TryFrom<ActorRow> for Actor {
    type Error = anyhow::Error;

    fn try_from(row: ActorRow) -> Result<Self, Self::Error> {
        let professions = serde_json::from_str(&row.professions)
            .with_context(|| format!("decoding professions of actor {}", row.id))?;
        let movies = serde_json::from_str(&row.movies)
            .with_context(|| format!("decoding movies of actor {}", row.id))?;

        Ok(Actor {
            id: row.id,
            partition_key: row.partition_key,
            name: row.name,
            birth_year: row.birth_year,
            death_year: row.death_year,
            professions,
            movies,
            text_search: row.text_search,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store reported {status}: {source}")]
    Transient {
        status: StatusCode,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return StoreError::NotFound("no matching row".to_string());
        }
        match transient_status(&e) {
            Some(status) => StoreError::Transient { status, source: e },
            None => StoreError::Unexpected(e.into()),
        }
    }
}

/// Status for failures the store itself reported, `None` for anything that
/// is not a store-side condition (decoding, protocol, configuration).
fn transient_status(e: &sqlx::Error) -> Option<StatusCode> {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            Some(StatusCode::SERVICE_UNAVAILABLE)
        }
        sqlx::Error::Database(db) => {
            // SQLite reports extended result codes; the low byte is the primary code.
            let primary = db
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .map(|code| code & 0xff);
            match primary {
                Some(SQLITE_BUSY) | Some(SQLITE_LOCKED) => Some(StatusCode::TOO_MANY_REQUESTS),
                _ => Some(StatusCode::INTERNAL_SERVER_ERROR),
            }
        }
        _ => None,
    }
}
