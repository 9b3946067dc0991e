use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    Json,
};
use tracing::debug;

use super::error::{ApiError, Resource};
use super::types::HealthStatus;
use crate::db::{Actor, ActorRepo, Movie, MovieRepo, Repository};
use crate::query::{ActorFilter, MovieFilter, Page};
use crate::server::AppState;
use crate::util::QueryParams;

fn page_from_params(state: &AppState, params: &QueryParams) -> Page {
    let number = params.get_parsed::<i64>("pageNumber").unwrap_or(1);
    let size = params.get_parsed::<i64>("pageSize").unwrap_or(0);
    state.config.paging.normalize(number, size)
}

/// An id segment the router could not decode is just another id that
/// does not exist.
fn document_id(
    resource: Resource,
    operation: &'static str,
    path: Result<Path<String>, PathRejection>,
) -> Result<String, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!(operation, %rejection, status = 404, "malformed identifier");
            Err(ApiError::not_found(resource))
        }
    }
}

pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let filter = MovieFilter::from_params(&params);
    let page = page_from_params(&state, &params);
    debug!(?filter, ?page, "listing movies");

    state
        .db
        .query_movies(&filter.to_query(page))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(Resource::Movies, "list_movies", &(&filter, page), e))
}

pub async fn get_movie(
    State(state): State<AppState>,
    movie_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Movie>, ApiError> {
    let movie_id = document_id(Resource::Movies, "get_movie", movie_id)?;
    state
        .db
        .get_movie(&movie_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(Resource::Movies, "get_movie", &movie_id, e))
}

pub async fn list_actors(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Actor>>, ApiError> {
    let filter = ActorFilter::from_params(&params);
    let page = page_from_params(&state, &params);
    debug!(?filter, ?page, "listing actors");

    state
        .db
        .query_actors(&filter.to_query(page))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(Resource::Actors, "list_actors", &(&filter, page), e))
}

pub async fn get_actor(
    State(state): State<AppState>,
    actor_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Actor>, ApiError> {
    let actor_id = document_id(Resource::Actors, "get_actor", actor_id)?;
    state
        .db
        .get_actor(&actor_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(Resource::Actors, "get_actor", &actor_id, e))
}

pub async fn get_featured_movie(State(state): State<AppState>) -> Result<Json<Movie>, ApiError> {
    state
        .featured
        .pick(state.db.as_ref())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(Resource::Featured, "get_featured_movie", &(), e))
}

pub async fn list_genres(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    state
        .db
        .list_genres()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store(Resource::Genres, "list_genres", &(), e))
}

pub async fn healthz(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    state
        .db
        .ping()
        .await
        .map(|_| {
            Json(HealthStatus {
                status: "pass".to_string(),
            })
        })
        .map_err(|e| ApiError::from_store(Resource::Health, "healthz", &(), e))
}
