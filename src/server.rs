use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::FeaturedMovies;
use crate::config::Config;
use crate::db::SqliteRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<SqliteRepository>,
    pub featured: Arc<FeaturedMovies>,
}

impl AppState {
    pub fn new(config: Config, db: Arc<SqliteRepository>, featured: Arc<FeaturedMovies>) -> Self {
        Self {
            config: Arc::new(config),
            db,
            featured,
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(crate::api::list_movies))
        .route("/movies/:movie_id", get(crate::api::get_movie))
        .route("/actors", get(crate::api::list_actors))
        .route("/actors/:actor_id", get(crate::api::get_actor))
        .route("/featured/movie", get(crate::api::get_featured_movie))
        .route("/genres", get(crate::api::list_genres))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .route("/healthz", get(crate::api::healthz))
        .merge(api_routes())
        .nest("/api", api_routes())
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    // CORS preflight for paths without a route.
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
