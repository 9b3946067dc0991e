use std::fmt::Debug;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, warn};

use super::types::ErrorBody;
use crate::db::StoreError;

/// The endpoint group a failure happened in. Each one has its own fixed
/// client-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Movies,
    Actors,
    Featured,
    Genres,
    Health,
}

impl Resource {
    fn not_found_message(self) -> &'static str {
        match self {
            Resource::Movies => "Movie not found",
            Resource::Actors => "Actor not found",
            Resource::Featured => "No featured movie available",
            Resource::Genres => "Genre not found",
            Resource::Health => "Not found",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Resource::Movies => "Unable to retrieve movies",
            Resource::Actors => "Unable to retrieve actors",
            Resource::Featured => "Unable to retrieve featured movie",
            Resource::Genres => "Unable to retrieve genres",
            Resource::Health => "Store unavailable",
        }
    }
}

/// A failed request as the client sees it: a status and a stable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    /// Classify a store failure for `operation` and log it with the request
    /// parameters. The store's own error text never reaches the client.
    pub fn from_store(
        resource: Resource,
        operation: &'static str,
        params: &dyn Debug,
        err: StoreError,
    ) -> Self {
        match err {
            StoreError::NotFound(what) => {
                debug!(operation, ?params, %what, status = 404, "not found");
                Self::not_found(resource)
            }
            // Indistinguishable from an id that simply does not exist.
            StoreError::MalformedIdentifier(id) => {
                debug!(operation, ?params, %id, status = 404, "malformed identifier");
                Self::not_found(resource)
            }
            StoreError::Transient { status, source } => {
                warn!(
                    operation,
                    ?params,
                    status = status.as_u16(),
                    error = %source,
                    "store reported a failure"
                );
                Self {
                    status,
                    message: resource.failure_message(),
                }
            }
            StoreError::Unexpected(e) => {
                error!(
                    operation,
                    ?params,
                    status = 500,
                    root_cause = %e.root_cause(),
                    error = ?e,
                    "unexpected failure"
                );
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: resource.failure_message(),
                }
            }
        }
    }

    pub fn not_found(resource: Resource) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: resource.not_found_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message.to_string(),
        });
        (self.status, body).into_response()
    }
}
