use async_trait::async_trait;

use super::model::*;
use crate::query::DocumentQuery;

#[async_trait]
pub trait MovieRepo: Send + Sync {
    /// Point read by id; the partition key is derived from the id.
    async fn get_movie(&self, id: &str) -> StoreResult<Movie>;
    /// Run a movie query and return every row of the requested page.
    async fn query_movies(&self, query: &DocumentQuery) -> StoreResult<Vec<Movie>>;
    async fn list_genres(&self) -> StoreResult<Vec<String>>;
}

#[async_trait]
pub trait ActorRepo: Send + Sync {
    async fn get_actor(&self, id: &str) -> StoreResult<Actor>;
    async fn query_actors(&self, query: &DocumentQuery) -> StoreResult<Vec<Actor>>;
}

#[async_trait]
pub trait FeaturedRepo: Send + Sync {
    async fn featured_movie_ids(&self) -> StoreResult<Vec<String>>;
}

#[async_trait]
pub trait Repository: MovieRepo + ActorRepo + FeaturedRepo + Send + Sync {
    /// Cheapest possible round trip, used by the health check.
    async fn ping(&self) -> StoreResult<()>;
}
