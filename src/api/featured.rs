use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::db::{FeaturedRepo, Movie, MovieRepo, StoreError, StoreResult};

/// Picks a random featured movie.
///
/// The featured id list is loaded from the store the first time it is
/// needed and then kept for the life of the process. While it is empty
/// every call tries to load it again. Two requests racing on an empty
/// cache both load it; both store the same list, so whichever lands last
/// wins without harm.
pub struct FeaturedMovies {
    ids: ArcSwap<Vec<String>>,
    rng: Mutex<StdRng>,
}

impl Default for FeaturedMovies {
    fn default() -> Self {
        Self::new()
    }
}

impl FeaturedMovies {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            ids: ArcSwap::from_pointee(Vec::new()),
            rng: Mutex::new(rng),
        }
    }

    async fn ids<R>(&self, repo: &R) -> StoreResult<Arc<Vec<String>>>
    where
        R: FeaturedRepo + ?Sized,
    {
        let cached = self.ids.load_full();
        if !cached.is_empty() {
            return Ok(cached);
        }

        let loaded = Arc::new(repo.featured_movie_ids().await?);
        if !loaded.is_empty() {
            info!(count = loaded.len(), "cached featured movie ids");
            self.ids.store(Arc::clone(&loaded));
        }
        Ok(loaded)
    }

    /// Choose one featured id uniformly at random and read that movie.
    pub async fn pick<R>(&self, repo: &R) -> StoreResult<Movie>
    where
        R: FeaturedRepo + MovieRepo + ?Sized,
    {
        let ids = self.ids(repo).await?;
        if ids.is_empty() {
            return Err(StoreError::NotFound("no featured movies".to_string()));
        }

        let id = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            ids[rng.random_range(0..ids.len())].clone()
        };
        debug!(movie_id = %id, "picked featured movie");

        repo.get_movie(&id).await
    }
}
