use std::str::FromStr;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::FromRow;
use tracing::{debug, info};

use super::model::*;
use super::partition::{partition_key, EntityKind};
use super::repo::*;
use crate::query::DocumentQuery;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(db_path: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let repo = Self::from_pool(pool).await?;

        info!("Database opened at {}", db_path);

        Ok(repo)
    }

    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        let repo = Self { pool };
        repo.init_schema().await?;
        Ok(repo)
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::query(schema).execute(&self.pool).await?;
        Ok(())
    }

    async fn read_document<R, T>(&self, kind: EntityKind, id: &str) -> StoreResult<T>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static,
        T: TryFrom<R, Error = anyhow::Error> + Send,
    {
        let pk = partition_key(kind, id)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE partition_key = ? AND id = ?",
            kind.columns(),
            kind.collection()
        );

        let row = sqlx::query_as::<_, R>(&sql)
            .bind(&pk)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", kind.as_str(), id)))?;

        Ok(T::try_from(row)?)
    }

    /// Run `query` and drain its cursor. Rows come back in store order.
    async fn drain<R, T>(&self, query: &DocumentQuery) -> StoreResult<Vec<T>>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static,
        T: TryFrom<R, Error = anyhow::Error> + Send,
    {
        let sql = query.to_sql();
        debug!(sql = %sql, "running document query");

        let mut rows = sqlx::query_as::<_, R>(&sql).fetch(&self.pool);
        let mut documents = Vec::new();
        while let Some(row) = rows.try_next().await? {
            documents.push(T::try_from(row)?);
        }

        Ok(documents)
    }
}

#[async_trait]
impl MovieRepo for SqliteRepository {
    async fn get_movie(&self, id: &str) -> StoreResult<Movie> {
        self.read_document::<MovieRow, Movie>(EntityKind::Movie, id).await
    }

    async fn query_movies(&self, query: &DocumentQuery) -> StoreResult<Vec<Movie>> {
        debug_assert_eq!(query.kind(), EntityKind::Movie);
        self.drain::<MovieRow, Movie>(query).await
    }

    async fn list_genres(&self) -> StoreResult<Vec<String>> {
        let genres = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT json_each.value FROM movies, json_each(movies.genres) ORDER BY 1",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }
}

#[async_trait]
impl ActorRepo for SqliteRepository {
    async fn get_actor(&self, id: &str) -> StoreResult<Actor> {
        self.read_document::<ActorRow, Actor>(EntityKind::Actor, id).await
    }

    async fn query_actors(&self, query: &DocumentQuery) -> StoreResult<Vec<Actor>> {
        debug_assert_eq!(query.kind(), EntityKind::Actor);
        self.drain::<ActorRow, Actor>(query).await
    }
}

#[async_trait]
impl FeaturedRepo for SqliteRepository {
    async fn featured_movie_ids(&self) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>("SELECT movie_id FROM featured ORDER BY movie_id")
            .fetch_all(&self.pool)
            .await?;
        debug!(count = ids.len(), "loaded featured movie ids");
        Ok(ids)
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{seeded_repository, MATRIX};
    use crate::query::{normalize, ActorFilter, MovieFilter, Page};

    fn first_page() -> Page {
        normalize(1, 0, 100, 1000)
    }

    fn ids(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_point_read() {
        let repo = seeded_repository().await;
        let movie = repo.get_movie(MATRIX).await.unwrap();
        assert_eq!(movie.id, MATRIX);
        assert_eq!(movie.partition_key, "3");
        assert_eq!(movie.cast, vec!["nm0000206", "nm0000401"]);

        let actor = repo.get_actor("nm0000008").await.unwrap();
        assert_eq!(actor.name, "Marlon Brando");
        assert_eq!(actor.death_year, Some(2004));
    }

    #[tokio::test]
    async fn test_point_read_errors() {
        let repo = seeded_repository().await;
        assert!(matches!(
            repo.get_movie("tt9999999").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            repo.get_movie("matrix").await,
            Err(StoreError::MalformedIdentifier(_))
        ));
        assert!(matches!(
            repo.get_actor(MATRIX).await,
            Err(StoreError::MalformedIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_order_and_pages() {
        let repo = seeded_repository().await;
        let all = repo
            .query_movies(&MovieFilter::default().to_query(first_page()))
            .await
            .unwrap();
        assert_eq!(
            ids(&all),
            vec![
                "tt1853555", "tt0097216", "tt0114369", "tt0068646", "tt0133093", "tt0234215",
                "tt0111161",
            ]
        );

        let second = repo
            .query_movies(&MovieFilter::default().to_query(normalize(2, 3, 100, 1000)))
            .await
            .unwrap();
        assert_eq!(ids(&second), ids(&all[3..6]));

        let past_end = repo
            .query_movies(&MovieFilter::default().to_query(normalize(10, 3, 100, 1000)))
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_huge_page_size() {
        let repo = seeded_repository().await;
        let page = normalize(1, i64::from(u32::MAX), 100, u32::MAX);
        assert_eq!(page.limit, u32::MAX);

        let all = repo
            .query_movies(&MovieFilter::default().to_query(page))
            .await
            .unwrap();
        assert_eq!(all.len(), 7);
    }

    #[tokio::test]
    async fn test_genre_match_folds_ascii_only() {
        let repo = seeded_repository().await;
        sqlx::query(
            "INSERT INTO movies (id, partition_key, title, genres, year, rating, top_rated, cast_ids, text_search)
             VALUES ('tt0000042', '2', 'Ben-Hur', '[\"ÉPICO\"]', 1959, 8.1, 0, '[]', 'ben-hur')",
        )
        .execute(repo.pool())
        .await
        .unwrap();

        for genre in ["ÉPICO", "ÉpIcO", "Épico"] {
            let filter = MovieFilter {
                genre: Some(genre.to_string()),
                ..Default::default()
            };
            let found = repo.query_movies(&filter.to_query(first_page())).await.unwrap();
            assert_eq!(ids(&found), vec!["tt0000042"], "genre {}", genre);
        }
    }

    #[tokio::test]
    async fn test_listing_is_idempotent() {
        let repo = seeded_repository().await;
        let query = MovieFilter {
            genre: Some("drama".to_string()),
            ..Default::default()
        }
        .to_query(first_page());

        let first = repo.query_movies(&query).await.unwrap();
        let second = repo.query_movies(&query).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[tokio::test]
    async fn test_filters() {
        let repo = seeded_repository().await;

        let quoted = MovieFilter {
            q: Some("o'brien".to_string()),
            ..Default::default()
        };
        let found = repo.query_movies(&quoted.to_query(first_page())).await.unwrap();
        assert_eq!(ids(&found), vec!["tt1853555"]);

        let top = MovieFilter {
            top_rated: true,
            rating: Some(9.0),
            ..Default::default()
        };
        let found = repo.query_movies(&top.to_query(first_page())).await.unwrap();
        assert_eq!(ids(&found), vec!["tt0068646", "tt0111161"]);

        let with_actor = MovieFilter {
            actor_id: Some("nm0000151".to_string()),
            year: Some(1995),
            ..Default::default()
        };
        let found = repo.query_movies(&with_actor.to_query(first_page())).await.unwrap();
        assert_eq!(ids(&found), vec!["tt0114369"]);

        let nothing = MovieFilter {
            q: Some("matrix".to_string()),
            genre: Some("Comedy".to_string()),
            ..Default::default()
        };
        let found = repo.query_movies(&nothing.to_query(first_page())).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_listing_round_trips_to_point_reads() {
        let repo = seeded_repository().await;
        let actors = repo
            .query_actors(&ActorFilter::default().to_query(first_page()))
            .await
            .unwrap();
        assert_eq!(actors.len(), 6);
        assert_eq!(actors[0].name, "Brad Pitt");

        for actor in &actors {
            let read = repo.get_actor(&actor.id).await.unwrap();
            assert_eq!(&read, actor);
        }
    }

    #[tokio::test]
    async fn test_bad_document_is_unexpected() {
        let repo = seeded_repository().await;
        sqlx::query(
            "INSERT INTO movies (id, partition_key, title, genres, year, rating, top_rated, cast_ids, text_search)
             VALUES ('tt0000001', '1', 'Broken', '{', 2000, 1.0, 0, '[]', 'broken')",
        )
        .execute(repo.pool())
        .await
        .unwrap();

        match repo.get_movie("tt0000001").await {
            Err(StoreError::Unexpected(e)) => {
                assert!(e.root_cause().is::<serde_json::Error>())
            }
            other => panic!("expected unexpected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_genres_and_featured() {
        let repo = seeded_repository().await;
        let genres = repo.list_genres().await.unwrap();
        assert_eq!(
            genres,
            vec!["Action", "Comedy", "Crime", "Documentary", "Drama", "Mystery", "Sci-Fi"]
        );

        let featured = repo.featured_movie_ids().await.unwrap();
        assert_eq!(featured, vec!["tt0111161", MATRIX]);

        repo.ping().await.unwrap();
    }
}
