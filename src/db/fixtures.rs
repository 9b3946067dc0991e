//! In-memory stores seeded with a small, fixed catalogue for tests.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::partition::{partition_key, EntityKind};
use super::sqlite::SqliteRepository;

pub const MATRIX: &str = "tt0133093";
pub const SHAWSHANK: &str = "tt0111161";

struct MovieSeed {
    id: &'static str,
    title: &'static str,
    genres: &'static [&'static str],
    year: i32,
    rating: f64,
    top_rated: bool,
    cast: &'static [&'static str],
}

struct ActorSeed {
    id: &'static str,
    name: &'static str,
    birth_year: i32,
    death_year: Option<i32>,
    professions: &'static [&'static str],
    movies: &'static [&'static str],
}

const MOVIES: &[MovieSeed] = &[
    MovieSeed {
        id: MATRIX,
        title: "The Matrix",
        genres: &["Action", "Sci-Fi"],
        year: 1999,
        rating: 8.7,
        top_rated: true,
        cast: &["nm0000206", "nm0000401"],
    },
    MovieSeed {
        id: "tt0234215",
        title: "The Matrix Reloaded",
        genres: &["Action", "Sci-Fi"],
        year: 2003,
        rating: 7.2,
        top_rated: false,
        cast: &["nm0000206", "nm0000401"],
    },
    MovieSeed {
        id: SHAWSHANK,
        title: "The Shawshank Redemption",
        genres: &["Drama"],
        year: 1994,
        rating: 9.3,
        top_rated: true,
        cast: &["nm0000209", "nm0000151"],
    },
    MovieSeed {
        id: "tt0068646",
        title: "The Godfather",
        genres: &["Crime", "Drama"],
        year: 1972,
        rating: 9.2,
        top_rated: true,
        cast: &["nm0000008"],
    },
    MovieSeed {
        id: "tt0114369",
        title: "Se7en",
        genres: &["Crime", "Drama", "Mystery"],
        year: 1995,
        rating: 8.6,
        top_rated: false,
        cast: &["nm0000093", "nm0000151"],
    },
    MovieSeed {
        id: "tt0097216",
        title: "Do the Right Thing",
        genres: &["Comedy", "Drama"],
        year: 1989,
        rating: 7.9,
        top_rated: false,
        cast: &[],
    },
    MovieSeed {
        id: "tt1853555",
        title: "Conan O'Brien Can't Stop",
        genres: &["Documentary"],
        year: 2011,
        rating: 6.9,
        top_rated: false,
        cast: &[],
    },
];

const ACTORS: &[ActorSeed] = &[
    ActorSeed {
        id: "nm0000206",
        name: "Keanu Reeves",
        birth_year: 1964,
        death_year: None,
        professions: &["actor", "producer"],
        movies: &[MATRIX, "tt0234215"],
    },
    ActorSeed {
        id: "nm0000401",
        name: "Laurence Fishburne",
        birth_year: 1961,
        death_year: None,
        professions: &["actor"],
        movies: &[MATRIX, "tt0234215"],
    },
    ActorSeed {
        id: "nm0000209",
        name: "Tim Robbins",
        birth_year: 1958,
        death_year: None,
        professions: &["actor", "director"],
        movies: &[SHAWSHANK],
    },
    ActorSeed {
        id: "nm0000151",
        name: "Morgan Freeman",
        birth_year: 1937,
        death_year: None,
        professions: &["actor", "producer"],
        movies: &[SHAWSHANK, "tt0114369"],
    },
    ActorSeed {
        id: "nm0000008",
        name: "Marlon Brando",
        birth_year: 1924,
        death_year: Some(2004),
        professions: &["actor"],
        movies: &["tt0068646"],
    },
    ActorSeed {
        id: "nm0000093",
        name: "Brad Pitt",
        birth_year: 1963,
        death_year: None,
        professions: &["actor", "producer"],
        movies: &["tt0114369"],
    },
];

/// Schema only, no documents.
pub async fn empty_repository() -> SqliteRepository {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    // One connection that never expires: every connection to `:memory:`
    // is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await
        .unwrap();
    SqliteRepository::from_pool(pool).await.unwrap()
}

/// The full catalogue, featuring The Matrix and The Shawshank Redemption.
pub async fn seeded_repository() -> SqliteRepository {
    let repo = empty_repository().await;

    for m in MOVIES {
        sqlx::query(
            "INSERT INTO movies (id, partition_key, title, genres, year, rating, top_rated, cast_ids, text_search)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(m.id)
        .bind(partition_key(EntityKind::Movie, m.id).unwrap())
        .bind(m.title)
        .bind(serde_json::to_string(m.genres).unwrap())
        .bind(m.year)
        .bind(m.rating)
        .bind(m.top_rated)
        .bind(serde_json::to_string(m.cast).unwrap())
        .bind(m.title.to_lowercase())
        .execute(repo.pool())
        .await
        .unwrap();
    }

    for a in ACTORS {
        sqlx::query(
            "INSERT INTO actors (id, partition_key, name, birth_year, death_year, professions, movies, text_search)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(a.id)
        .bind(partition_key(EntityKind::Actor, a.id).unwrap())
        .bind(a.name)
        .bind(a.birth_year)
        .bind(a.death_year)
        .bind(serde_json::to_string(a.professions).unwrap())
        .bind(serde_json::to_string(a.movies).unwrap())
        .bind(a.name.to_lowercase())
        .execute(repo.pool())
        .await
        .unwrap();
    }

    feature(&repo, &[MATRIX, SHAWSHANK]).await;
    repo
}

pub async fn feature(repo: &SqliteRepository, ids: &[&str]) {
    for id in ids {
        sqlx::query("INSERT INTO featured (movie_id) VALUES (?)")
            .bind(*id)
            .execute(repo.pool())
            .await
            .unwrap();
    }
}
