//! SQLite sink for processed movies
//!
//! One `movies` row per tmdb id with the searchable columns broken out and
//! the full record kept as JSON. Upserts are idempotent, so re-running a
//! batch or the whole upsert stage is safe.

use crate::error::Result;
use crate::models::Movie;
use crate::pipeline::checkpoint::load_checkpoint;
use crate::pipeline::Layout;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{info, warn};

/// Open (creating if needed) the database at `db_path` and ensure the schema.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_movies_table(&pool).await?;
    Ok(pool)
}

pub async fn create_movies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movies (
            tmdb_id INTEGER PRIMARY KEY,
            imdb_id TEXT,
            title TEXT NOT NULL,
            release_year INTEGER,
            foreign_film INTEGER NOT NULL DEFAULT 0,
            relevancy_score REAL NOT NULL DEFAULT 0,
            search_key TEXT NOT NULL DEFAULT '',
            record TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_movies_imdb_id ON movies(imdb_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_movies_relevancy ON movies(relevancy_score DESC)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Upsert `movies` in a single transaction.
///
/// # Returns
/// Number of rows written.
pub async fn upsert_movies(pool: &SqlitePool, movies: &[Movie]) -> Result<usize> {
    let mut tx = pool.begin().await?;

    for movie in movies {
        let record = serde_json::to_string(movie)?;
        sqlx::query(
            r#"
            INSERT INTO movies (
                tmdb_id, imdb_id, title, release_year,
                foreign_film, relevancy_score, search_key, record, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(tmdb_id) DO UPDATE SET
                imdb_id = excluded.imdb_id,
                title = excluded.title,
                release_year = excluded.release_year,
                foreign_film = excluded.foreign_film,
                relevancy_score = excluded.relevancy_score,
                search_key = excluded.search_key,
                record = excluded.record,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(movie.tmdb_id)
        .bind(movie.imdb_id.as_deref())
        .bind(&movie.title)
        .bind(movie.release_year)
        .bind(movie.foreign)
        .bind(movie.relevancy_score)
        .bind(&movie.search_key)
        .bind(&record)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(movies.len())
}

/// Upsert every checkpoint in `start_batch..num_batches`.
///
/// Batches without a checkpoint are skipped with a warning.
pub async fn upsert_checkpoints(
    pool: &SqlitePool,
    layout: &Layout,
    start_batch: usize,
    num_batches: usize,
) -> Result<usize> {
    let mut total = 0;

    for batch in start_batch..num_batches {
        let path = layout.checkpoint(batch);
        if !path.exists() {
            warn!(batch, path = %path.display(), "No checkpoint, skipping upsert");
            continue;
        }

        let movies = load_checkpoint(&path)?;
        let written = upsert_movies(pool, &movies).await?;
        info!(batch, rows = written, "Batch upserted");
        total += written;
    }

    Ok(total)
}

/// Number of rows in `movies`
pub async fn count_movies(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
