//! Batch driver integration tests
//!
//! Covers checkpoint ordering, determinism, resume behavior, fatal batch
//! errors and the invariants every kept record satisfies.

mod helpers;

use chrono::{TimeZone, Utc};
use cinefuse_ingest::error::{DropReason, PipelineError};
use cinefuse_ingest::merge::SourceSet;
use cinefuse_ingest::models::{ImdbTitle, Movie, PartialMovie};
use cinefuse_ingest::pipeline::checkpoint::load_checkpoint;
use cinefuse_ingest::pipeline::layout::{IMDB_CACHE_FILE, RT_CACHE_FILE};
use cinefuse_ingest::pipeline::{load_sources, BatchDriver, DriverOptions, Layout};
use helpers::{adult, feature, without_trailer, write_batch, write_json};
use std::collections::HashMap;
use tempfile::TempDir;

fn layout(dir: &TempDir) -> Layout {
    Layout::new(dir.path(), dir.path().join("out"))
}

fn driver(layout: &Layout, sources: SourceSet, force: bool) -> BatchDriver {
    let options = DriverOptions {
        concurrency: 4,
        min_runtime_minutes: 60,
        force,
    };
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    BatchDriver::new(layout.clone(), sources, options, now)
}

// ============================================================================
// Checkpoints
// ============================================================================

#[tokio::test]
async fn test_checkpoint_sorted_with_drops_counted() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    write_batch(
        &layout,
        0,
        &[
            feature(30, "Thirty"),
            adult(40),
            feature(10, "Ten"),
            without_trailer(50),
            feature(20, "Twenty"),
        ],
    );

    let stats = driver(&layout, SourceSet::default(), false)
        .process_batch(0)
        .await
        .unwrap();

    assert_eq!(stats.input, 5);
    assert_eq!(stats.kept, 3);
    assert_eq!(stats.dropped[&DropReason::Adult], 1);
    assert_eq!(stats.dropped[&DropReason::MissingTrailer], 1);

    let movies = load_checkpoint(&layout.checkpoint(0)).unwrap();
    let ids: Vec<i64> = movies.iter().map(|m| m.tmdb_id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    assert_eq!(movies[0].trailer_url.as_deref(), Some("https://youtube.com/watch?v=key10"));
}

#[tokio::test]
async fn test_output_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    let details: Vec<_> = (1..=40).map(|id| feature(id, &format!("Film {}", id))).collect();
    write_batch(&layout, 0, &details);

    let driver = driver(&layout, SourceSet::default(), true);
    driver.process_batch(0).await.unwrap();
    let first = std::fs::read(layout.checkpoint(0)).unwrap();

    driver.process_batch(0).await.unwrap();
    let second = std::fs::read(layout.checkpoint(0)).unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// Resume
// ============================================================================

#[tokio::test]
async fn test_existing_checkpoints_skipped_unless_forced() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    write_batch(&layout, 0, &[feature(1, "One")]);
    write_batch(&layout, 1, &[feature(2, "Two")]);

    let summary = driver(&layout, SourceSet::default(), false)
        .run(0, 2)
        .await
        .unwrap();
    assert_eq!(summary.batches_processed, 2);

    // Marker content that processing would never produce
    std::fs::write(layout.checkpoint(0), "[]").unwrap();

    let summary = driver(&layout, SourceSet::default(), false)
        .run(0, 2)
        .await
        .unwrap();
    assert_eq!(summary.batches_skipped, 2);
    assert_eq!(std::fs::read_to_string(layout.checkpoint(0)).unwrap(), "[]");

    let summary = driver(&layout, SourceSet::default(), true)
        .run(0, 2)
        .await
        .unwrap();
    assert_eq!(summary.batches_processed, 2);
    assert_eq!(load_checkpoint(&layout.checkpoint(0)).unwrap().len(), 1);
}

#[tokio::test]
async fn test_run_starts_at_requested_batch() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    write_batch(&layout, 0, &[feature(1, "One")]);
    write_batch(&layout, 1, &[feature(2, "Two")]);

    let summary = driver(&layout, SourceSet::default(), false)
        .run(1, 2)
        .await
        .unwrap();

    assert_eq!(summary.batches_processed, 1);
    assert!(!layout.checkpoint(0).exists());
    assert!(layout.checkpoint(1).exists());
}

/// Concatenated bytes of checkpoints `0..num`
fn checkpoint_bytes(layout: &Layout, num: usize) -> Vec<u8> {
    (0..num)
        .flat_map(|n| std::fs::read(layout.checkpoint(n)).unwrap())
        .collect()
}

fn write_batches(layout: &Layout, num: usize) {
    for n in 0..num {
        let details: Vec<_> = (0..5)
            .map(|i| {
                let id = (n * 100 + i) as i64 + 1;
                if i == 3 {
                    adult(id)
                } else {
                    feature(id, &format!("Film {}", id))
                }
            })
            .collect();
        write_batch(layout, n, &details);
    }
}

#[tokio::test]
async fn test_interrupted_run_resumes_to_identical_output() {
    const NUM_BATCHES: usize = 4;
    const INTERRUPTED_AFTER: usize = 2;

    let straight_dir = TempDir::new().unwrap();
    let straight = layout(&straight_dir);
    write_batches(&straight, NUM_BATCHES);
    driver(&straight, SourceSet::default(), false)
        .run(0, NUM_BATCHES)
        .await
        .unwrap();

    let resumed_dir = TempDir::new().unwrap();
    let resumed = layout(&resumed_dir);
    write_batches(&resumed, NUM_BATCHES);
    driver(&resumed, SourceSet::default(), false)
        .run(0, INTERRUPTED_AFTER)
        .await
        .unwrap();
    assert!(!resumed.checkpoint(INTERRUPTED_AFTER).exists());

    let summary = driver(&resumed, SourceSet::default(), false)
        .run(INTERRUPTED_AFTER, NUM_BATCHES)
        .await
        .unwrap();
    assert_eq!(summary.batches_processed, NUM_BATCHES - INTERRUPTED_AFTER);

    assert_eq!(
        checkpoint_bytes(&straight, NUM_BATCHES),
        checkpoint_bytes(&resumed, NUM_BATCHES)
    );
}

// ============================================================================
// Fatal errors
// ============================================================================

#[tokio::test]
async fn test_zero_survivors_is_fatal() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    write_batch(&layout, 0, &[adult(1), without_trailer(2)]);

    let result = driver(&layout, SourceSet::default(), false).run(0, 1).await;

    match result {
        Err(PipelineError::EmptyBatch { batch, input }) => {
            assert_eq!(batch, 0);
            assert_eq!(input, 2);
        }
        other => panic!("expected EmptyBatch, got {:?}", other),
    }
    assert!(!layout.checkpoint(0).exists());
}

#[tokio::test]
async fn test_empty_input_writes_empty_checkpoint() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    write_batch(&layout, 0, &[]);

    let stats = driver(&layout, SourceSet::default(), false)
        .process_batch(0)
        .await
        .unwrap();

    assert_eq!(stats.input, 0);
    assert!(load_checkpoint(&layout.checkpoint(0)).unwrap().is_empty());
}

#[tokio::test]
async fn test_unreadable_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);

    let missing = driver(&layout, SourceSet::default(), false).run(0, 1).await;
    assert!(matches!(missing, Err(PipelineError::BatchInput { batch: 0, .. })));

    std::fs::create_dir_all(&layout.out_dir).unwrap();
    std::fs::write(layout.batch_input(0), "{ not json").unwrap();
    let garbled = driver(&layout, SourceSet::default(), false).run(0, 1).await;
    assert!(matches!(garbled, Err(PipelineError::BatchInput { batch: 0, .. })));
}

#[tokio::test]
async fn test_stops_at_first_failing_batch() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    write_batch(&layout, 0, &[feature(1, "One")]);
    write_batch(&layout, 1, &[adult(2)]);
    write_batch(&layout, 2, &[feature(3, "Three")]);

    let result = driver(&layout, SourceSet::default(), false).run(0, 3).await;

    assert!(matches!(result, Err(PipelineError::EmptyBatch { batch: 1, .. })));
    assert!(layout.checkpoint(0).exists());
    assert!(!layout.checkpoint(2).exists());
}

// ============================================================================
// Secondary sources
// ============================================================================

#[tokio::test]
async fn test_cached_sources_are_merged() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    write_batch(
        &layout,
        0,
        &[feature(1, "Feature"), feature(2, "Series"), feature(3, "Rated")],
    );

    let mut imdb: HashMap<String, ImdbTitle> = HashMap::new();
    imdb.insert(
        "tt0000002".to_string(),
        ImdbTitle {
            main_type: Some("tvSeries".to_string()),
            ..Default::default()
        },
    );
    write_json(&layout.cache(IMDB_CACHE_FILE), &imdb);

    let mut rt: HashMap<String, PartialMovie> = HashMap::new();
    rt.insert(
        "3".to_string(),
        PartialMovie {
            rt_critic_rating: Some(91.0),
            rt_audience_rating: Some(84.0),
            title: Some("Ignored Because Title Exists".to_string()),
            ..Default::default()
        },
    );
    write_json(&layout.cache(RT_CACHE_FILE), &rt);

    std::fs::write(
        layout.imdb_ratings(),
        "tconst\taverageRating\tnumVotes\ntt0000003\t7.9\t250000\n",
    )
    .unwrap();

    let sources = load_sources(&layout).unwrap();
    let stats = driver(&layout, sources, false).process_batch(0).await.unwrap();

    assert_eq!(stats.dropped[&DropReason::NonMovieType], 1);

    let movies = load_checkpoint(&layout.checkpoint(0)).unwrap();
    let rated = movies.iter().find(|m| m.tmdb_id == 3).unwrap();
    assert_eq!(rated.title, "Rated");
    assert_eq!(rated.rt_critic_rating, Some(91.0));
    assert_eq!(rated.imdb_rating, Some(7.9));
    assert_eq!(rated.imdb_votes, Some(250_000));
    assert!(rated.relevancy_score > 0.0);

    let unrated = movies.iter().find(|m| m.tmdb_id == 1).unwrap();
    assert_eq!(unrated.relevancy_score, 0.0);
}

#[tokio::test]
async fn test_kept_records_satisfy_admission_invariants() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);

    let mut short = feature(4, "Short");
    short.runtime = Some(12);
    let mut unreleased = feature(5, "Soon");
    unreleased.status = Some("Post Production".to_string());
    let mut no_imdb = feature(6, "Unknown");
    no_imdb.imdb_id = None;
    let mut concert = feature(7, "National Theatre Live: Hamlet");
    concert.genres.clear();

    write_batch(
        &layout,
        0,
        &[feature(1, "Kept"), adult(2), without_trailer(3), short, unreleased, no_imdb, concert],
    );

    let stats = driver(&layout, SourceSet::default(), false)
        .process_batch(0)
        .await
        .unwrap();
    assert_eq!(stats.kept, 1);
    assert_eq!(stats.total_dropped(), 6);

    let movies: Vec<Movie> = load_checkpoint(&layout.checkpoint(0)).unwrap();
    for movie in &movies {
        assert!(!movie.adult);
        assert!(movie.imdb_id.is_some());
        assert!(movie.trailer_url.is_some());
        assert!(movie.runtime.unwrap_or(0) >= 60);
        assert!(!movie.has_genre("short"));
        assert!(!movie.search_key.is_empty());
    }
}
