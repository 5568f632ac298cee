//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use cinefuse_ingest::config::RetryConfig;
use cinefuse_ingest::models::tmdb::{
    Genre, ProductionCountry, Video, VideoList,
};
use cinefuse_ingest::models::MovieDetails;
use cinefuse_ingest::pipeline::Layout;
use cinefuse_ingest::sources::{FetchError, SourceAdapter};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// TMDB details that pass admission and every filter
pub fn feature(id: i64, title: &str) -> MovieDetails {
    MovieDetails {
        id,
        imdb_id: Some(format!("tt{:07}", id)),
        title: Some(title.to_string()),
        original_title: Some(title.to_string()),
        original_language: Some("en".to_string()),
        overview: Some(format!("{} is a film.", title)),
        release_date: Some("2010-05-01".to_string()),
        runtime: Some(110),
        status: Some("Released".to_string()),
        genres: vec![Genre {
            id: 18,
            name: Some("Drama".to_string()),
        }],
        production_countries: vec![ProductionCountry {
            name: Some("United States".to_string()),
            ..Default::default()
        }],
        videos: Some(VideoList {
            results: vec![Video {
                iso_639_1: Some("en".to_string()),
                name: Some("Official Trailer".to_string()),
                key: Some(format!("key{}", id)),
                site: Some("YouTube".to_string()),
                video_type: Some("Trailer".to_string()),
                official: Some(true),
            }],
        }),
        ..Default::default()
    }
}

pub fn adult(id: i64) -> MovieDetails {
    MovieDetails {
        adult: true,
        ..feature(id, "Adult")
    }
}

pub fn without_trailer(id: i64) -> MovieDetails {
    MovieDetails {
        videos: None,
        ..feature(id, "No Trailer")
    }
}

pub fn write_batch(layout: &Layout, batch: usize, details: &[MovieDetails]) {
    std::fs::create_dir_all(&layout.out_dir).unwrap();
    let json = serde_json::to_vec(details).unwrap();
    std::fs::write(layout.batch_input(batch), json).unwrap();
}

pub fn write_json<T: serde::Serialize>(path: &std::path::Path, value: &T) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
}

/// Millisecond delays so retry tests stay fast
pub fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay_ms: 1,
        max_delay_ms: 5,
        rate_limit_penalty_ms: 1,
    }
}

// ============================================================================
// Mock adapter
// ============================================================================

/// Scripted reply for one call
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    NotFound,
    Transient,
    RateLimited,
    Rejected,
    Fatal,
}

/// Adapter answering from a per-id script. Ids without a script, or whose
/// script ran out, get `default`.
pub struct MockAdapter<T> {
    scripts: Mutex<HashMap<String, VecDeque<Reply<T>>>>,
    default: Reply<T>,
    calls: AtomicUsize,
}

impl<T: Clone> MockAdapter<T> {
    pub fn new(default: Reply<T>) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            default,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn script(self, id: &str, replies: Vec<Reply<T>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(id.to_string(), replies.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> SourceAdapter for MockAdapter<T> {
    type Record = T;

    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_by_id(&self, id: &str) -> Result<T, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| self.default.clone());

        match reply {
            Reply::Ok(record) => Ok(record),
            Reply::NotFound => Err(FetchError::NotFound),
            Reply::Transient => Err(FetchError::Transient("connection reset".to_string())),
            Reply::RateLimited => Err(FetchError::RateLimited {
                retry_after: Some(Duration::from_millis(1)),
            }),
            Reply::Rejected => Err(FetchError::Rejected("HTTP 422 Unprocessable Entity".to_string())),
            Reply::Fatal => Err(FetchError::Fatal("HTTP 401 Unauthorized".to_string())),
        }
    }
}
