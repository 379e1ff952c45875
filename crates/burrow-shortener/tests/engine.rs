use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use burrow_core::{ShortCode, TargetUrl};
use burrow_generator::{Generator, RandomGenerator};
use burrow_redirector::{
    CachedRepository, MokaUrlCache, Redirector, RedirectorError, RedirectorService,
};
use burrow_shortener::{AllocatorSettings, Shortener, ShortenerError, ShortenerService};
use burrow_storage::{InMemoryRepository, ReadRepository, SqliteRepository, SqliteSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Barrier;

type Engine = (
    Arc<ShortenerService<Arc<InMemoryRepository>, RandomGenerator<StdRng>>>,
    RedirectorService<CachedRepository<Arc<InMemoryRepository>, MokaUrlCache>>,
);

fn engine(seed: u64) -> Engine {
    let repository = Arc::new(InMemoryRepository::new());
    let shortener = ShortenerService::new(
        Arc::clone(&repository),
        RandomGenerator::with_rng(StdRng::seed_from_u64(seed), 6),
    );
    let redirector =
        RedirectorService::new(CachedRepository::new(repository, MokaUrlCache::new()));
    (Arc::new(shortener), redirector)
}

#[tokio::test]
async fn scenario_allocate_resolve_and_miss() {
    let (shortener, redirector) = engine(7);

    let code = shortener.shorten("http://long.example/path?q=1").await.unwrap();
    assert_eq!(code.as_str().len(), 6);

    let target = redirector.resolve(code.as_str()).await.unwrap();
    assert_eq!(target.as_str(), "http://long.example/path?q=1");

    let missing = redirector.resolve("zzzzzz").await.unwrap_err();
    assert!(matches!(missing, RedirectorError::NotFound));
}

#[tokio::test]
async fn resolve_returns_normalized_input() {
    let (shortener, redirector) = engine(11);

    for raw in [
        "example.com",
        "  https://x.io/a ",
        "HTTPS://Mixed.Case/Path",
        "http://host:8080/a?b=c#frag",
    ] {
        let code = shortener.shorten(raw).await.unwrap();
        let expected = TargetUrl::normalize(raw).unwrap();
        assert_eq!(redirector.resolve(code.as_str()).await.unwrap(), expected);
    }
}

#[tokio::test]
async fn allocation_is_idempotent() {
    let (shortener, _) = engine(13);

    let first = shortener.shorten("https://example.com/a").await.unwrap();
    let second = shortener.shorten("https://example.com/a").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn invalid_inputs_never_allocate() {
    let (shortener, _) = engine(17);

    for raw in ["", "   ", "not a url", "javascript:alert(1)"] {
        let err = shortener.shorten(raw).await.unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidInput(_)), "{raw:?}");
    }
    assert!(shortener.repository().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_allocations_of_one_target_share_a_code() {
    let (shortener, redirector) = engine(19);
    let barrier = Arc::new(Barrier::new(32));
    let mut handles = vec![];

    for _ in 0..32 {
        let shortener = Arc::clone(&shortener);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            shortener.shorten("https://popular.example").await.unwrap()
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        codes.insert(handle.await.unwrap());
    }
    assert_eq!(codes.len(), 1);
    assert_eq!(shortener.repository().len(), 1);

    let code = codes.into_iter().next().unwrap();
    assert_eq!(
        redirector.resolve(code.as_str()).await.unwrap().as_str(),
        "https://popular.example"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_allocations_of_distinct_targets_get_distinct_codes() {
    let (shortener, redirector) = engine(23);
    let barrier = Arc::new(Barrier::new(64));
    let mut handles = vec![];

    for i in 0..64 {
        let shortener = Arc::clone(&shortener);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            let url = format!("https://site{i}.example/");
            let code = shortener.shorten(&url).await.unwrap();
            (code, url)
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let (code, url) = handle.await.unwrap();
        assert_eq!(redirector.resolve(code.as_str()).await.unwrap().as_str(), url);
        codes.insert(code);
    }
    assert_eq!(codes.len(), 64);
}

struct Constant;

impl Generator for Constant {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        ShortCode::new_unchecked("AAAAAA")
    }
}

#[tokio::test]
async fn code_allocated_after_a_miss_is_resolvable() {
    let repository = Arc::new(InMemoryRepository::new());
    let shortener = ShortenerService::new(Arc::clone(&repository), Constant);
    let redirector =
        RedirectorService::new(CachedRepository::new(repository, MokaUrlCache::new()));

    assert!(matches!(
        redirector.resolve("AAAAAA").await,
        Err(RedirectorError::NotFound)
    ));

    let code = shortener.shorten("https://late.example").await.unwrap();
    assert_eq!(code.as_str(), "AAAAAA");
    assert_eq!(
        redirector.resolve("AAAAAA").await.unwrap().as_str(),
        "https://late.example"
    );
}

#[tokio::test]
async fn always_colliding_generator_exhausts_retries() {
    let repository = Arc::new(InMemoryRepository::new());
    let settings = AllocatorSettings::builder()
        .max_attempts(3)
        .retry_backoff(Duration::from_millis(1))
        .build();
    let shortener = ShortenerService::with_settings(Arc::clone(&repository), Constant, settings);

    shortener.shorten("https://first.example").await.unwrap();

    let err = shortener.shorten("https://second.example").await.unwrap_err();
    assert!(matches!(err, ShortenerError::ExhaustedRetries { attempts: 3 }));
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn sqlite_engine_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("engine.db").display());
    let settings = SqliteSettings::builder().url(url).build();

    let repository = SqliteRepository::connect(&settings).await.unwrap();
    let shortener = ShortenerService::new(repository.clone(), RandomGenerator::new(6));
    let code = shortener.shorten("example.com/docs").await.unwrap();
    repository.close().await;

    let repository = SqliteRepository::connect(&settings).await.unwrap();
    let record = repository.get_by_code(&code).await.unwrap().unwrap();
    assert_eq!(record.target.as_str(), "http://example.com/docs");

    let shortener = ShortenerService::new(repository.clone(), RandomGenerator::new(6));
    assert_eq!(shortener.shorten("http://example.com/docs").await.unwrap(), code);

    let redirector = RedirectorService::new(repository.clone());
    assert_eq!(
        redirector.resolve(code.as_str()).await.unwrap().as_str(),
        "http://example.com/docs"
    );
    repository.close().await;
}
