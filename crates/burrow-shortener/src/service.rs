use async_trait::async_trait;
use burrow_core::{
    InsertOutcome, Repository, ShortCode, Shortener, ShortenerError, TargetUrl, UrlRecord,
};
use burrow_generator::Generator;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Tuning for the collision retry loop.
#[derive(Debug, Clone, TypedBuilder)]
pub struct AllocatorSettings {
    /// Candidates tried before giving up. Values below 1 are treated as 1.
    #[builder(default = 10)]
    pub max_attempts: u32,
    /// Pause after the n-th collision is `n * retry_backoff`.
    #[builder(default = Duration::from_millis(5))]
    pub retry_backoff: Duration,
    /// Codes that must never be handed out, such as path segments a
    /// transport routes elsewhere. A reserved candidate counts as taken.
    #[builder(
        default,
        setter(transform = |codes: &[&str]| codes.iter().map(|c| c.to_string()).collect())
    )]
    pub reserved_codes: HashSet<String>,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL normalization
/// - Dedup of repeated targets through the reverse index
/// - Bounded retry when a candidate code is already taken
///
/// Uniqueness is never decided here. The repository's atomic
/// `insert_if_absent` is the only arbiter, so any number of services may
/// share one repository.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: AllocatorSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with default retry settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, AllocatorSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: AllocatorSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn allocate(&self, target: TargetUrl) -> Result<ShortCode, ShortenerError> {
        if let Some(existing) = self.repository.get_by_target(&target).await? {
            debug!(code = %existing.code, target = %target, "target already shortened");
            return Ok(existing.code);
        }

        let max_attempts = self.settings.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let candidate: ShortCode = self.generator.generate().into();

            let outcome = if self.settings.reserved_codes.contains(candidate.as_str()) {
                debug!(code = %candidate, "candidate short code is reserved");
                InsertOutcome::CodeTaken
            } else {
                let record = UrlRecord::new(candidate, target.clone());
                self.repository.insert_if_absent(record).await?
            };

            match outcome {
                InsertOutcome::Inserted(record) => {
                    info!(
                        code = %record.code,
                        target = %record.target,
                        attempt,
                        "allocated short code"
                    );
                    return Ok(record.code);
                }
                InsertOutcome::DuplicateTarget(record) => {
                    debug!(
                        code = %record.code,
                        target = %record.target,
                        "target allocated concurrently"
                    );
                    return Ok(record.code);
                }
                InsertOutcome::CodeTaken => {
                    warn!(attempt, max_attempts, "candidate short code already taken");
                    if attempt < max_attempts && !self.settings.retry_backoff.is_zero() {
                        tokio::time::sleep(self.settings.retry_backoff * attempt).await;
                    }
                }
            }
        }

        warn!(target = %target, max_attempts, "gave up allocating short code");
        Err(ShortenerError::ExhaustedRetries {
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::repository::{ReadRepository, Result as StorageResult};
    use burrow_core::StorageError;
    use burrow_generator::RandomGenerator;
    use burrow_storage::InMemoryRepository;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Hands out a fixed list of codes, then repeats the last one forever.
    struct Scripted {
        codes: Mutex<VecDeque<&'static str>>,
        last: &'static str,
    }

    impl Scripted {
        fn new(codes: &[&'static str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().copied().collect()),
                last: codes.last().copied().unwrap_or("AAAAAA"),
            }
        }
    }

    impl Generator for Scripted {
        type Output = ShortCode;

        fn generate(&self) -> ShortCode {
            let next = self.codes.lock().unwrap().pop_front().unwrap_or(self.last);
            ShortCode::new_unchecked(next)
        }
    }

    struct UnavailableRepository;

    #[async_trait]
    impl ReadRepository for UnavailableRepository {
        async fn get_by_code(&self, _code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn get_by_target(&self, _target: &TargetUrl) -> StorageResult<Option<UrlRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl Repository for UnavailableRepository {
        async fn insert_if_absent(&self, _record: UrlRecord) -> StorageResult<InsertOutcome> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    fn no_backoff() -> AllocatorSettings {
        AllocatorSettings::builder()
            .retry_backoff(Duration::ZERO)
            .build()
    }

    fn test_service() -> ShortenerService<InMemoryRepository, RandomGenerator<StdRng>> {
        ShortenerService::new(
            InMemoryRepository::new(),
            RandomGenerator::with_rng(StdRng::seed_from_u64(1), 6),
        )
    }

    #[tokio::test]
    async fn shorten_returns_six_character_code() {
        let service = test_service();

        let code = service.shorten("http://long.example/path?q=1").await.unwrap();
        assert_eq!(code.as_str().len(), 6);
        assert!(ShortCode::parse(code.as_str(), 6).is_ok());
    }

    #[tokio::test]
    async fn shorten_stores_normalized_target() {
        let service = test_service();

        let code = service.shorten("  example.com/docs ").await.unwrap();
        let record = service
            .repository()
            .get_by_code(&code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.target.as_str(), "http://example.com/docs");
    }

    #[tokio::test]
    async fn repeated_target_returns_same_code() {
        let service = test_service();

        let first = service.shorten("https://example.com").await.unwrap();
        let second = service.shorten("https://example.com").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(service.repository().len(), 1);
    }

    #[tokio::test]
    async fn equivalent_inputs_dedup_after_normalization() {
        let service = test_service();

        let first = service.shorten("example.com").await.unwrap();
        let second = service.shorten("  http://example.com\n").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn distinct_targets_get_distinct_codes() {
        let service = test_service();

        let a = service.shorten("https://a.example").await.unwrap();
        let b = service.shorten("https://b.example").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn shorten_with_invalid_url_fails() {
        let service = test_service();

        let err = service.shorten("not a url").await.unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidInput(_)));

        let err = service.shorten("   ").await.unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidInput(_)));
        assert!(service.repository().is_empty());
    }

    #[tokio::test]
    async fn collision_is_retried_with_fresh_candidate() {
        let repo = InMemoryRepository::new();
        repo.insert_if_absent(UrlRecord::new(
            ShortCode::new_unchecked("taken1"),
            TargetUrl::new_unchecked("https://first.example"),
        ))
        .await
        .unwrap();

        let service = ShortenerService::with_settings(
            repo,
            Scripted::new(&["taken1", "taken1", "fresh1"]),
            no_backoff(),
        );

        let code = service.shorten("https://second.example").await.unwrap();
        assert_eq!(code.as_str(), "fresh1");
    }

    #[tokio::test]
    async fn exhausted_retries_are_reported() {
        let repo = InMemoryRepository::new();
        repo.insert_if_absent(UrlRecord::new(
            ShortCode::new_unchecked("taken1"),
            TargetUrl::new_unchecked("https://first.example"),
        ))
        .await
        .unwrap();

        let settings = AllocatorSettings::builder()
            .max_attempts(4)
            .retry_backoff(Duration::ZERO)
            .build();
        let service = ShortenerService::with_settings(repo, Scripted::new(&["taken1"]), settings);

        let err = service.shorten("https://second.example").await.unwrap_err();
        assert!(matches!(err, ShortenerError::ExhaustedRetries { attempts: 4 }));
        assert!(err.is_retryable());
        assert_eq!(service.repository().len(), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let settings = AllocatorSettings::builder().max_attempts(0).build();
        let service = ShortenerService::with_settings(
            InMemoryRepository::new(),
            Scripted::new(&["only01"]),
            settings,
        );

        let code = service.shorten("https://example.com").await.unwrap();
        assert_eq!(code.as_str(), "only01");
    }

    #[tokio::test]
    async fn store_failures_surface_as_unavailable() {
        let service = ShortenerService::new(UnavailableRepository, RandomGenerator::new(6));

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::StoreUnavailable(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn reserved_candidates_are_skipped() {
        let settings = AllocatorSettings::builder()
            .retry_backoff(Duration::ZERO)
            .reserved_codes(&["health"])
            .build();
        let service = ShortenerService::with_settings(
            InMemoryRepository::new(),
            Scripted::new(&["health", "fresh1"]),
            settings,
        );

        let code = service.shorten("https://example.com").await.unwrap();
        assert_eq!(code.as_str(), "fresh1");
        let reserved = ShortCode::new_unchecked("health");
        assert!(service.repository().get_by_code(&reserved).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn only_reserved_candidates_exhaust_retries() {
        let settings = AllocatorSettings::builder()
            .max_attempts(3)
            .retry_backoff(Duration::ZERO)
            .reserved_codes(&["health"])
            .build();
        let service = ShortenerService::with_settings(
            InMemoryRepository::new(),
            Scripted::new(&["health"]),
            settings,
        );

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(err, ShortenerError::ExhaustedRetries { attempts: 3 }));
        assert!(service.repository().is_empty());
    }

    #[tokio::test]
    async fn allocate_stores_the_target_as_given() {
        let service = test_service();
        let target = TargetUrl::normalize("example.com/docs").unwrap();

        let code = service.allocate(target.clone()).await.unwrap();
        let record = service
            .repository()
            .get_by_code(&code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.target, target);
        assert_eq!(service.shorten("example.com/docs").await.unwrap(), code);
    }
}
