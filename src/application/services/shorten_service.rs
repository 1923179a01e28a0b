//! URL shortening service.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{InsertOutcome, NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// How the one-record-per-URL rule is enforced on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortenStrategy {
    /// Single `INSERT ... ON CONFLICT DO NOTHING` keyed on the signature.
    #[default]
    Atomic,
    /// Count by signature, then insert. Concurrent identical requests may
    /// both pass the count; the unique constraint rejects the loser.
    CheckThenInsert,
}

impl FromStr for ShortenStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "check_then_insert" | "check-then-insert" => Ok(Self::CheckThenInsert),
            other => Err(format!(
                "unknown shorten strategy '{}', expected 'atomic' or 'check_then_insert'",
                other
            )),
        }
    }
}

impl fmt::Display for ShortenStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic => f.write_str("atomic"),
            Self::CheckThenInsert => f.write_str("check_then_insert"),
        }
    }
}

/// Service for creating shortened URLs.
///
/// Deduplicates by content fingerprint: shortening a URL that is already
/// stored fails with [`AppError::Conflict`] rather than returning the
/// existing record.
pub struct ShortenService<R: UrlRepository> {
    repository: Arc<R>,
    strategy: ShortenStrategy,
}

impl<R: UrlRepository> ShortenService<R> {
    /// Creates a new shorten service.
    pub fn new(repository: Arc<R>, strategy: ShortenStrategy) -> Self {
        Self {
            repository,
            strategy,
        }
    }

    /// Returns the configured uniqueness strategy.
    pub fn strategy(&self) -> ShortenStrategy {
        self.strategy
    }

    /// Stores a new URL and returns the created record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or contains ASCII
    /// control characters (it could never be sent back in a `Location` header).
    /// Returns [`AppError::Conflict`] if the URL has already been shortened.
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn shorten(&self, url: String) -> Result<UrlRecord, AppError> {
        if url.trim().is_empty() {
            return Err(AppError::bad_request(
                "url must not be empty",
                json!({ "field": "url" }),
            ));
        }

        if url.chars().any(|c| c.is_ascii_control()) {
            return Err(AppError::bad_request(
                "url must not contain control characters",
                json!({ "field": "url" }),
            ));
        }

        let new_record = NewUrlRecord::new(url);
        debug!(sig = %new_record.signature, strategy = %self.strategy, "Shortening URL");

        let record = match self.strategy {
            ShortenStrategy::Atomic => {
                match self.repository.insert_if_absent(new_record).await? {
                    InsertOutcome::Created(record) => record,
                    InsertOutcome::Existing(existing) => {
                        return Err(already_shortened(&existing.signature, Some(existing.id)));
                    }
                }
            }
            ShortenStrategy::CheckThenInsert => {
                let count = self
                    .repository
                    .count_by_signature(&new_record.signature)
                    .await?;

                if count > 0 {
                    return Err(already_shortened(&new_record.signature, None));
                }

                self.repository.insert(new_record).await?
            }
        };

        info!(id = record.id, sig = %record.signature, "Created short URL");
        Ok(record)
    }
}

fn already_shortened(signature: &str, id: Option<i64>) -> AppError {
    AppError::conflict("url exists already", json!({ "sig": signature, "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::utils::fingerprint::fingerprint;

    fn stored(id: i64, url: &str) -> UrlRecord {
        UrlRecord::new(id, url.to_string(), fingerprint(url))
    }

    #[tokio::test]
    async fn test_atomic_shorten_success() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_insert_if_absent()
            .withf(|new_record| {
                new_record.url == "http://example.com"
                    && new_record.signature == fingerprint("http://example.com")
            })
            .times(1)
            .returning(|new_record| {
                Ok(InsertOutcome::Created(UrlRecord::new(
                    1,
                    new_record.url,
                    new_record.signature,
                )))
            });
        mock_repo.expect_count_by_signature().times(0);
        mock_repo.expect_insert().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), ShortenStrategy::Atomic);

        let record = service
            .shorten("http://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.url, "http://example.com");
    }

    #[tokio::test]
    async fn test_atomic_shorten_existing_is_conflict() {
        let mut mock_repo = MockUrlRepository::new();

        let existing = stored(3, "http://example.com");
        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .returning(move |_| Ok(InsertOutcome::Existing(existing.clone())));

        let service = ShortenService::new(Arc::new(mock_repo), ShortenStrategy::Atomic);

        let result = service.shorten("http://example.com".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_check_then_insert_success() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_count_by_signature()
            .withf(|sig| sig == fingerprint("https://rust-lang.org"))
            .times(1)
            .returning(|_| Ok(0));
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|new_record| Ok(UrlRecord::new(9, new_record.url, new_record.signature)));
        mock_repo.expect_insert_if_absent().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), ShortenStrategy::CheckThenInsert);

        let record = service
            .shorten("https://rust-lang.org".to_string())
            .await
            .unwrap();

        assert_eq!(record.id, 9);
    }

    #[tokio::test]
    async fn test_check_then_insert_existing_is_conflict() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_count_by_signature()
            .times(1)
            .returning(|_| Ok(1));
        mock_repo.expect_insert().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), ShortenStrategy::CheckThenInsert);

        let result = service.shorten("https://rust-lang.org".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_check_then_insert_count_error_is_internal() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_count_by_signature()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        mock_repo.expect_insert().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), ShortenStrategy::CheckThenInsert);

        let result = service.shorten("https://rust-lang.org".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_check_then_insert_lost_race_is_conflict() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_count_by_signature()
            .times(1)
            .returning(|_| Ok(0));
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::conflict("url exists already", json!({}))));

        let service = ShortenService::new(Arc::new(mock_repo), ShortenStrategy::CheckThenInsert);

        let result = service.shorten("https://rust-lang.org".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected_before_store() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_insert_if_absent().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), ShortenStrategy::Atomic);

        let result = service.shorten("   ".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_control_characters_are_rejected_before_store() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_insert_if_absent().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), ShortenStrategy::Atomic);
        assert_eq!(service.strategy(), ShortenStrategy::Atomic);

        for url in [
            "http://example.com/a\nb",
            "http://example.com/a\tb",
            "http://example.com/\u{7f}",
        ] {
            let result = service.shorten(url.to_string()).await;
            assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
        }
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "atomic".parse::<ShortenStrategy>(),
            Ok(ShortenStrategy::Atomic)
        );
        assert_eq!(
            "check_then_insert".parse::<ShortenStrategy>(),
            Ok(ShortenStrategy::CheckThenInsert)
        );
        assert_eq!(
            "CHECK-THEN-INSERT".parse::<ShortenStrategy>(),
            Ok(ShortenStrategy::CheckThenInsert)
        );
        assert!("upsert".parse::<ShortenStrategy>().is_err());
        assert_eq!(ShortenStrategy::CheckThenInsert.to_string(), "check_then_insert");
    }
}
