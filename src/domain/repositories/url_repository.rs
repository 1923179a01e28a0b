//! Repository trait for URL record data access.

use crate::domain::entities::{InsertOutcome, NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the durable URL store.
///
/// The store is the source of truth. Records are created once and never
/// updated or deleted.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteUrlRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Counts records carrying the given signature (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_signature(&self, signature: &str) -> Result<i64, AppError>;

    /// Inserts a new record and returns it with its assigned id.
    ///
    /// Does not check for an existing signature first; callers doing a
    /// separate existence check are racing other writers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the signature already exists.
    /// Returns [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Inserts a new record unless one with the same signature exists.
    ///
    /// Performed as a single statement against the unique signature
    /// constraint, so concurrent callers with the same URL observe exactly
    /// one [`InsertOutcome::Created`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert_if_absent(&self, new_record: NewUrlRecord) -> Result<InsertOutcome, AppError>;

    /// Finds a record by its id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlRecord))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by its signature.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_signature(&self, signature: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Counts all stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
