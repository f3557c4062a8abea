//! Session record store contract and built-in backends.
//!
//! The store is the single source of truth for "is this refresh credential still the active one":
//! codec validity alone is necessary but never sufficient. TTL auto-expiry is a first-class part
//! of the contract rather than an incidental backing-store feature, so an in-memory map, an
//! on-disk snapshot, or an external TTL-native store remain substitutable.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{IdentityId, TokenSecret},
};

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Keyed, TTL-backed storage holding the single currently-valid refresh credential per identity.
///
/// # Contract
///
/// - `put` upserts: it replaces any prior value for the identity and resets the TTL. At most one
///   live record per identity can ever exist.
/// - `get` must never return an entry whose TTL has elapsed, with no external sweep call
///   required. Backends may expire lazily, but expiry is autonomous as observed by callers.
/// - `put`/`get`/`delete` racing on the same identity must observe one consistent ordering;
///   operations on different identities are logically independent.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the refresh credential for the identity, resetting its TTL.
	fn put<'a>(
		&'a self,
		identity: &'a IdentityId,
		token: &'a TokenSecret,
		ttl: Duration,
	) -> StoreFuture<'a, ()>;

	/// Fetches the live refresh credential for the identity, if one exists and has not expired.
	fn get<'a>(&'a self, identity: &'a IdentityId) -> StoreFuture<'a, Option<TokenSecret>>;

	/// Removes the identity's record, if any.
	fn delete<'a>(&'a self, identity: &'a IdentityId) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Stored refresh credential together with its absolute expiry instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
	/// Serialized refresh credential; compared byte-exact during the refresh protocol.
	pub token: TokenSecret,
	/// Instant after which the record must be treated as absent.
	pub expires_at: OffsetDateTime,
}
impl SessionRecord {
	/// Builds a record expiring `ttl` from now.
	pub fn new(token: TokenSecret, ttl: Duration) -> Self {
		Self { token, expires_at: OffsetDateTime::now_utc() + ttl }
	}

	/// Returns `true` once the record's TTL has elapsed at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_broker_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let broker_error: Error = store_error.clone().into();

		assert!(matches!(broker_error, Error::Storage(_)));
		assert!(broker_error.to_string().contains("database unreachable"));

		let source = StdError::source(&broker_error)
			.expect("Broker error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn record_expiry_is_inclusive_at_the_boundary() {
		let record = SessionRecord::new(TokenSecret::new("refresh"), Duration::minutes(1));

		assert!(!record.is_expired_at(record.expires_at - Duration::seconds(1)));
		assert!(record.is_expired_at(record.expires_at));
		assert!(record.is_expired_at(record.expires_at + Duration::seconds(1)));
	}
}
