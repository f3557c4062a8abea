//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{IdentityId, TokenSecret},
	store::{SessionRecord, SessionStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<IdentityId, SessionRecord>>>;

/// Thread-safe storage backend that keeps session records in-process.
///
/// TTL expiry is lazy: `get` treats elapsed records as absent, and every `put` purges whatever has
/// expired, so callers observe autonomous expiry without a sweep task.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	fn put_now(map: StoreMap, identity: IdentityId, record: SessionRecord) -> Result<(), StoreError> {
		let now = OffsetDateTime::now_utc();
		let mut guard = map.write();

		guard.retain(|_, existing| !existing.is_expired_at(now));
		guard.insert(identity, record);

		Ok(())
	}

	fn get_now(map: StoreMap, identity: IdentityId) -> Option<TokenSecret> {
		let now = OffsetDateTime::now_utc();

		map.read()
			.get(&identity)
			.filter(|record| !record.is_expired_at(now))
			.map(|record| record.token.clone())
	}

	fn delete_now(map: StoreMap, identity: IdentityId) -> Result<(), StoreError> {
		map.write().remove(&identity);

		Ok(())
	}
}
impl SessionStore for MemoryStore {
	fn put<'a>(
		&'a self,
		identity: &'a IdentityId,
		token: &'a TokenSecret,
		ttl: Duration,
	) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let identity = identity.to_owned();
		let record = SessionRecord::new(token.clone(), ttl);

		Box::pin(async move { Self::put_now(map, identity, record) })
	}

	fn get<'a>(&'a self, identity: &'a IdentityId) -> StoreFuture<'a, Option<TokenSecret>> {
		let map = self.0.clone();
		let identity = identity.to_owned();

		Box::pin(async move { Ok(Self::get_now(map, identity)) })
	}

	fn delete<'a>(&'a self, identity: &'a IdentityId) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let identity = identity.to_owned();

		Box::pin(async move { Self::delete_now(map, identity) })
	}
}
