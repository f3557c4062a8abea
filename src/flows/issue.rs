//! Token issuance: minting the access/refresh pair and persisting the refresh half.

// self
use crate::{
	_prelude::*,
	auth::{ClaimKind, IdentityId, TokenPair},
	flows::Broker,
	store::SessionStore,
};

impl Broker {
	/// Mints an access/refresh credential pair for the identity and persists the refresh half.
	///
	/// Called exactly once per successful signup or login and once per forced
	/// re-authentication, never as part of a refresh, which re-mints only the access credential.
	/// The `put` replaces any prior record for the identity, so previously issued refresh
	/// credentials keep decoding but fail the refresh protocol's store cross-check.
	pub async fn issue(&self, identity: &IdentityId) -> Result<TokenPair> {
		let access = self.codec.encode_access(identity).map_err(Error::Signing)?;
		let refresh = self.codec.encode_refresh(identity).map_err(Error::Signing)?;

		<dyn SessionStore>::put(self.store.as_ref(), identity, &refresh, ClaimKind::Refresh.ttl())
			.await?;

		Ok(TokenPair { access, refresh })
	}
}

#[cfg(test)]
mod tests {
	// self
	use crate::{_preludet::*, store::SessionStore};

	#[tokio::test]
	async fn issue_persists_exactly_the_refresh_credential() {
		let (broker, store, _) = build_memory_broker();
		let identity =
			crate::auth::IdentityId::new("user-1").expect("Identity fixture should be valid.");
		let pair = broker.issue(&identity).await.expect("Issuing a pair should succeed.");
		let stored = store
			.get(&identity)
			.await
			.expect("Store get should succeed.")
			.expect("Issued refresh credential should be stored.");

		assert_eq!(stored, pair.refresh);
		assert_ne!(pair.access, pair.refresh);
	}

	#[tokio::test]
	async fn reissue_overwrites_the_previous_record() {
		let (broker, store, _) = build_memory_broker();
		let identity =
			crate::auth::IdentityId::new("user-1").expect("Identity fixture should be valid.");
		let first = broker.issue(&identity).await.expect("First issuance should succeed.");
		let second = broker.issue(&identity).await.expect("Second issuance should succeed.");
		let stored = store
			.get(&identity)
			.await
			.expect("Store get should succeed.")
			.expect("Latest refresh credential should be stored.");

		assert_eq!(stored, second.refresh);
		assert_ne!(stored, first.refresh);
	}
}
