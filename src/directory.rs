//! Identity-store collaborator contract and an in-memory implementation for tests and demos.
//!
//! The broker never owns identity records; it consumes the external store exclusively through
//! [`IdentityDirectory`]. Lookup, creation, and password comparison all happen behind this trait.

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{Identity, IdentityId, NewIdentity},
};

/// Boxed future returned by [`IdentityDirectory`] operations.
pub type DirectoryFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DirectoryError>> + 'a + Send>>;

/// External identity store consumed by the broker.
pub trait IdentityDirectory
where
	Self: Send + Sync,
{
	/// Looks up an identity by its unique email.
	fn find_by_email<'a>(&'a self, email: &'a str) -> DirectoryFuture<'a, Option<Identity>>;

	/// Looks up an identity by id.
	fn find_by_id<'a>(&'a self, id: &'a IdentityId) -> DirectoryFuture<'a, Option<Identity>>;

	/// Creates a new identity record; callers check email uniqueness first.
	fn create(&self, request: NewIdentity) -> DirectoryFuture<'_, Identity>;

	/// Compares a plaintext password against the identity's stored credential.
	fn compare_password<'a>(
		&'a self,
		identity: &'a Identity,
		plaintext: &'a str,
	) -> DirectoryFuture<'a, bool>;
}

/// Error type produced by [`IdentityDirectory`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DirectoryError {
	/// Backend-level failure for the identity store.
	#[error("Identity store failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[derive(Clone, Debug)]
struct DirectoryEntry {
	identity: Identity,
	password_digest: [u8; 32],
}

type DirectoryMap = Arc<RwLock<HashMap<IdentityId, DirectoryEntry>>>;

/// In-memory [`IdentityDirectory`] for tests and demos.
///
/// Passwords are stored as unsalted SHA-256 digests; production directories should bring a real
/// KDF behind the same trait.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory(DirectoryMap);
impl MemoryDirectory {
	fn digest(plaintext: &str) -> [u8; 32] {
		Sha256::digest(plaintext.as_bytes()).into()
	}

	fn fresh_id(map: &HashMap<IdentityId, DirectoryEntry>) -> IdentityId {
		loop {
			// Hex ids always pass identifier validation.
			if let Ok(id) = IdentityId::new(format!("user-{:016x}", rand::random::<u64>()))
				&& !map.contains_key(&id)
			{
				return id;
			}
		}
	}
}
impl IdentityDirectory for MemoryDirectory {
	fn find_by_email<'a>(&'a self, email: &'a str) -> DirectoryFuture<'a, Option<Identity>> {
		let map = self.0.clone();
		let email = email.to_owned();

		Box::pin(async move {
			Ok(map
				.read()
				.values()
				.find(|entry| entry.identity.email == email)
				.map(|entry| entry.identity.clone()))
		})
	}

	fn find_by_id<'a>(&'a self, id: &'a IdentityId) -> DirectoryFuture<'a, Option<Identity>> {
		let map = self.0.clone();
		let id = id.to_owned();

		Box::pin(async move { Ok(map.read().get(&id).map(|entry| entry.identity.clone())) })
	}

	fn create(&self, request: NewIdentity) -> DirectoryFuture<'_, Identity> {
		let map = self.0.clone();

		Box::pin(async move {
			let mut guard = map.write();
			let id = Self::fresh_id(&guard);
			let identity = Identity {
				id: id.clone(),
				name: request.name,
				email: request.email,
				role: request.role,
			};

			guard.insert(id, DirectoryEntry {
				identity: identity.clone(),
				password_digest: Self::digest(request.password.expose()),
			});

			Ok(identity)
		})
	}

	fn compare_password<'a>(
		&'a self,
		identity: &'a Identity,
		plaintext: &'a str,
	) -> DirectoryFuture<'a, bool> {
		let map = self.0.clone();
		let id = identity.id.clone();
		let digest = Self::digest(plaintext);

		Box::pin(async move {
			Ok(map.read().get(&id).is_some_and(|entry| entry.password_digest == digest))
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{Role, TokenSecret};

	fn signup_request(email: &str) -> NewIdentity {
		NewIdentity {
			name: "Alice".into(),
			email: email.into(),
			password: TokenSecret::new("correct horse"),
			role: Role::Standard,
		}
	}

	#[tokio::test]
	async fn create_then_lookup_by_email_and_id() {
		let directory = MemoryDirectory::default();
		let created = directory
			.create(signup_request("alice@example.com"))
			.await
			.expect("Creating an identity should succeed.");
		let by_email = directory
			.find_by_email("alice@example.com")
			.await
			.expect("Email lookup should succeed.")
			.expect("Created identity should be resolvable by email.");
		let by_id = directory
			.find_by_id(&created.id)
			.await
			.expect("Id lookup should succeed.")
			.expect("Created identity should be resolvable by id.");

		assert_eq!(by_email, created);
		assert_eq!(by_id, created);
		assert!(
			directory
				.find_by_email("nobody@example.com")
				.await
				.expect("Email lookup should succeed.")
				.is_none()
		);
	}

	#[tokio::test]
	async fn password_comparison_accepts_only_the_original() {
		let directory = MemoryDirectory::default();
		let identity = directory
			.create(signup_request("alice@example.com"))
			.await
			.expect("Creating an identity should succeed.");

		assert!(
			directory
				.compare_password(&identity, "correct horse")
				.await
				.expect("Password comparison should succeed.")
		);
		assert!(
			!directory
				.compare_password(&identity, "battery staple")
				.await
				.expect("Password comparison should succeed.")
		);
	}
}
