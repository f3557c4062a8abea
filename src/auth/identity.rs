//! Identity records and the binary role tag attached to them.

// self
use crate::{_prelude::*, auth::IdentityId, auth::TokenSecret};

/// Role tag carried by every identity; the only authorization input the broker evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Default role for signed-up identities.
	Standard,
	/// Elevated role required by admin-gated surfaces.
	Admin,
}
impl Role {
	/// Returns the stable wire label for this role.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Standard => "standard",
			Self::Admin => "admin",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Resolved identity record, immutable for the lifetime of a session.
///
/// Owned by the external identity store; the broker only reads it. Serializes to the
/// `{id, name, email, role}` profile shape the surface answers with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Opaque unique identifier; also the session record key.
	pub id: IdentityId,
	/// Display name.
	pub name: String,
	/// Unique email address used for login.
	pub email: String,
	/// Role tag evaluated by the role gate.
	pub role: Role,
}

/// Fields required to create a new identity in the directory.
#[derive(Clone)]
pub struct NewIdentity {
	/// Display name.
	pub name: String,
	/// Unique email address.
	pub email: String,
	/// Plaintext password; the directory derives and stores its own digest.
	pub password: TokenSecret,
	/// Role assigned at creation.
	pub role: Role,
}
impl Debug for NewIdentity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NewIdentity")
			.field("name", &self.name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("role", &self.role)
			.finish()
	}
}
