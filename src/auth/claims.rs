//! Signed claim payloads and the credential lifetimes the broker mints with.

// self
use crate::{_prelude::*, auth::IdentityId, auth::TokenSecret};

/// Lifetime of an access credential.
pub const ACCESS_TTL: Duration = Duration::minutes(15);
/// Lifetime of a refresh credential and of its server-side session record.
pub const REFRESH_TTL: Duration = Duration::days(7);

/// Discriminates the two credential kinds inside their signed payloads.
///
/// Each kind is signed with its own independent secret, so possession of one credential type never
/// allows forging the other; the embedded kind additionally rejects a claim that was somehow signed
/// with the right secret but minted for the wrong slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
	/// Short-lived credential proving identity for a single request window.
	Access,
	/// Longer-lived credential used only to mint new access credentials.
	Refresh,
}
impl ClaimKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Access => "access",
			Self::Refresh => "refresh",
		}
	}

	/// Returns the default lifetime minted for this kind.
	pub const fn ttl(self) -> Duration {
		match self {
			Self::Access => ACCESS_TTL,
			Self::Refresh => REFRESH_TTL,
		}
	}
}
impl Display for ClaimKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Self-contained identity claim carried inside a signed credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaim {
	/// Identity the credential was minted for.
	pub sub: IdentityId,
	/// Issued-at instant as unix seconds.
	pub iat: i64,
	/// Expiry instant as unix seconds (`iat` plus the kind's TTL).
	pub exp: i64,
	/// Credential kind discriminator.
	pub kind: ClaimKind,
	/// Random nonce keeping credentials minted within the same second distinct, so re-issuance
	/// always supersedes the stored record byte-wise.
	pub jti: String,
}
impl SessionClaim {
	/// Builds a claim issued at `issued_at` and expiring after `ttl`, with a fresh nonce.
	pub fn new(sub: IdentityId, kind: ClaimKind, issued_at: OffsetDateTime, ttl: Duration) -> Self {
		let iat = issued_at.unix_timestamp();

		Self {
			sub,
			iat,
			exp: (issued_at + ttl).unix_timestamp(),
			kind,
			jti: format!("{:016x}", rand::random::<u64>()),
		}
	}

	/// Returns the issued-at instant.
	pub fn issued_at(&self) -> Result<OffsetDateTime, time::error::ComponentRange> {
		OffsetDateTime::from_unix_timestamp(self.iat)
	}

	/// Returns the expiry instant.
	pub fn expires_at(&self) -> Result<OffsetDateTime, time::error::ComponentRange> {
		OffsetDateTime::from_unix_timestamp(self.exp)
	}
}

/// Access/refresh credential pair minted together at signup, login, or forced re-authentication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
	/// Short-lived access credential.
	pub access: TokenSecret,
	/// Longer-lived refresh credential; its serialization is also the stored session record value.
	pub refresh: TokenSecret,
}
