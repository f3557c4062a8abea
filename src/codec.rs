//! Credential codec: signs and verifies the compact, self-contained session claims.
//!
//! A thin facade over `jsonwebtoken` (HS256) that owns both signing secrets and keeps the rest of
//! the crate free of JWT details. Decoding validates the signature and expiry with zero leeway and
//! checks the embedded [`ClaimKind`], producing exactly three rejection shapes: [`Malformed`],
//! [`Expired`], and [`SignatureInvalid`]. The codec has no side effects; server-side record
//! checks live in the [`store`](crate::store) and the [`flows`](crate::flows) on top of it.
//!
//! [`Malformed`]: CodecError::Malformed
//! [`Expired`]: CodecError::Expired
//! [`SignatureInvalid`]: CodecError::SignatureInvalid

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{
	Algorithm, DecodingKey, EncodingKey, Header, Validation,
	errors::{Error as JwtError, ErrorKind as JwtErrorKind},
};
// self
use crate::{
	_prelude::*,
	auth::{ClaimKind, IdentityId, SessionClaim, TokenSecret},
	config::SigningSecrets,
};

/// Rejection shapes produced by the credential codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum CodecError {
	/// The token is structurally invalid.
	#[error("Credential is structurally invalid.")]
	Malformed,
	/// The token's lifetime has elapsed.
	#[error("Credential has expired.")]
	Expired,
	/// The signature does not verify against the expected secret.
	#[error("Credential signature is invalid.")]
	SignatureInvalid,
	/// Signing failed while minting a credential.
	#[error("Failed to sign the claim.")]
	Signing,
}

/// Encodes and decodes signed session claims with two independent secrets, one per claim kind.
pub struct ClaimCodec {
	access_encoding: EncodingKey,
	access_decoding: DecodingKey,
	refresh_encoding: EncodingKey,
	refresh_decoding: DecodingKey,
}
impl ClaimCodec {
	/// Builds a codec from the validated signing secrets.
	pub fn new(secrets: &SigningSecrets) -> Self {
		let access = secrets.access().expose().as_bytes();
		let refresh = secrets.refresh().expose().as_bytes();

		Self {
			access_encoding: EncodingKey::from_secret(access),
			access_decoding: DecodingKey::from_secret(access),
			refresh_encoding: EncodingKey::from_secret(refresh),
			refresh_decoding: DecodingKey::from_secret(refresh),
		}
	}

	/// Mints an access credential for the identity with the default 15-minute lifetime.
	pub fn encode_access(&self, identity: &IdentityId) -> Result<TokenSecret, CodecError> {
		self.encode_with_ttl(ClaimKind::Access, identity, ClaimKind::Access.ttl())
	}

	/// Mints a refresh credential for the identity with the default 7-day lifetime.
	pub fn encode_refresh(&self, identity: &IdentityId) -> Result<TokenSecret, CodecError> {
		self.encode_with_ttl(ClaimKind::Refresh, identity, ClaimKind::Refresh.ttl())
	}

	/// Mints a credential of the given kind with an explicit lifetime.
	///
	/// A non-positive `ttl` produces an already-expired credential, which tests use to exercise
	/// the `Expired` rejection without waiting on the clock.
	pub fn encode_with_ttl(
		&self,
		kind: ClaimKind,
		identity: &IdentityId,
		ttl: Duration,
	) -> Result<TokenSecret, CodecError> {
		let claim = SessionClaim::new(identity.clone(), kind, OffsetDateTime::now_utc(), ttl);
		let token = jsonwebtoken::encode(&Header::default(), &claim, self.encoding_key(kind))
			.map_err(|_| CodecError::Signing)?;

		Ok(TokenSecret::new(token))
	}

	/// Verifies an access credential and returns its claim.
	pub fn decode_access(&self, token: &str) -> Result<SessionClaim, CodecError> {
		self.decode(ClaimKind::Access, token)
	}

	/// Verifies a refresh credential and returns its claim.
	pub fn decode_refresh(&self, token: &str) -> Result<SessionClaim, CodecError> {
		self.decode(ClaimKind::Refresh, token)
	}

	fn decode(&self, kind: ClaimKind, token: &str) -> Result<SessionClaim, CodecError> {
		let mut validation = Validation::new(Algorithm::HS256);

		validation.leeway = 0;
		validation.set_required_spec_claims(&["exp"]);

		let data =
			jsonwebtoken::decode::<SessionClaim>(token, self.decoding_key(kind), &validation)
				.map_err(map_decode_error)?;

		if data.claims.kind != kind {
			return Err(CodecError::Malformed);
		}

		Ok(data.claims)
	}

	fn encoding_key(&self, kind: ClaimKind) -> &EncodingKey {
		match kind {
			ClaimKind::Access => &self.access_encoding,
			ClaimKind::Refresh => &self.refresh_encoding,
		}
	}

	fn decoding_key(&self, kind: ClaimKind) -> &DecodingKey {
		match kind {
			ClaimKind::Access => &self.access_decoding,
			ClaimKind::Refresh => &self.refresh_decoding,
		}
	}
}
impl Debug for ClaimCodec {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClaimCodec").finish_non_exhaustive()
	}
}

/// Recovers the identity id from a credential's payload without verifying anything.
///
/// Used only by logout's best-effort record deletion, where even an expired or tampered refresh
/// credential should still name the session record to delete. Never use the result to grant
/// access.
pub fn peek_identity(token: &str) -> Option<IdentityId> {
	#[derive(Deserialize)]
	struct Peeked {
		sub: IdentityId,
	}

	let payload = token.split('.').nth(1)?;
	let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;

	serde_json::from_slice::<Peeked>(&bytes).ok().map(|peeked| peeked.sub)
}

fn map_decode_error(err: JwtError) -> CodecError {
	match err.kind() {
		JwtErrorKind::ExpiredSignature => CodecError::Expired,
		JwtErrorKind::InvalidSignature => CodecError::SignatureInvalid,
		_ => CodecError::Malformed,
	}
}
