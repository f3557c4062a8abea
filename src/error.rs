//! Broker-level error taxonomy shared across flows, codecs, stores, and the renewal coordinator.

// self
use crate::{_prelude::*, codec::CodecError};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical broker error exposed by public APIs.
///
/// Codec-level failures ([`CodecError`]) always collapse to [`Error::Unauthenticated`] at the
/// handler boundary; the embedding transport maps each variant to an HTTP status through
/// [`Error::status`] and to a stable machine-checkable label through [`Error::kind`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Identity-directory failure.
	#[error("{0}")]
	Directory(
		#[from]
		#[source]
		crate::directory::DirectoryError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Claim signing failed while minting credentials.
	#[error("Failed to sign session credentials.")]
	Signing(#[source] CodecError),

	/// No credential, or an invalid/stale one; the client is expected to attempt renewal.
	#[error("Not authenticated: {reason}.")]
	Unauthenticated {
		/// Human-readable summary of the rejection.
		reason: String,
	},
	/// Valid identity with insufficient role; never triggers renewal.
	#[error("Access denied: {reason}.")]
	Forbidden {
		/// Human-readable summary of the missing privilege.
		reason: String,
	},
	/// Request conflicts with existing state (e.g., duplicate signup email).
	#[error("Conflict: {reason}.")]
	Conflict {
		/// Human-readable summary of the conflict.
		reason: String,
	},
	/// Unknown email or password mismatch during login.
	#[error("Invalid email or password.")]
	InvalidCredentials,
	/// Logout was requested without a refresh cookie to act on.
	#[error("Refresh token missing.")]
	MissingRefreshCookie,
	/// Operation target is absent (e.g., updating a non-cart-resident item).
	#[error("Not found: {reason}.")]
	NotFound {
		/// Human-readable summary of the missing target.
		reason: String,
	},
}
impl Error {
	/// Builds an [`Error::Unauthenticated`] with the provided reason.
	pub fn unauthenticated(reason: impl Into<String>) -> Self {
		Self::Unauthenticated { reason: reason.into() }
	}

	/// Collapses a credential decode failure into [`Error::Unauthenticated`].
	///
	/// The codec variant is folded into the human message; the machine-checkable kind stays
	/// `unauthenticated` so clients key their renewal logic off a single label.
	pub fn rejected_credential(err: CodecError) -> Self {
		let reason = match err {
			CodecError::Malformed => "credential is malformed",
			CodecError::Expired => "credential has expired",
			CodecError::SignatureInvalid => "credential signature is invalid",
			CodecError::Signing => "credential could not be processed",
		};

		Self::Unauthenticated { reason: reason.into() }
	}

	/// Returns the stable machine-checkable kind for this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Storage(_) | Self::Directory(_) | Self::Config(_) | Self::Signing(_) =>
				ErrorKind::Internal,
			Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
			Self::Forbidden { .. } => ErrorKind::Forbidden,
			Self::Conflict { .. } => ErrorKind::Conflict,
			Self::InvalidCredentials => ErrorKind::InvalidCredentials,
			Self::MissingRefreshCookie => ErrorKind::MissingRefreshCookie,
			Self::NotFound { .. } => ErrorKind::NotFound,
		}
	}

	/// Returns the HTTP status code the embedding transport should answer with.
	pub fn status(&self) -> u16 {
		self.kind().status()
	}

	/// Returns `true` when the error should trigger exactly one client-side renewal attempt.
	pub fn is_unauthenticated(&self) -> bool {
		matches!(self, Self::Unauthenticated { .. })
	}
}

/// Stable error labels carried alongside every human-readable message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// No/invalid/stale credential; triggers client renewal.
	Unauthenticated,
	/// Valid identity, insufficient role.
	Forbidden,
	/// Duplicate-state rejection.
	Conflict,
	/// Login rejection on unknown email or password mismatch.
	InvalidCredentials,
	/// Logout without a refresh cookie.
	MissingRefreshCookie,
	/// Operation target absent.
	NotFound,
	/// Store/codec/backing-service failure.
	Internal,
}
impl ErrorKind {
	/// Returns a stable label suitable for wire payloads and log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Unauthenticated => "unauthenticated",
			Self::Forbidden => "forbidden",
			Self::Conflict => "conflict",
			Self::InvalidCredentials => "invalid_credentials",
			Self::MissingRefreshCookie => "missing_refresh_cookie",
			Self::NotFound => "not_found",
			Self::Internal => "internal",
		}
	}

	/// Returns the HTTP status code for this kind.
	pub const fn status(self) -> u16 {
		match self {
			Self::Unauthenticated => 401,
			Self::Forbidden => 403,
			Self::Conflict | Self::InvalidCredentials | Self::MissingRefreshCookie => 400,
			Self::NotFound => 404,
			Self::Internal => 500,
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures raised at process start.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// A required signing secret is absent from the environment.
	#[error("Signing secret `{name}` is missing from the environment.")]
	MissingSecret {
		/// Environment variable name.
		name: &'static str,
	},
	/// A signing secret was supplied but empty.
	#[error("Signing secret `{name}` must not be empty.")]
	EmptySecret {
		/// Environment variable name.
		name: &'static str,
	},
	/// The two signing secrets must be independent.
	#[error("Access and refresh signing secrets must differ.")]
	IdenticalSecrets,
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_into_broker_error_with_source() {
		let store_error = StoreError::Backend { message: "store unreachable".into() };
		let broker_error: Error = store_error.clone().into();

		assert!(matches!(broker_error, Error::Storage(_)));
		assert_eq!(broker_error.kind(), ErrorKind::Internal);
		assert!(broker_error.to_string().contains("store unreachable"));

		let source = StdError::source(&broker_error)
			.expect("Broker error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn codec_failures_collapse_to_unauthenticated() {
		for err in [CodecError::Malformed, CodecError::Expired, CodecError::SignatureInvalid] {
			let collapsed = Error::rejected_credential(err);

			assert!(collapsed.is_unauthenticated());
			assert_eq!(collapsed.status(), 401);
		}
	}

	#[test]
	fn kinds_map_to_surface_statuses() {
		assert_eq!(Error::unauthenticated("no access token").status(), 401);
		assert_eq!(Error::Forbidden { reason: "admins only".into() }.status(), 403);
		assert_eq!(Error::Conflict { reason: "email taken".into() }.status(), 400);
		assert_eq!(Error::InvalidCredentials.status(), 400);
		assert_eq!(Error::MissingRefreshCookie.status(), 400);
		assert_eq!(Error::NotFound { reason: "no such item".into() }.status(), 404);
		assert_eq!(ErrorKind::InvalidCredentials.as_str(), "invalid_credentials");
	}
}
