//! Startup configuration: the two independent signing secrets.
//!
//! Both secrets are required at process start; absence is startup-fatal, never a per-request
//! error. Construct [`SigningSecrets`] once and hand it to [`Broker::new`](crate::flows::Broker).

// std
use std::env;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Environment variable holding the access-credential signing secret.
pub const ACCESS_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";
/// Environment variable holding the refresh-credential signing secret.
pub const REFRESH_SECRET_ENV: &str = "REFRESH_TOKEN_SECRET";

/// Validated pair of independent signing secrets, one per credential kind.
#[derive(Clone, Debug)]
pub struct SigningSecrets {
	access: TokenSecret,
	refresh: TokenSecret,
}
impl SigningSecrets {
	/// Validates and wraps the provided secrets.
	///
	/// Rejects empty values and identical secrets; two independent secrets are what keeps
	/// possession of one credential type from ever forging the other.
	pub fn new(
		access: impl Into<String>,
		refresh: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let access = access.into();
		let refresh = refresh.into();

		if access.is_empty() {
			return Err(ConfigError::EmptySecret { name: ACCESS_SECRET_ENV });
		}
		if refresh.is_empty() {
			return Err(ConfigError::EmptySecret { name: REFRESH_SECRET_ENV });
		}
		if access == refresh {
			return Err(ConfigError::IdenticalSecrets);
		}

		Ok(Self { access: TokenSecret::new(access), refresh: TokenSecret::new(refresh) })
	}

	/// Reads both secrets from the environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		let access = env::var(ACCESS_SECRET_ENV)
			.map_err(|_| ConfigError::MissingSecret { name: ACCESS_SECRET_ENV })?;
		let refresh = env::var(REFRESH_SECRET_ENV)
			.map_err(|_| ConfigError::MissingSecret { name: REFRESH_SECRET_ENV })?;

		Self::new(access, refresh)
	}

	/// Returns the access-credential signing secret.
	pub(crate) fn access(&self) -> &TokenSecret {
		&self.access
	}

	/// Returns the refresh-credential signing secret.
	pub(crate) fn refresh(&self) -> &TokenSecret {
		&self.refresh
	}
}
