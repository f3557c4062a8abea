//! Cookie transport directives for the two session credentials.
//!
//! The broker never talks HTTP itself; flows return [`CookieDirective`]s and the embedding
//! transport turns them into `Set-Cookie` headers. Both credentials travel as httpOnly,
//! SameSite=Strict cookies whose max-age matches the credential lifetime, with the `Secure`
//! attribute controlled by [`CookiePolicy`].

// self
use crate::{
	_prelude::*,
	auth::{ClaimKind, TokenPair, TokenSecret},
};

/// Cookie name carrying the access credential.
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie name carrying the refresh credential.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Deployment-level cookie attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
	/// Sets the `Secure` attribute; disable only for plain-HTTP local development.
	pub secure: bool,
}
impl Default for CookiePolicy {
	fn default() -> Self {
		Self { secure: true }
	}
}

/// A single set-or-clear instruction for one session cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct CookieDirective {
	/// Cookie name.
	pub name: &'static str,
	/// Credential to set; `None` clears the cookie.
	pub value: Option<TokenSecret>,
	/// Max-Age attribute; zero for clearing directives.
	pub max_age: Duration,
	/// Whether the `Secure` attribute is set.
	pub secure: bool,
}
impl CookieDirective {
	pub(crate) fn set(
		name: &'static str,
		token: TokenSecret,
		max_age: Duration,
		policy: CookiePolicy,
	) -> Self {
		Self { name, value: Some(token), max_age, secure: policy.secure }
	}

	pub(crate) fn clear(name: &'static str, policy: CookiePolicy) -> Self {
		Self { name, value: None, max_age: Duration::ZERO, secure: policy.secure }
	}

	/// Renders the directive as a `Set-Cookie` header value.
	pub fn header_value(&self) -> String {
		let mut rendered = format!(
			"{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Strict",
			self.name,
			self.value.as_ref().map(TokenSecret::expose).unwrap_or_default(),
			self.max_age.whole_seconds().max(0),
		);

		if self.secure {
			rendered.push_str("; Secure");
		}

		rendered
	}
}
impl Debug for CookieDirective {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CookieDirective")
			.field("name", &self.name)
			.field("value", &self.value.as_ref().map(|_| "<redacted>"))
			.field("max_age", &self.max_age)
			.field("secure", &self.secure)
			.finish()
	}
}

/// Paired directives for both session cookies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCookies {
	/// Access cookie directive (max-age 15 minutes).
	pub access: CookieDirective,
	/// Refresh cookie directive (max-age 7 days).
	pub refresh: CookieDirective,
}
impl SessionCookies {
	/// Builds setting directives for a freshly issued credential pair.
	pub fn issue(pair: &TokenPair, policy: CookiePolicy) -> Self {
		Self {
			access: CookieDirective::set(
				ACCESS_COOKIE,
				pair.access.clone(),
				ClaimKind::Access.ttl(),
				policy,
			),
			refresh: CookieDirective::set(
				REFRESH_COOKIE,
				pair.refresh.clone(),
				ClaimKind::Refresh.ttl(),
				policy,
			),
		}
	}

	/// Builds clearing directives for both cookies, used on logout.
	pub fn clear(policy: CookiePolicy) -> Self {
		Self {
			access: CookieDirective::clear(ACCESS_COOKIE, policy),
			refresh: CookieDirective::clear(REFRESH_COOKIE, policy),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn pair() -> TokenPair {
		TokenPair { access: TokenSecret::new("aaa.bbb.ccc"), refresh: TokenSecret::new("ddd.eee.fff") }
	}

	#[test]
	fn issue_directives_match_credential_lifetimes() {
		let cookies = SessionCookies::issue(&pair(), CookiePolicy::default());

		assert_eq!(cookies.access.name, ACCESS_COOKIE);
		assert_eq!(cookies.access.max_age, Duration::minutes(15));
		assert_eq!(cookies.refresh.name, REFRESH_COOKIE);
		assert_eq!(cookies.refresh.max_age, Duration::days(7));
		assert!(cookies.access.secure);
	}

	#[test]
	fn header_values_carry_the_hardening_attributes() {
		let cookies = SessionCookies::issue(&pair(), CookiePolicy::default());
		let rendered = cookies.access.header_value();

		assert_eq!(
			rendered,
			"accessToken=aaa.bbb.ccc; Max-Age=900; Path=/; HttpOnly; SameSite=Strict; Secure"
		);

		let insecure = SessionCookies::issue(&pair(), CookiePolicy { secure: false });

		assert!(!insecure.refresh.header_value().contains("Secure"));
	}

	#[test]
	fn clear_directives_empty_both_cookies() {
		let cookies = SessionCookies::clear(CookiePolicy::default());

		assert_eq!(cookies.access.value, None);
		assert_eq!(
			cookies.refresh.header_value(),
			"refreshToken=; Max-Age=0; Path=/; HttpOnly; SameSite=Strict; Secure"
		);
	}

	#[test]
	fn directive_debug_redacts_the_credential() {
		let cookies = SessionCookies::issue(&pair(), CookiePolicy::default());

		assert!(!format!("{:?}", cookies.access).contains("aaa.bbb.ccc"));
	}
}
