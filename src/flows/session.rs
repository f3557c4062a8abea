//! The auth surface: signup, login, logout, and their typed request/response shapes.
//!
//! Each handler is transport-agnostic; the embedding HTTP layer maps it 1:1 to a route
//! (`POST /auth/signup`, `POST /auth/login`, `POST /auth/logout`) and renders the returned
//! cookie directives. Status codes come from [`Error::status`].

// self
use crate::{
	_prelude::*,
	auth::{Identity, NewIdentity, Role, TokenSecret},
	codec,
	cookie::SessionCookies,
	flows::Broker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::SessionStore,
};

/// Wire-shaped signup payload.
#[derive(Clone, Deserialize)]
pub struct SignupRequest {
	/// Display name.
	pub name: String,
	/// Unique email address.
	pub email: String,
	/// Plaintext password.
	pub password: String,
}
impl Debug for SignupRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignupRequest")
			.field("name", &self.name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Wire-shaped login payload.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
	/// Email address to authenticate.
	pub email: String,
	/// Plaintext password.
	pub password: String,
}
impl Debug for LoginRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest").field("email", &self.email).field("password", &"<redacted>").finish()
	}
}

/// Successful signup/login outcome: the resolved profile plus both session cookies.
#[derive(Clone, Debug)]
pub struct SessionStart {
	/// Profile answered to the client (`{id, name, email, role}`).
	pub profile: Identity,
	/// Setting directives for both session cookies.
	pub cookies: SessionCookies,
}

/// Successful logout outcome.
#[derive(Clone, Debug)]
pub struct LogoutReceipt {
	/// Confirmation message for the response body.
	pub message: &'static str,
	/// Clearing directives for both session cookies.
	pub cookies: SessionCookies,
}

impl Broker {
	/// Registers a new identity and starts its session.
	///
	/// Fails with [`Error::Conflict`] when the email is already registered. On success a fresh
	/// credential pair is issued (exactly once) and both cookies are returned.
	pub async fn signup(&self, request: SignupRequest) -> Result<SessionStart> {
		const KIND: FlowKind = FlowKind::Signup;

		let span = FlowSpan::new(KIND, "signup");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				if self.directory.find_by_email(&request.email).await?.is_some() {
					return Err(Error::Conflict { reason: "email is already registered".into() });
				}

				let identity = self
					.directory
					.create(NewIdentity {
						name: request.name,
						email: request.email,
						password: TokenSecret::new(request.password),
						role: Role::Standard,
					})
					.await?;
				let pair = self.issue(&identity.id).await?;

				Ok(SessionStart {
					cookies: SessionCookies::issue(&pair, self.cookie_policy),
					profile: identity,
				})
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Authenticates an existing identity and starts a new session.
	///
	/// Unknown email and password mismatch are indistinguishable to the caller
	/// ([`Error::InvalidCredentials`]). Issuing the new pair overwrites any prior session record
	/// for the identity.
	pub async fn login(&self, request: LoginRequest) -> Result<SessionStart> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let identity = self
					.directory
					.find_by_email(&request.email)
					.await?
					.ok_or(Error::InvalidCredentials)?;

				if !self.directory.compare_password(&identity, &request.password).await? {
					return Err(Error::InvalidCredentials);
				}

				let pair = self.issue(&identity.id).await?;

				Ok(SessionStart {
					cookies: SessionCookies::issue(&pair, self.cookie_policy),
					profile: identity,
				})
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Ends the session named by the presented refresh cookie.
	///
	/// The identity id is recovered from the credential payload without verification, so even an
	/// expired or tampered refresh credential still names the record to delete; when no id can be
	/// recovered there is nothing to delete and logout still succeeds. The caller must discard
	/// both client-held credentials via the returned clearing directives.
	pub async fn logout(&self, refresh_cookie: Option<&str>) -> Result<LogoutReceipt> {
		const KIND: FlowKind = FlowKind::Logout;

		let span = FlowSpan::new(KIND, "logout");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = refresh_cookie.ok_or(Error::MissingRefreshCookie)?;

				if let Some(identity) = codec::peek_identity(token) {
					<dyn SessionStore>::delete(self.store.as_ref(), &identity).await?;
				}

				Ok(LogoutReceipt {
					message: "Logged out successfully.",
					cookies: SessionCookies::clear(self.cookie_policy),
				})
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
