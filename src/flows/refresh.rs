//! Refresh protocol handler: store-cross-checked re-minting of the access credential.
//!
//! A presented refresh credential must both verify against the refresh secret and byte-exact
//! match the identity's stored session record; a superseded credential that is still inside its
//! own expiry window therefore fails as a replay. On match only the access credential is
//! re-minted; the refresh credential and its record are left untouched (no rotation).

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{ClaimKind, TokenSecret},
	cookie::{ACCESS_COOKIE, CookieDirective},
	flows::Broker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::SessionStore,
};

/// Successful refresh outcome: the new access credential and its setting directive.
#[derive(Clone, Debug)]
pub struct AccessGrant {
	/// Freshly minted access credential.
	pub token: TokenSecret,
	/// Setting directive for the access cookie (max-age 15 minutes).
	pub cookie: CookieDirective,
	/// Confirmation message for the response body.
	pub message: &'static str,
}

impl Broker {
	/// Validates the presented refresh credential against the stored record and re-mints only the
	/// access credential.
	///
	/// Every rejection shape (missing cookie, malformed/expired/tampered credential, absent
	/// record, byte mismatch against the stored value) collapses to [`Error::Unauthenticated`].
	/// The call never changes the stored record: N refreshes with the same valid credential
	/// yield N valid access credentials and an unchanged store entry.
	pub async fn refresh(&self, refresh_cookie: Option<&str>) -> Result<AccessGrant> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let presented = refresh_cookie
					.ok_or_else(|| Error::unauthenticated("no refresh token was presented"))?;
				let claim =
					self.codec.decode_refresh(presented).map_err(Error::rejected_credential)?;
				let stored = <dyn SessionStore>::get(self.store.as_ref(), &claim.sub)
					.await?
					.ok_or_else(|| {
						Error::unauthenticated("no active session record for this identity")
					})?;

				if stored.expose() != presented {
					return Err(Error::unauthenticated(
						"refresh token has been superseded",
					));
				}

				let access = self.codec.encode_access(&claim.sub).map_err(Error::Signing)?;

				Ok(AccessGrant {
					cookie: CookieDirective::set(
						ACCESS_COOKIE,
						access.clone(),
						ClaimKind::Access.ttl(),
						self.cookie_policy,
					),
					token: access,
					message: "Token refreshed successfully.",
				})
			})
			.await;

		match &result {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Err(_) => {
				self.refresh_metrics.record_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}
}
