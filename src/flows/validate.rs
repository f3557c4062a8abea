//! Request-time session validation and the binary role gate.

// self
use crate::{
	_prelude::*,
	auth::{Identity, Role},
	flows::Broker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Broker {
	/// Verifies the presented access credential and resolves it to a live identity.
	///
	/// An absent cookie, any decode failure, and an unresolvable identity all collapse to
	/// [`Error::Unauthenticated`]; the caller is expected to attempt renewal. On success the
	/// resolved [`Identity`] is handed back for the request context, where downstream
	/// authorization checks (the role gate) run against it.
	pub async fn validate(&self, access_cookie: Option<&str>) -> Result<Identity> {
		const KIND: FlowKind = FlowKind::Validate;

		let span = FlowSpan::new(KIND, "validate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = access_cookie
					.ok_or_else(|| Error::unauthenticated("no access token was presented"))?;
				let claim =
					self.codec.decode_access(token).map_err(Error::rejected_credential)?;

				self.directory
					.find_by_id(&claim.sub)
					.await?
					.ok_or_else(|| Error::unauthenticated("identity no longer exists"))
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Convenience handler for `GET /auth/profile`: validation is the whole operation.
	pub async fn profile(&self, access_cookie: Option<&str>) -> Result<Identity> {
		self.validate(access_cookie).await
	}
}

/// Rejects with [`Error::Forbidden`] when the resolved identity lacks the required role.
///
/// A `Forbidden` rejection never triggers client renewal; the credential was valid, the
/// privilege is what is missing.
pub fn require_role(identity: &Identity, required: Role) -> Result<()> {
	if identity.role == required {
		Ok(())
	} else {
		Err(Error::Forbidden { reason: format!("{required} role is required") })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::IdentityId;

	fn identity(role: Role) -> Identity {
		Identity {
			id: IdentityId::new("user-1").expect("Identity fixture should be valid."),
			name: "Alice".into(),
			email: "alice@example.com".into(),
			role,
		}
	}

	#[test]
	fn role_gate_is_binary() {
		assert!(require_role(&identity(Role::Admin), Role::Admin).is_ok());

		let rejection = require_role(&identity(Role::Standard), Role::Admin)
			.expect_err("Standard identities must not pass the admin gate.");

		assert_eq!(rejection.status(), 403);
		assert!(!rejection.is_unauthenticated(), "Forbidden must never trigger renewal.");
	}
}
