//! Server-side session flows: issuance, the auth surface, validation, and the refresh protocol.

pub mod issue;
pub mod refresh;
pub mod session;
pub mod validate;

pub use issue::*;
pub use refresh::*;
pub use session::*;
pub use validate::*;

// self
use crate::{
	_prelude::*,
	codec::ClaimCodec,
	config::SigningSecrets,
	cookie::CookiePolicy,
	directory::IdentityDirectory,
	store::SessionStore,
};

/// Coordinates the session lifecycle against one store and one identity directory.
///
/// The broker owns the claim codec, the session record store, and the directory reference so
/// individual flows can focus on their protocol steps (pair issuance, record cross-checks,
/// access-only re-minting). It is cheap to clone and safe to share across request handlers.
#[derive(Clone)]
pub struct Broker {
	/// Session record store holding the one active refresh credential per identity.
	pub store: Arc<dyn SessionStore>,
	/// External identity store consumed during signup, login, and validation.
	pub directory: Arc<dyn IdentityDirectory>,
	/// Claim codec owning both signing secrets.
	pub codec: Arc<ClaimCodec>,
	/// Cookie attributes applied to every directive the flows return.
	pub cookie_policy: CookiePolicy,
	/// Shared metrics recorder for refresh protocol outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
}
impl Broker {
	/// Creates a broker from the validated signing secrets.
	pub fn new(
		store: Arc<dyn SessionStore>,
		directory: Arc<dyn IdentityDirectory>,
		secrets: SigningSecrets,
	) -> Self {
		Self {
			codec: Arc::new(ClaimCodec::new(&secrets)),
			store,
			directory,
			cookie_policy: CookiePolicy::default(),
			refresh_metrics: Default::default(),
		}
	}

	/// Overrides the cookie policy (e.g., to drop `Secure` for plain-HTTP local development).
	pub fn with_cookie_policy(mut self, policy: CookiePolicy) -> Self {
		self.cookie_policy = policy;

		self
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker").field("cookie_policy", &self.cookie_policy).finish_non_exhaustive()
	}
}
