//! Client-side single-flight renewal coordinator.
//!
//! Any outbound call that comes back [`Error::Unauthenticated`] and has not already been retried
//! joins the coordinator: the first such failure starts the one in-flight renewal, every
//! concurrent failure awaits that same flight, and all of them observe the same outcome. On
//! success each waiter replays its original request exactly once, marked so the replay can never
//! re-trigger renewal; on failure every waiter is rejected and the session is driven to a
//! signed-out state. At most one renewal call is ever outstanding system-wide.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Boxed future returned by [`SessionRenewer`] operations.
pub type RenewalFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a + Send>>;

/// Client-side session hooks driven by the coordinator.
pub trait SessionRenewer
where
	Self: Send + Sync,
{
	/// Performs one renewal call (e.g., `POST /auth/refresh-token`) and installs the new access
	/// credential on success. Runs to completion; the coordinator never cancels it.
	fn renew(&self) -> RenewalFuture<'_>;

	/// Drives the session to a signed-out state, clearing local identity state. Must be
	/// idempotent: several replayed requests may each detect a stale credential.
	fn sign_out(&self) -> RenewalFuture<'_>;
}

/// Shared outcome observed by every participant of one renewal flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenewalOutcome {
	/// The renewal call succeeded; waiters replay their original requests.
	Renewed,
	/// The renewal call failed; waiters are rejected and the session is signed out.
	Failed,
}

/// Marks whether an operation is the original attempt or its single post-renewal replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attempt {
	/// First execution; an `Unauthenticated` failure triggers renewal.
	Initial,
	/// Post-renewal replay; an `Unauthenticated` failure triggers sign-out, never renewal.
	Replay,
}
impl Attempt {
	/// Returns `true` for the post-renewal replay.
	pub const fn is_replay(self) -> bool {
		matches!(self, Self::Replay)
	}
}

// One flight: a gate serializing the renewal call plus the outcome every participant reads.
// Whoever acquires the gate while the outcome is still unset performs the renewal, so the flight
// self-heals if the caller that created it is cancelled before renewing.
#[derive(Clone, Default)]
struct Flight {
	gate: Arc<AsyncMutex<()>>,
	outcome: Arc<Mutex<Option<RenewalOutcome>>>,
}

/// Process-scoped single-flight coordinator; create once at client startup and share.
pub struct RenewalCoordinator<R>
where
	R: ?Sized + SessionRenewer,
{
	renewer: Arc<R>,
	flight: Mutex<Option<Flight>>,
	renewals: AtomicU64,
}
impl<R> RenewalCoordinator<R>
where
	R: ?Sized + SessionRenewer,
{
	/// Creates a coordinator in the `Idle` state around the provided renewer.
	pub fn new(renewer: Arc<R>) -> Self {
		Self { renewer, flight: Mutex::new(None), renewals: AtomicU64::new(0) }
	}

	/// Returns how many renewal calls have completed (success or failure).
	pub fn renewals(&self) -> u64 {
		self.renewals.load(Ordering::Relaxed)
	}

	/// Returns `true` while a renewal flight is outstanding.
	pub fn is_renewing(&self) -> bool {
		self.flight.lock().is_some()
	}

	/// Runs an outbound operation with at-most-one silent renewal.
	///
	/// The operation is invoked with [`Attempt::Initial`]; on an `Unauthenticated` failure the
	/// caller joins the single renewal flight and, if it succeeds, replays once with
	/// [`Attempt::Replay`]. A replay that fails `Unauthenticated` again is treated as a logout
	/// trigger and surfaced, never retried a second time. Every other error surfaces immediately.
	pub async fn execute<T, F, Fut>(&self, op: F) -> Result<T>
	where
		F: Fn(Attempt) -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		match op(Attempt::Initial).await {
			Err(err) if err.is_unauthenticated() => (),
			other => return other,
		}

		match self.join_renewal().await {
			RenewalOutcome::Renewed => match op(Attempt::Replay).await {
				Err(err) if err.is_unauthenticated() => {
					// Stale credential straight after a successful renewal: logout trigger.
					self.renewer.sign_out().await?;

					Err(err)
				},
				other => other,
			},
			RenewalOutcome::Failed =>
				Err(Error::unauthenticated("session renewal failed; signed out")),
		}
	}

	/// Joins the in-flight renewal, starting one if the coordinator is `Idle`.
	///
	/// All concurrent callers share the same flight and observe the same outcome. On failure the
	/// session is signed out exactly once, by the caller that performed the renewal. The
	/// coordinator is reset to `Idle` before the flight's outcome is published, so it can never
	/// be left stuck in a renewing state.
	pub async fn join_renewal(&self) -> RenewalOutcome {
		let flight = self.flight.lock().get_or_insert_with(Flight::default).clone();
		let _gate = flight.gate.lock().await;

		if let Some(outcome) = *flight.outcome.lock() {
			// The renewal this caller joined has already completed.
			return outcome;
		}

		const KIND: FlowKind = FlowKind::Renewal;

		let span = FlowSpan::new(KIND, "join_renewal");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let outcome = span
			.instrument(async {
				match self.renewer.renew().await {
					Ok(()) => RenewalOutcome::Renewed,
					Err(_) => {
						// Waiters are rejected by the outcome; sign-out happens once, here.
						let _ = self.renewer.sign_out().await;

						RenewalOutcome::Failed
					},
				}
			})
			.await;

		*self.flight.lock() = None;
		*flight.outcome.lock() = Some(outcome);

		self.renewals.fetch_add(1, Ordering::Relaxed);

		match outcome {
			RenewalOutcome::Renewed => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			RenewalOutcome::Failed => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		outcome
	}
}
impl<R> Debug for RenewalCoordinator<R>
where
	R: ?Sized + SessionRenewer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RenewalCoordinator")
			.field("renewing", &self.is_renewing())
			.field("renewals", &self.renewals())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicU64, Ordering};
	// self
	use super::*;

	#[derive(Default)]
	struct CountingRenewer {
		renew_calls: AtomicU64,
		sign_outs: AtomicU64,
		fail: bool,
	}
	impl SessionRenewer for CountingRenewer {
		fn renew(&self) -> RenewalFuture<'_> {
			Box::pin(async move {
				self.renew_calls.fetch_add(1, Ordering::SeqCst);

				if self.fail {
					Err(Error::unauthenticated("refresh token rejected"))
				} else {
					Ok(())
				}
			})
		}

		fn sign_out(&self) -> RenewalFuture<'_> {
			Box::pin(async move {
				self.sign_outs.fetch_add(1, Ordering::SeqCst);

				Ok(())
			})
		}
	}

	#[tokio::test]
	async fn successful_renewal_replays_exactly_once() {
		let renewer = Arc::new(CountingRenewer::default());
		let coordinator = RenewalCoordinator::new(renewer.clone());
		let calls = AtomicU64::new(0);
		let value = coordinator
			.execute(|attempt| {
				let calls = &calls;

				async move {
					calls.fetch_add(1, Ordering::SeqCst);

					if attempt.is_replay() {
						Ok(42)
					} else {
						Err(Error::unauthenticated("access token expired"))
					}
				}
			})
			.await
			.expect("Replay after renewal should succeed.");

		assert_eq!(value, 42);
		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert_eq!(renewer.renew_calls.load(Ordering::SeqCst), 1);
		assert!(!coordinator.is_renewing(), "Coordinator must return to Idle.");
	}

	#[tokio::test]
	async fn failed_renewal_rejects_and_signs_out_once() {
		let renewer = Arc::new(CountingRenewer { fail: true, ..Default::default() });
		let coordinator = RenewalCoordinator::new(renewer.clone());
		let err = coordinator
			.execute(|_| async { Err::<(), _>(Error::unauthenticated("access token expired")) })
			.await
			.expect_err("Renewal failure must reject the caller.");

		assert!(err.is_unauthenticated());
		assert_eq!(renewer.sign_outs.load(Ordering::SeqCst), 1);
		assert!(!coordinator.is_renewing());
	}

	#[tokio::test]
	async fn replay_failure_is_a_logout_trigger_not_a_retry() {
		let renewer = Arc::new(CountingRenewer::default());
		let coordinator = RenewalCoordinator::new(renewer.clone());
		let calls = AtomicU64::new(0);
		let err = coordinator
			.execute(|_| {
				let calls = &calls;

				async move {
					calls.fetch_add(1, Ordering::SeqCst);

					Err::<(), _>(Error::unauthenticated("still stale"))
				}
			})
			.await
			.expect_err("A replay that fails again must surface the error.");

		assert!(err.is_unauthenticated());
		assert_eq!(calls.load(Ordering::SeqCst), 2, "Initial attempt plus exactly one replay.");
		assert_eq!(renewer.renew_calls.load(Ordering::SeqCst), 1);
		assert_eq!(renewer.sign_outs.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn non_auth_errors_bypass_the_coordinator() {
		let renewer = Arc::new(CountingRenewer::default());
		let coordinator = RenewalCoordinator::new(renewer.clone());
		let err = coordinator
			.execute(|_| async {
				Err::<(), _>(Error::Forbidden { reason: "admins only".into() })
			})
			.await
			.expect_err("Forbidden must surface immediately.");

		assert_eq!(err.status(), 403);
		assert_eq!(renewer.renew_calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn completed_flights_reset_to_idle_and_allow_new_ones() {
		let renewer = Arc::new(CountingRenewer::default());
		let coordinator = RenewalCoordinator::new(renewer.clone());

		assert_eq!(coordinator.join_renewal().await, RenewalOutcome::Renewed);
		assert_eq!(coordinator.join_renewal().await, RenewalOutcome::Renewed);
		assert_eq!(renewer.renew_calls.load(Ordering::SeqCst), 2);
		assert_eq!(coordinator.renewals(), 2);
	}
}
