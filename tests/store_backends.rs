// std
use std::{
	env, fs,
	path::{Path, PathBuf},
	process,
	sync::Arc,
};
// self
use session_broker::{
	config::SigningSecrets,
	directory::{IdentityDirectory, MemoryDirectory},
	flows::{Broker, SignupRequest},
	store::{FileStore, SessionStore},
};
// crates.io
use time::OffsetDateTime;

fn temp_path(label: &str) -> PathBuf {
	let unique = format!(
		"session_broker_{label}_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	);

	env::temp_dir().join(unique)
}

fn secrets() -> SigningSecrets {
	SigningSecrets::new("access-secret-for-it", "refresh-secret-for-it")
		.expect("Signing secret fixtures should be valid.")
}

fn build_file_broker(path: &Path, directory: Arc<dyn IdentityDirectory>) -> Broker {
	let store: Arc<dyn SessionStore> =
		Arc::new(FileStore::open(path).expect("Failed to open file store snapshot."));

	Broker::new(store, directory, secrets())
}

#[tokio::test]
async fn broker_flows_run_unchanged_over_the_file_backend() {
	let path = temp_path("flows");
	let directory: Arc<dyn IdentityDirectory> = Arc::new(MemoryDirectory::default());
	let broker = build_file_broker(&path, directory.clone());
	let started = broker
		.signup(SignupRequest {
			name: "Alice".into(),
			email: "alice@example.com".into(),
			password: "correct horse".into(),
		})
		.await
		.expect("Signup over the file backend should succeed.");
	let refresh_token = started
		.cookies
		.refresh
		.value
		.as_ref()
		.expect("Refresh cookie should carry a credential.")
		.expose()
		.to_owned();

	broker
		.refresh(Some(&refresh_token))
		.await
		.expect("Refresh over the file backend should succeed.");

	// Restart: a new broker over the same snapshot still honors the session.
	let reopened = build_file_broker(&path, directory);
	let grant = reopened
		.refresh(Some(&refresh_token))
		.await
		.expect("The session record must survive a process restart.");
	let claim = reopened
		.codec
		.decode_access(grant.token.expose())
		.expect("The minted access credential should verify.");

	assert_eq!(claim.sub, started.profile.id);

	reopened
		.logout(Some(&refresh_token))
		.await
		.expect("Logout over the file backend should succeed.");

	assert!(
		reopened
			.refresh(Some(&refresh_token))
			.await
			.expect_err("Logout must invalidate the session across the snapshot.")
			.is_unauthenticated()
	);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
	});
}
