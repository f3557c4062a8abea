//! Access/refresh session broker: signed claim codecs, TTL-backed session record stores, and
//! single-flight client renewal in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cart;
pub mod codec;
pub mod config;
pub mod cookie;
pub mod directory;
pub mod error;
pub mod flows;
pub mod obs;
pub mod renewal;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::SigningSecrets,
		directory::{IdentityDirectory, MemoryDirectory},
		flows::Broker,
		store::{MemoryStore, SessionStore},
	};

	/// Builds a deterministic pair of signing secrets for tests.
	pub fn test_secrets() -> SigningSecrets {
		SigningSecrets::new("access-secret-for-tests", "refresh-secret-for-tests")
			.expect("Test signing secrets should be valid.")
	}

	/// Constructs a [`Broker`] backed by an in-memory store and directory, returning the concrete
	/// backends so tests can inspect them directly.
	pub fn build_memory_broker() -> (Broker, Arc<MemoryStore>, Arc<MemoryDirectory>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let directory_backend = Arc::new(MemoryDirectory::default());
		let directory: Arc<dyn IdentityDirectory> = directory_backend.clone();
		let broker = Broker::new(store, directory, test_secrets());

		(broker, store_backend, directory_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}
