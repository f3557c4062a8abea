//! Auth-domain identifiers, identities, claims, and secret wrappers.

pub mod claims;
pub mod id;
pub mod identity;
pub mod secret;

pub use claims::*;
pub use id::*;
pub use identity::*;
pub use secret::*;
