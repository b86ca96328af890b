//! Service-account credential loading for the bulletin-board portal
//!
//! Credentials come from a secrets store when one is available, and from a
//! local key file otherwise.

mod error;
mod service_account;
mod store;

pub use error::*;
pub use service_account::*;
pub use store::*;

/// Section of the secrets store holding the backend credentials
pub const FIREBASE_SECTION: &str = "firebase";

/// Key inside [`FIREBASE_SECTION`] holding the service-account key
pub const KEY_JSON: &str = "key_json";
