//! Utilities: secret-key generation

mod secret;

pub use secret::generate_secret_access_key;
