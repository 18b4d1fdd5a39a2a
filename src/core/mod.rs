//! Core types shared by every component: the error taxonomy and the
//! zeroizing secret wrapper.

pub mod error;
pub mod secure;

pub use error::{ConfigurationError, Error, Result, StateError, StorageError, UpstreamError};
pub use secure::SecretValue;
