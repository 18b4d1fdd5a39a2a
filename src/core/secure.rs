use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;

/// Secret string that zeros memory on drop.
///
/// Every secret-access-key value in the engine flows through this type. It
/// never appears in `Debug` output, and it serializes as base64 inside the
/// persisted configuration record so the stored form stays opaque.
#[derive(Clone)]
pub struct SecretValue(SecretString);

impl SecretValue {
    /// Create new secret value
    pub fn new(s: impl Into<String>) -> Self {
        Self(SecretString::from(s.into()))
    }

    /// Expose the secret (use with caution)
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether the secret is the empty string
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Constant-time equality check
    pub fn eq_ct(&self, other: &Self) -> bool {
        let a = self.0.expose_secret().as_bytes();
        let b = other.0.expose_secret().as_bytes();
        a.ct_eq(b).into()
    }
}

impl Default for SecretValue {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<&str> for SecretValue {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = B64.encode(self.0.expose_secret().as_bytes());
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let decoded = B64
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)?;
        let s = String::from_utf8(decoded).map_err(serde::de::Error::custom)?;
        Ok(SecretValue::new(s))
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretValue[REDACTED]")
    }
}
