use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use zeroize::Zeroize;

use crate::core::SecretValue;

// 30 random bytes encode to exactly 40 base64 characters, the longest secret
// key MinIO accepts.
const SECRET_KEY_BYTES: usize = 30;

/// Generate a new service-account secret key.
///
/// 30 bytes from a cryptographically secure RNG, URL-safe base64 without
/// padding: 40 characters, within MinIO's 8..=40 length constraint and free
/// of characters that need escaping.
pub fn generate_secret_access_key() -> SecretValue {
    let mut bytes = [0u8; SECRET_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let encoded = URL_SAFE_NO_PAD.encode(bytes);
    bytes.zeroize();
    SecretValue::new(encoded)
}
