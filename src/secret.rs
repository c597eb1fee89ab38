//! Reset credential generation
//!
//! When the failed-attempt threshold is reached, the guard replaces the
//! account's password with a freshly generated one. The replacement is drawn
//! from the OS RNG, never from time or counter state, so it cannot be
//! predicted by the party that triggered the reset.

use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};

use crate::error::CryptoError;

/// Entropy of a generated reset password. 9 bytes (72 bits) encodes to a
/// 12-character URL-safe string.
const RESET_PASSWORD_BYTES: usize = 9;

/// Generate a random replacement password for the credential reset path.
///
/// The returned plaintext is handed to the caller exactly once for
/// out-of-band delivery. Callers must not log it or embed it in a rendered
/// response.
pub fn generate_reset_password() -> Result<String, CryptoError> {
    let mut bytes = [0u8; RESET_PASSWORD_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Rng(e.to_string()))?;

    Ok(BASE64_URL_SAFE_NO_PAD.encode(bytes))
}
