//! One-way transformation applied to submitted values.

use base64::Engine as _;
use base64::engine::general_purpose;
use sha2::{Digest, Sha512};

/// SHA-512 digest of `input`, encoded with the padded URL-safe Base64
/// alphabet.
pub fn sha512_base64(input: &str) -> String {
    let digest = Sha512::digest(input.as_bytes());
    general_purpose::URL_SAFE.encode(digest)
}
