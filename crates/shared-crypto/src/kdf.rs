//! # Key Derivation
//!
//! HKDF-SHA256 (RFC 5869) and the 128-bit sub-key type it produces.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::CryptoError;

/// Length of a derived sub-key in bytes.
pub const SUBKEY_LENGTH: usize = 16;

/// 128-bit derived key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SubKey([u8; SUBKEY_LENGTH]);

impl SubKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SUBKEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking its length.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless `bytes` is 16 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SUBKEY_LENGTH] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: SUBKEY_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; SUBKEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for SubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SubKey(..)")
    }
}

/// Fill `okm` with HKDF-SHA256 output.
///
/// # Errors
///
/// Returns `CryptoError::InvalidOutputLength` if `okm` exceeds 255 * 32 bytes.
pub fn hkdf_sha256(
    ikm: &[u8],
    salt: Option<&[u8]>,
    info: &[u8],
    okm: &mut [u8],
) -> Result<(), CryptoError> {
    let hk = Hkdf::<Sha256>::new(salt, ikm);
    hk.expand(info, okm)
        .map_err(|_| CryptoError::InvalidOutputLength(okm.len()))
}

/// Derive a 128-bit sub-key from key material under a domain-separation label.
///
/// No salt is used; different `label`s give independent keys.
///
/// # Errors
///
/// Never fails for a 16-byte output; the `Result` mirrors [`hkdf_sha256`].
pub fn derive_subkey(key_material: &[u8], label: &[u8]) -> Result<SubKey, CryptoError> {
    let mut okm = [0u8; SUBKEY_LENGTH];
    hkdf_sha256(key_material, None, label, &mut okm)?;
    let key = SubKey(okm);
    okm.zeroize();
    Ok(key)
}
