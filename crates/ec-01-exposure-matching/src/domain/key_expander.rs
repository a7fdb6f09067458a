//! # Key Expander
//!
//! Derives, for one diagnosis key, the rolling identifiers broadcast during its
//! validity window and the key that decrypts the metadata sent alongside them.
//!
//! ## Construction
//!
//! ```text
//! RPIK  = HKDF-SHA256(key_data, salt = none, info = "EN-RPIK", 16)
//! AEMK  = HKDF-SHA256(key_data, salt = none, info = "EN-AEMK", 16)
//! RPI_j = AES-128(RPIK, "EN-RPI" || 0x00 * 6 || u32_le(j))
//! AEM   = AES-128-CTR(AEMK, iv = RPI_j) XOR metadata
//! ```
//!
//! Both derivations are pure functions of fixed-length input; the only failure
//! path is key material of the wrong length, rejected before any derivation.

use shared_crypto::{apply_ctr_keystream, derive_subkey, BlockCipher, SubKey};
use shared_types::{
    DiagnosisKey, EncryptedMetadata, IntervalNumber, RollingProximityId, KEY_LENGTH,
    METADATA_LENGTH,
};

use crate::error::KeyError;

/// HKDF label for the rolling proximity identifier key.
pub const RPIK_LABEL: &[u8] = b"EN-RPIK";

/// HKDF label for the associated encrypted metadata key.
pub const AEMK_LABEL: &[u8] = b"EN-AEMK";

const RPI_PREFIX: &[u8; 6] = b"EN-RPI";

/// The 16-byte block encrypted to produce the identifier for `interval`.
pub fn padded_data(interval: IntervalNumber) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[..6].copy_from_slice(RPI_PREFIX);
    block[12..].copy_from_slice(&interval.0.to_le_bytes());
    block
}

/// Key that turns encrypted metadata back into plaintext for one diagnosis key.
#[derive(Clone, PartialEq, Eq)]
pub struct MetadataKey(SubKey);

impl MetadataKey {
    /// 4-byte keystream bound to `rpi`.
    pub fn keystream(&self, rpi: &RollingProximityId) -> [u8; METADATA_LENGTH] {
        let mut block = [0u8; METADATA_LENGTH];
        apply_ctr_keystream(&self.0, rpi.as_bytes(), &mut block);
        block
    }

    /// Decrypt metadata observed together with `rpi`.
    pub fn decrypt(&self, rpi: &RollingProximityId, metadata: &EncryptedMetadata) -> [u8; METADATA_LENGTH] {
        let mut plain = metadata.0;
        apply_ctr_keystream(&self.0, rpi.as_bytes(), &mut plain);
        plain
    }

    /// Encrypt plaintext metadata for broadcast with `rpi`.
    pub fn encrypt(&self, rpi: &RollingProximityId, plain: [u8; METADATA_LENGTH]) -> EncryptedMetadata {
        let mut cipher = plain;
        apply_ctr_keystream(&self.0, rpi.as_bytes(), &mut cipher);
        EncryptedMetadata(cipher)
    }
}

impl std::fmt::Debug for MetadataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MetadataKey(..)")
    }
}

/// Expansion state for one diagnosis key.
#[derive(Debug, Clone)]
pub struct KeyExpander {
    identifier_cipher: BlockCipher,
    metadata_key: MetadataKey,
    rolling_start: IntervalNumber,
    rolling_period: u32,
}

impl KeyExpander {
    /// Derive both sub-keys for `key`.
    ///
    /// # Errors
    ///
    /// - `KeyError::MalformedKey` if the key material is not 16 bytes.
    /// - `KeyError::InvalidRollingWindow` if the last interval overflows.
    pub fn new(key: &DiagnosisKey) -> Result<Self, KeyError> {
        if key.key_data.len() != KEY_LENGTH {
            return Err(KeyError::MalformedKey {
                length: key.key_data.len(),
            });
        }
        if key.rolling_period > 0 && key.last_interval().is_none() {
            return Err(KeyError::InvalidRollingWindow {
                start: key.rolling_start_interval.0,
                period: key.rolling_period,
            });
        }

        // Fixed-length input: HKDF cannot fail here.
        let rpik = derive_subkey(&key.key_data, RPIK_LABEL)
            .map_err(|_| KeyError::MalformedKey { length: key.key_data.len() })?;
        let aemk = derive_subkey(&key.key_data, AEMK_LABEL)
            .map_err(|_| KeyError::MalformedKey { length: key.key_data.len() })?;

        Ok(Self {
            identifier_cipher: BlockCipher::new(&rpik),
            metadata_key: MetadataKey(aemk),
            rolling_start: key.rolling_start_interval,
            rolling_period: key.rolling_period,
        })
    }

    /// Number of identifiers this key expands to.
    pub fn len(&self) -> usize {
        self.rolling_period as usize
    }

    /// Whether the validity window is empty.
    pub fn is_empty(&self) -> bool {
        self.rolling_period == 0
    }

    /// Interval numbers covered by the key, in order.
    pub fn intervals(&self) -> impl Iterator<Item = IntervalNumber> {
        let start = self.rolling_start.0;
        (0..self.rolling_period).map(move |offset| IntervalNumber(start + offset))
    }

    /// Identifier broadcast during `interval`.
    pub fn rolling_identifier(&self, interval: IntervalNumber) -> RollingProximityId {
        RollingProximityId(self.identifier_cipher.encrypt_block(&padded_data(interval)))
    }

    /// All identifiers with their interval numbers, in interval order.
    pub fn identifiers(&self) -> impl Iterator<Item = (IntervalNumber, RollingProximityId)> + '_ {
        self.intervals()
            .map(move |interval| (interval, self.rolling_identifier(interval)))
    }

    /// Metadata decryption key for this diagnosis key.
    pub fn metadata_key(&self) -> &MetadataKey {
        &self.metadata_key
    }

    /// Give up the expander, keeping only the metadata key.
    pub fn into_metadata_key(self) -> MetadataKey {
        self.metadata_key
    }
}
