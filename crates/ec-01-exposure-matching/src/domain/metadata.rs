//! # Metadata Validator
//!
//! Decrypts the 4-byte metadata of each matched observation and checks it
//! against the configured [`MetadataLayout`]. An unexpected version or
//! reserved byte flags the observation as a mismatch; it is kept, logged and
//! still used for clustering.
//!
//! Attenuation is `tx_power - rssi`.

use serde::{Deserialize, Serialize};
use shared_types::METADATA_LENGTH;
use tracing::warn;

use crate::domain::config::MetadataLayout;
use crate::domain::key_expander::MetadataKey;
use crate::domain::records::{MatchRecord, MatchedObservation};

/// Outcome of the plaintext metadata check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataStatus {
    Valid,
    /// Version or reserved bytes were not as expected.
    Mismatch { decrypted: [u8; METADATA_LENGTH] },
}

/// Display bucket for an attenuation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttenuationBand {
    Close,
    Near,
    Medium,
    Far,
}

impl AttenuationBand {
    pub fn from_attenuation(attenuation: i32) -> Self {
        match attenuation {
            a if a < 55 => Self::Close,
            a if a <= 63 => Self::Near,
            a if a <= 73 => Self::Medium,
            _ => Self::Far,
        }
    }
}

/// A matched observation with its decrypted metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedObservation {
    pub matched: MatchedObservation,
    pub decrypted: [u8; METADATA_LENGTH],
    /// Transmit power in dBm.
    pub tx_power: i8,
    /// `tx_power - rssi`.
    pub attenuation: i32,
    pub status: MetadataStatus,
}

impl ValidatedObservation {
    /// Unix timestamp of the sighting.
    pub fn timestamp(&self) -> i64 {
        self.matched.observation.timestamp
    }

    /// Received signal strength, dBm.
    pub fn rssi(&self) -> i16 {
        self.matched.observation.rssi
    }

    /// Position in the observation log.
    pub fn log_position(&self) -> usize {
        self.matched.log_position
    }

    /// Whether the decrypted metadata passed validation.
    pub fn is_valid(&self) -> bool {
        self.status == MetadataStatus::Valid
    }

    /// Proximity band of this sample's attenuation.
    pub fn band(&self) -> AttenuationBand {
        AttenuationBand::from_attenuation(self.attenuation)
    }
}

/// Decrypts and checks metadata against a fixed layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataValidator {
    layout: MetadataLayout,
}

impl MetadataValidator {
    /// Create a validator. `layout` must have passed `MetadataLayout::validate`.
    pub fn new(layout: MetadataLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &MetadataLayout {
        &self.layout
    }

    /// Decrypt and check one observation. Pure: same input, same output.
    pub fn validate_observation(&self, key: &MetadataKey, matched: &MatchedObservation) -> ValidatedObservation {
        let observation = &matched.observation;
        let decrypted = key.decrypt(&observation.rpi, &observation.metadata);
        let byte = |offset: usize| decrypted.get(offset).copied().unwrap_or(0);

        let version_ok = byte(self.layout.version_offset) == self.layout.expected_version;
        let reserved_ok = self.layout.reserved_offsets.iter().all(|&o| byte(o) == 0);
        let status = if version_ok && reserved_ok {
            MetadataStatus::Valid
        } else {
            MetadataStatus::Mismatch { decrypted }
        };

        let tx_power = byte(self.layout.tx_power_offset) as i8;
        ValidatedObservation {
            matched: *matched,
            decrypted,
            tx_power,
            attenuation: i32::from(tx_power) - i32::from(observation.rssi),
            status,
        }
    }

    /// Validate every observation of a record, in record order.
    ///
    /// Mismatches are logged and kept.
    pub fn validate(&self, record: &MatchRecord) -> Vec<ValidatedObservation> {
        record
            .matches
            .iter()
            .map(|matched| {
                let validated = self.validate_observation(&record.metadata_key, matched);
                if let MetadataStatus::Mismatch { decrypted } = validated.status {
                    warn!(
                        key_index = record.key_index,
                        log_position = matched.log_position,
                        decrypted = %hex::encode(decrypted),
                        "[ec-01] Unexpected metadata bytes, keeping observation"
                    );
                }
                validated
            })
            .collect()
    }
}
