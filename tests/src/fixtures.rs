//! # Test Fixtures
//!
//! Builders for diagnosis keys and the sightings a device holding them would
//! have produced. Sightings are built through the same key expansion the
//! engine uses, so a fixture matches exactly when the engine is right about
//! which interval it belongs to.

use ec_01_exposure_matching::KeyExpander;
use rand::Rng;
use shared_types::{DiagnosisKey, IntervalNumber, Observation, STANDARD_ROLLING_PERIOD};

/// Plaintext metadata for format 1.0 with the given transmit power.
pub fn metadata_v1(tx_power: i8) -> [u8; 4] {
    [0x40, tx_power as u8, 0, 0]
}

/// Deterministic key: 16 copies of `seed`.
pub fn key(seed: u8, rolling_start: u32) -> DiagnosisKey {
    DiagnosisKey::new(vec![seed; 16], rolling_start, STANDARD_ROLLING_PERIOD)
}

/// Key with random material.
pub fn random_key(rng: &mut impl Rng, rolling_start: u32) -> DiagnosisKey {
    let mut material = [0u8; 16];
    rng.fill(&mut material);
    DiagnosisKey::new(material.to_vec(), rolling_start, STANDARD_ROLLING_PERIOD)
}

/// Builds sightings of one key's broadcasts.
pub struct Broadcaster {
    expander: KeyExpander,
}

impl Broadcaster {
    pub fn new(key: &DiagnosisKey) -> Self {
        Self {
            expander: KeyExpander::new(key).expect("fixture key must be well-formed"),
        }
    }

    /// Sighting during `interval`, `offset_secs` after its start.
    pub fn sighting(&self, interval: u32, offset_secs: i64, rssi: i16, plain: [u8; 4]) -> Observation {
        let interval = IntervalNumber(interval);
        let rpi = self.expander.rolling_identifier(interval);
        Observation {
            rpi,
            metadata: self.expander.metadata_key().encrypt(&rpi, plain),
            rssi,
            timestamp: interval.start_timestamp() + offset_secs,
        }
    }

    /// Sighting with valid metadata and transmit power -8 dBm.
    pub fn plain_sighting(&self, interval: u32, offset_secs: i64, rssi: i16) -> Observation {
        self.sighting(interval, offset_secs, rssi, metadata_v1(-8))
    }
}

/// Observations of identifiers nobody published.
pub fn background_noise(rng: &mut impl Rng, count: usize, around: i64) -> Vec<Observation> {
    (0..count)
        .map(|_| {
            let mut rpi = [0u8; 16];
            let mut metadata = [0u8; 4];
            rng.fill(&mut rpi);
            rng.fill(&mut metadata);
            Observation {
                rpi: shared_types::RollingProximityId(rpi),
                metadata: shared_types::EncryptedMetadata(metadata),
                rssi: rng.gen_range(-100..-30),
                timestamp: around + rng.gen_range(0..86_400),
            }
        })
        .collect()
}
