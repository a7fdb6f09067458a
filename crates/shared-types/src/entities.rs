//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Keys**: `DiagnosisKey`, `ReportType`, `TransmissionRiskLevel`
//! - **Broadcast data**: `RollingProximityId`, `EncryptedMetadata`
//! - **Observation log**: `Observation`, `RawObservation`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::TypesError;
use crate::time::IntervalNumber;

// =============================================================================
// CLUSTER A: BROADCAST DATA
// =============================================================================

/// Length of diagnosis key material in bytes.
pub const KEY_LENGTH: usize = 16;

/// Length of a rolling proximity identifier in bytes.
pub const RPI_LENGTH: usize = 16;

/// Length of the encrypted metadata blob in bytes.
pub const METADATA_LENGTH: usize = 4;

/// A 16-byte rolling proximity identifier.
///
/// The only value ever broadcast and observed. Derived from a diagnosis key
/// and an interval number; never meaningful on its own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct RollingProximityId(pub [u8; RPI_LENGTH]);

impl RollingProximityId {
    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; RPI_LENGTH] {
        &self.0
    }
}

impl TryFrom<&[u8]> for RollingProximityId {
    type Error = TypesError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; RPI_LENGTH] =
            bytes.try_into().map_err(|_| TypesError::InvalidLength {
                field: "rolling proximity identifier",
                expected: RPI_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }
}

impl fmt::Debug for RollingProximityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rpi({})", hex::encode(self.0))
    }
}

impl fmt::Display for RollingProximityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// The 4-byte associated encrypted metadata broadcast alongside an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct EncryptedMetadata(pub [u8; METADATA_LENGTH]);

impl EncryptedMetadata {
    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; METADATA_LENGTH] {
        &self.0
    }
}

impl TryFrom<&[u8]> for EncryptedMetadata {
    type Error = TypesError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; METADATA_LENGTH] =
            bytes.try_into().map_err(|_| TypesError::InvalidLength {
                field: "encrypted metadata",
                expected: METADATA_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }
}

// =============================================================================
// CLUSTER B: DIAGNOSIS KEYS
// =============================================================================

/// Report type attached to a published key.
///
/// Wire values follow the key export format; anything unrecognised decodes to
/// `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReportType {
    #[default]
    Unknown,
    ConfirmedTest,
    ConfirmedClinicalDiagnosis,
    SelfReport,
    Recursive,
    Revoked,
}

impl ReportType {
    /// Decode from the export format's integer value.
    pub fn from_wire(value: i32) -> Self {
        match value {
            1 => Self::ConfirmedTest,
            2 => Self::ConfirmedClinicalDiagnosis,
            3 => Self::SelfReport,
            4 => Self::Recursive,
            5 => Self::Revoked,
            _ => Self::Unknown,
        }
    }

    /// Encode to the export format's integer value.
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::ConfirmedTest => 1,
            Self::ConfirmedClinicalDiagnosis => 2,
            Self::SelfReport => 3,
            Self::Recursive => 4,
            Self::Revoked => 5,
        }
    }
}

/// Transmission risk level attached to a published key (deprecated upstream,
/// still present in older exports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransmissionRiskLevel {
    #[default]
    Unknown,
    Level(u8),
}

impl From<Option<u8>> for TransmissionRiskLevel {
    fn from(value: Option<u8>) -> Self {
        value.map_or(Self::Unknown, Self::Level)
    }
}

/// A published diagnosis key (temporary exposure key).
///
/// `key_data` is kept as a byte vector because it arrives from an external
/// decoder; its length is checked by the key expander, not here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisKey {
    /// Secret key material, 16 bytes when well-formed.
    pub key_data: Vec<u8>,
    /// First 10-minute interval the key was valid for.
    pub rolling_start_interval: IntervalNumber,
    /// Number of consecutive intervals the key was valid for (nominally 144).
    pub rolling_period: u32,
    /// Report type, carried through unmodified.
    pub report_type: ReportType,
    /// Transmission risk level, carried through unmodified.
    pub transmission_risk_level: TransmissionRiskLevel,
}

impl DiagnosisKey {
    /// Create a key without report metadata.
    pub fn new(key_data: impl Into<Vec<u8>>, rolling_start_interval: u32, rolling_period: u32) -> Self {
        Self {
            key_data: key_data.into(),
            rolling_start_interval: IntervalNumber(rolling_start_interval),
            rolling_period,
            report_type: ReportType::Unknown,
            transmission_risk_level: TransmissionRiskLevel::Unknown,
        }
    }

    /// Builder-style method to set the report type
    pub fn with_report_type(mut self, report_type: ReportType) -> Self {
        self.report_type = report_type;
        self
    }

    /// Builder-style method to set the transmission risk level
    pub fn with_transmission_risk_level(mut self, level: TransmissionRiskLevel) -> Self {
        self.transmission_risk_level = level;
        self
    }

    /// Whether the key material has the expected length.
    pub fn is_well_formed(&self) -> bool {
        self.key_data.len() == KEY_LENGTH
    }

    /// Last interval number covered by this key, if the window is non-empty
    /// and does not overflow.
    pub fn last_interval(&self) -> Option<IntervalNumber> {
        if self.rolling_period == 0 {
            return None;
        }
        self.rolling_start_interval
            .0
            .checked_add(self.rolling_period - 1)
            .map(IntervalNumber)
    }
}

// Key material is secret; never print it.
impl fmt::Debug for DiagnosisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosisKey")
            .field("key_len", &self.key_data.len())
            .field("rolling_start_interval", &self.rolling_start_interval)
            .field("rolling_period", &self.rolling_period)
            .field("report_type", &self.report_type)
            .field("transmission_risk_level", &self.transmission_risk_level)
            .finish()
    }
}

// =============================================================================
// CLUSTER C: OBSERVATION LOG
// =============================================================================

/// One recorded sighting of a broadcast identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    /// Identifier actually seen on air.
    pub rpi: RollingProximityId,
    /// Encrypted metadata broadcast with the identifier.
    pub metadata: EncryptedMetadata,
    /// Received signal strength in dBm.
    pub rssi: i16,
    /// Seconds since the Unix epoch, device clock.
    pub timestamp: i64,
}

/// An observation as handed over by a log provider, before length checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub rpi: Vec<u8>,
    pub metadata: Vec<u8>,
    pub rssi: i32,
    pub timestamp: i64,
}

impl TryFrom<&RawObservation> for Observation {
    type Error = TypesError;

    fn try_from(raw: &RawObservation) -> Result<Self, Self::Error> {
        let rssi = i16::try_from(raw.rssi).map_err(|_| TypesError::OutOfRange {
            field: "rssi",
            value: i64::from(raw.rssi),
        })?;
        Ok(Self {
            rpi: RollingProximityId::try_from(raw.rpi.as_slice())?,
            metadata: EncryptedMetadata::try_from(raw.metadata.as_slice())?,
            rssi,
            timestamp: raw.timestamp,
        })
    }
}
