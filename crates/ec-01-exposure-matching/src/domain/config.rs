//! Matching configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use ec_01_exposure_matching::domain::MatchingConfigBuilder;
//!
//! let config = MatchingConfigBuilder::new()
//!     .gap_threshold_secs(10)
//!     .history_days(14)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};
use shared_types::TimeZoneOffset;

use crate::error::MatchingError;

/// Default gap that separates two encounters, in seconds.
pub const DEFAULT_GAP_THRESHOLD_SECS: i64 = 10;

/// Default length of the observation overview window, in days.
pub const DEFAULT_HISTORY_DAYS: u32 = 14;

/// Longest overview window accepted.
pub const MAX_HISTORY_DAYS: u32 = 28;

/// Byte positions and expected values inside the 4-byte plaintext metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataLayout {
    /// Offset of the version byte.
    pub version_offset: usize,
    /// Value the version byte must carry.
    pub expected_version: u8,
    /// Offset of the signed transmit power byte.
    pub tx_power_offset: usize,
    /// Offsets of bytes that must be zero.
    pub reserved_offsets: [usize; 2],
}

impl MetadataLayout {
    /// Exposure Notification metadata format 1.0.
    pub const V1: Self = Self {
        version_offset: 0,
        expected_version: 0x40,
        tx_power_offset: 1,
        reserved_offsets: [2, 3],
    };

    /// Check that every offset lies inside the metadata and no two overlap.
    pub fn validate(&self) -> Result<(), MatchingError> {
        let offsets = [
            self.version_offset,
            self.tx_power_offset,
            self.reserved_offsets[0],
            self.reserved_offsets[1],
        ];
        if offsets.iter().any(|&o| o >= shared_types::METADATA_LENGTH) {
            return Err(MatchingError::InvalidConfig(format!(
                "metadata offsets out of range: {:?}",
                offsets
            )));
        }
        for (i, a) in offsets.iter().enumerate() {
            if offsets[i + 1..].contains(a) {
                return Err(MatchingError::InvalidConfig(format!(
                    "metadata offset {} used twice",
                    a
                )));
            }
        }
        Ok(())
    }
}

impl Default for MetadataLayout {
    fn default() -> Self {
        Self::V1
    }
}

/// Configuration of one matching run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// A gap of at least this many seconds starts a new encounter.
    pub gap_threshold_secs: i64,
    /// Keep records for keys with no matched observation.
    pub keep_empty_records: bool,
    /// Offset applied when bucketing timestamps into local days.
    pub time_zone_offset: TimeZoneOffset,
    /// Days covered by the observation overview.
    pub history_days: u32,
    /// Plaintext metadata layout.
    pub metadata_layout: MetadataLayout,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            gap_threshold_secs: DEFAULT_GAP_THRESHOLD_SECS,
            keep_empty_records: true,
            time_zone_offset: TimeZoneOffset::UTC,
            history_days: DEFAULT_HISTORY_DAYS,
            metadata_layout: MetadataLayout::V1,
        }
    }
}

impl MatchingConfig {
    /// Validate configuration bounds
    pub fn validate(&self) -> Result<(), MatchingError> {
        if self.gap_threshold_secs <= 0 {
            return Err(MatchingError::InvalidConfig(format!(
                "gap_threshold_secs must be positive, got {}",
                self.gap_threshold_secs
            )));
        }

        if self.history_days == 0 || self.history_days > MAX_HISTORY_DAYS {
            return Err(MatchingError::InvalidConfig(format!(
                "history_days must be between 1 and {}, got {}",
                MAX_HISTORY_DAYS, self.history_days
            )));
        }

        self.metadata_layout.validate()
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `EC_GAP_THRESHOLD_SECS`, `EC_KEEP_EMPTY_RECORDS`,
    /// `EC_TZ_OFFSET_SECS` and `EC_HISTORY_DAYS`. The time zone falls back to
    /// the host offset.
    pub fn from_env() -> Result<Self, MatchingError> {
        let mut config = Self::from_lookup(|name| std::env::var(name).ok())?;
        if std::env::var("EC_TZ_OFFSET_SECS").is_err() {
            config.time_zone_offset = TimeZoneOffset::local();
        }
        Ok(config)
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MatchingError> {
        fn parse<T: std::str::FromStr>(name: &str, value: String) -> Result<T, MatchingError> {
            value
                .trim()
                .parse()
                .map_err(|_| MatchingError::InvalidConfig(format!("{}={} is not valid", name, value)))
        }

        let mut builder = MatchingConfigBuilder::new();
        if let Some(v) = lookup("EC_GAP_THRESHOLD_SECS") {
            builder = builder.gap_threshold_secs(parse("EC_GAP_THRESHOLD_SECS", v)?);
        }
        if let Some(v) = lookup("EC_KEEP_EMPTY_RECORDS") {
            builder = builder.keep_empty_records(parse("EC_KEEP_EMPTY_RECORDS", v)?);
        }
        if let Some(v) = lookup("EC_TZ_OFFSET_SECS") {
            builder = builder.time_zone_offset(TimeZoneOffset(parse("EC_TZ_OFFSET_SECS", v)?));
        }
        if let Some(v) = lookup("EC_HISTORY_DAYS") {
            builder = builder.history_days(parse("EC_HISTORY_DAYS", v)?);
        }
        builder.build()
    }

    /// Builder-style method to set the encounter gap
    pub fn with_gap_threshold_secs(mut self, secs: i64) -> Self {
        self.gap_threshold_secs = secs;
        self
    }

    /// Builder-style method to set the time zone offset
    pub fn with_time_zone_offset(mut self, offset: TimeZoneOffset) -> Self {
        self.time_zone_offset = offset;
        self
    }
}

/// Builder for MatchingConfig with validation
#[derive(Default)]
pub struct MatchingConfigBuilder {
    gap_threshold_secs: Option<i64>,
    keep_empty_records: Option<bool>,
    time_zone_offset: Option<TimeZoneOffset>,
    history_days: Option<u32>,
    metadata_layout: Option<MetadataLayout>,
}

impl MatchingConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap, in seconds, that separates two encounters
    pub fn gap_threshold_secs(mut self, secs: i64) -> Self {
        self.gap_threshold_secs = Some(secs);
        self
    }

    /// Keep or drop records of keys without matches
    pub fn keep_empty_records(mut self, keep: bool) -> Self {
        self.keep_empty_records = Some(keep);
        self
    }

    /// Set the local time zone offset
    pub fn time_zone_offset(mut self, offset: TimeZoneOffset) -> Self {
        self.time_zone_offset = Some(offset);
        self
    }

    /// Set the overview window in days (1-28)
    pub fn history_days(mut self, days: u32) -> Self {
        self.history_days = Some(days);
        self
    }

    /// Set the plaintext metadata layout
    pub fn metadata_layout(mut self, layout: MetadataLayout) -> Self {
        self.metadata_layout = Some(layout);
        self
    }

    /// Build the MatchingConfig, validating all parameters
    pub fn build(self) -> Result<MatchingConfig, MatchingError> {
        let defaults = MatchingConfig::default();

        let config = MatchingConfig {
            gap_threshold_secs: self.gap_threshold_secs.unwrap_or(defaults.gap_threshold_secs),
            keep_empty_records: self.keep_empty_records.unwrap_or(defaults.keep_empty_records),
            time_zone_offset: self.time_zone_offset.unwrap_or(defaults.time_zone_offset),
            history_days: self.history_days.unwrap_or(defaults.history_days),
            metadata_layout: self.metadata_layout.unwrap_or(defaults.metadata_layout),
        };

        config.validate()?;
        Ok(config)
    }
}
