//! JSON file providers for the matching service's driven ports.
//!
//! Observation file: array of `{ "rpi": hex, "aem": hex, "rssi": int, "timestamp": int }`.
//! Key file: array of `{ "key_data": hex, "rolling_start_interval": u32,
//! "rolling_period": u32, "report_type": int?, "transmission_risk_level": int? }`.
//! A key file carrying the binary export header is recognized but not decoded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ec_01_exposure_matching::{DiagnosisKeyProvider, ObservationLogProvider, ProviderError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared_types::{
    split_export_header, DiagnosisKey, RawObservation, ReportType, TransmissionRiskLevel,
};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ObservationEntry {
    rpi: String,
    aem: String,
    rssi: i32,
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct KeyEntry {
    key_data: String,
    rolling_start_interval: u32,
    rolling_period: u32,
    #[serde(default)]
    report_type: Option<i32>,
    #[serde(default)]
    transmission_risk_level: Option<u8>,
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ProviderError> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            ProviderError::Unavailable(format!("{} not found", path.display()))
        }
        std::io::ErrorKind::PermissionDenied => {
            ProviderError::PermissionDenied(path.display().to_string())
        }
        _ => ProviderError::Io(e),
    })
}

fn parse_entries<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<Vec<T>, ProviderError> {
    serde_json::from_slice(bytes)
        .map_err(|e| ProviderError::ParseError(format!("{}: {e}", path.display())))
}

fn decode_hex(field: &str, position: usize, value: &str) -> Result<Vec<u8>, ProviderError> {
    hex::decode(value)
        .map_err(|e| ProviderError::ParseError(format!("entry {position}: {field}: {e}")))
}

/// Observation log stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonObservationFile {
    path: PathBuf,
}

impl JsonObservationFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ObservationLogProvider for JsonObservationFile {
    async fn observations(&self) -> Result<Vec<RawObservation>, ProviderError> {
        let bytes = read_file(&self.path).await?;
        let entries: Vec<ObservationEntry> = parse_entries(&self.path, &bytes)?;
        debug!(path = %self.path.display(), count = entries.len(), "Loaded observation file");

        entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                Ok(RawObservation {
                    rpi: decode_hex("rpi", position, &entry.rpi)?,
                    metadata: decode_hex("aem", position, &entry.aem)?,
                    rssi: entry.rssi,
                    timestamp: entry.timestamp,
                })
            })
            .collect()
    }
}

/// Diagnosis keys stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonKeyFile {
    path: PathBuf,
}

impl JsonKeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DiagnosisKeyProvider for JsonKeyFile {
    async fn diagnosis_keys(&self) -> Result<Vec<DiagnosisKey>, ProviderError> {
        let bytes = read_file(&self.path).await?;
        if bytes.starts_with(b"EK Export") {
            let payload = split_export_header(&bytes)?;
            return Err(ProviderError::Unavailable(format!(
                "{}: {} byte export payload needs an external decoder",
                self.path.display(),
                payload.len()
            )));
        }
        let entries: Vec<KeyEntry> = parse_entries(&self.path, &bytes)?;
        debug!(path = %self.path.display(), count = entries.len(), "Loaded key file");

        entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                let key_data = decode_hex("key_data", position, &entry.key_data)?;
                Ok(DiagnosisKey::new(
                    key_data,
                    entry.rolling_start_interval,
                    entry.rolling_period,
                )
                .with_report_type(entry.report_type.map_or(ReportType::Unknown, ReportType::from_wire))
                .with_transmission_risk_level(TransmissionRiskLevel::from(
                    entry.transmission_risk_level,
                )))
            })
            .collect()
    }
}
