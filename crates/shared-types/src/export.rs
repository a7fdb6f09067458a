//! Diagnosis key export container framing.
//!
//! An export starts with a fixed 16-byte ASCII header followed by the
//! length-prefixed key records. Decoding the records is done by an external
//! decoder; this module only separates header from payload.

use crate::errors::ExportError;

/// Header that every key export starts with (space-padded to 16 bytes).
pub const EXPORT_HEADER: &[u8; 16] = b"EK Export v1    ";

/// Verify the export header and return the payload that follows it.
pub fn split_export_header(export: &[u8]) -> Result<&[u8], ExportError> {
    if export.len() < EXPORT_HEADER.len() {
        return Err(ExportError::Truncated { len: export.len() });
    }

    let (header, payload) = export.split_at(EXPORT_HEADER.len());
    if header != EXPORT_HEADER {
        return Err(ExportError::InvalidHeader);
    }

    Ok(payload)
}
