//! Versioned snapshot envelope.
//!
//! Blobs are self-describing JSON:
//! `{"format": "folio-snapshot", "schema_version": 1, "snapshot": {...}}`.
//! Readers accept any schema version up to [`SNAPSHOT_SCHEMA_VERSION`].

use serde::{Deserialize, Serialize};

use folio_doc::Snapshot;

use crate::error::{StoreError, StoreResult};

pub const SNAPSHOT_FORMAT: &str = "folio-snapshot";
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<S> {
    format: String,
    schema_version: u32,
    snapshot: S,
}

/// Encode a snapshot. The output is deterministic for equal snapshots.
///
/// Non-finite page measurements are rejected, since JSON would store them
/// as `null` and the blob could not be decoded again.
pub fn encode_snapshot(snapshot: &Snapshot) -> StoreResult<Vec<u8>> {
    if let Some(field) = snapshot.metadata.non_finite_field() {
        return Err(StoreError::Unencodable(format!(
            "metadata.{field} contains a non-finite number"
        )));
    }
    let envelope = Envelope {
        format: SNAPSHOT_FORMAT.to_string(),
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        snapshot,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

pub fn decode_snapshot(data: &[u8]) -> StoreResult<Snapshot> {
    let envelope: Envelope<Snapshot> =
        serde_json::from_slice(data).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    if envelope.format != SNAPSHOT_FORMAT {
        return Err(StoreError::Corrupt(format!(
            "unexpected blob format {:?}",
            envelope.format
        )));
    }
    if envelope.schema_version > SNAPSHOT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema {
            found: envelope.schema_version,
            supported: SNAPSHOT_SCHEMA_VERSION,
        });
    }
    Ok(envelope.snapshot)
}
