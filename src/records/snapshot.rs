//! Frozen DNS snapshot
//!
//! Holds the serialized bytes and fingerprint of a finished record set.
//! Nothing can be added once a snapshot exists.

use tracing::info;

use super::{DnsRecordSet, RecordSetError};
use crate::crypto;
use crate::encoder::AzEncoder;
use crate::types::{InstancePlacement, RecordsFile, SnapshotVersion};

/// Immutable, fingerprinted record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsSnapshot {
    version: SnapshotVersion,
    record_count: usize,
    record_info_count: usize,

    /// Canonical JSON bytes
    content: Vec<u8>,

    /// Hex Blake3 of `content`
    digest: String,
}

impl DnsSnapshot {
    pub(super) fn new(
        version: SnapshotVersion,
        record_count: usize,
        record_info_count: usize,
        content: Vec<u8>,
    ) -> Self {
        let digest = crypto::fingerprint(&content);

        Self {
            version,
            record_count,
            record_info_count,
            content,
            digest,
        }
    }

    /// Build a snapshot from placements, in the order given
    pub fn from_placements(
        version: SnapshotVersion,
        include_index_records: bool,
        az_encoder: &(dyn AzEncoder + Sync),
        default_domain: &str,
        placements: &[InstancePlacement],
    ) -> Result<Self, RecordSetError> {
        let mut set = DnsRecordSet::new(version, include_index_records, az_encoder);
        for placement in placements {
            set.add_placement(placement, default_domain)?;
        }

        let snapshot = set.finalize()?;

        info!(
            "📝 Built DNS snapshot v{}: {} records, {} record infos",
            snapshot.version, snapshot.record_count, snapshot.record_info_count
        );

        Ok(snapshot)
    }

    pub fn version(&self) -> SnapshotVersion {
        self.version
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn record_info_count(&self) -> usize {
        self.record_info_count
    }

    /// Serialized bytes, exactly as hashed
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Parse the content back into its owned form
    pub fn parse(&self) -> Result<RecordsFile, RecordSetError> {
        Ok(serde_json::from_slice(&self.content)?)
    }
}
