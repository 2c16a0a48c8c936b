//! DNS Record Set Builder
//!
//! Every placement yields one `(ip, hostname)` record keyed by instance id,
//! an optional second record keyed by index, and one metadata row.
//! Rows keep call order; nothing is sorted or deduplicated.

use tracing::debug;

use super::{DnsSnapshot, RecordSetError};
use crate::crypto;
use crate::encoder::AzEncoder;
use crate::naming::{canonicalize, dns_record_name, HostLabel};
use crate::types::{InstancePlacement, Record, RecordInfo, RecordsFileRef, SnapshotVersion, RECORD_KEYS};

/// Versioned DNS record set under construction
pub struct DnsRecordSet<'a> {
    /// Snapshot version
    version: SnapshotVersion,

    /// Also publish `<index>.<group>...` names
    include_index_records: bool,

    /// AZ table, fixed for the lifetime of the set
    az_encoder: &'a (dyn AzEncoder + Sync),

    /// Hostname lookup rows
    records: Vec<Record>,

    /// Metadata rows, one per placement
    record_infos: Vec<RecordInfo>,
}

impl<'a> DnsRecordSet<'a> {
    /// Create an empty record set
    pub fn new(
        version: SnapshotVersion,
        include_index_records: bool,
        az_encoder: &'a (dyn AzEncoder + Sync),
    ) -> Self {
        Self {
            version,
            include_index_records,
            az_encoder,
            records: Vec::new(),
            record_infos: Vec::new(),
        }
    }

    /// Add one instance-network placement
    ///
    /// The AZ is encoded before anything is appended, so an encoder failure
    /// leaves the set untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn add_record(
        &mut self,
        instance_id: &str,
        index: u32,
        instance_group: &str,
        az: Option<&str>,
        network: &str,
        deployment: &str,
        ip: &str,
        domain: &str,
        agent_id: Option<&str>,
    ) -> Result<(), RecordSetError> {
        let az_id = self.az_encoder.encode_az(az)?;

        self.add_hosts_record(HostLabel::Id(instance_id), instance_group, network, deployment, ip, domain);
        if self.include_index_records {
            self.add_hosts_record(HostLabel::Index(index), instance_group, network, deployment, ip, domain);
        }

        self.record_infos.push(RecordInfo {
            id: instance_id.to_string(),
            instance_group: canonicalize(instance_group),
            az: az.map(str::to_string),
            az_id,
            network: canonicalize(network),
            deployment: canonicalize(deployment),
            ip: ip.to_string(),
            domain: domain.to_string(),
            agent_id: agent_id.map(str::to_string),
        });

        Ok(())
    }

    /// Add a placement, using `default_domain` when it carries none
    pub fn add_placement(
        &mut self,
        placement: &InstancePlacement,
        default_domain: &str,
    ) -> Result<(), RecordSetError> {
        self.add_record(
            &placement.instance_id,
            placement.index,
            &placement.instance_group,
            placement.az.as_deref(),
            &placement.network,
            &placement.deployment,
            &placement.ip,
            placement.domain.as_deref().unwrap_or(default_domain),
            placement.agent_id.as_deref(),
        )
    }

    fn add_hosts_record(
        &mut self,
        host: HostLabel<'_>,
        instance_group: &str,
        network: &str,
        deployment: &str,
        ip: &str,
        domain: &str,
    ) {
        let hostname = dns_record_name(host, instance_group, network, deployment, domain);
        debug!("Adding record {} -> {}", hostname, ip);

        self.records.push(Record {
            ip: ip.to_string(),
            hostname,
        });
    }

    pub fn version(&self) -> SnapshotVersion {
        self.version
    }

    pub fn include_index_records(&self) -> bool {
        self.include_index_records
    }

    pub fn record_keys(&self) -> &'static [&'static str] {
        &RECORD_KEYS
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_infos(&self) -> &[RecordInfo] {
        &self.record_infos
    }

    /// Number of placements added
    pub fn len(&self) -> usize {
        self.record_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_infos.is_empty()
    }

    /// Serialize to compact JSON with keys `records`, `version`,
    /// `record_keys`, `record_infos` in that order
    pub fn to_json(&self) -> Result<Vec<u8>, RecordSetError> {
        let file = RecordsFileRef {
            records: &self.records,
            version: self.version,
            record_keys: &RECORD_KEYS,
            record_infos: &self.record_infos,
        };

        Ok(serde_json::to_vec(&file)?)
    }

    /// Hex Blake3 fingerprint of [`Self::to_json`]
    pub fn digest(&self) -> Result<String, RecordSetError> {
        Ok(crypto::fingerprint(&self.to_json()?))
    }

    /// Freeze the set into an immutable snapshot
    pub fn finalize(self) -> Result<DnsSnapshot, RecordSetError> {
        let content = self.to_json()?;
        Ok(DnsSnapshot::new(
            self.version,
            self.records.len(),
            self.record_infos.len(),
            content,
        ))
    }
}
