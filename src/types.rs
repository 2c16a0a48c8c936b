//! Core types for DNS record snapshots
//!
//! These types define the wire format consumed by DNS-serving agents.
//! Rows are serialized as positional JSON arrays; the column meaning of each
//! `record_infos` row is given by [`RECORD_KEYS`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// SCHEMA
// =============================================================================

/// Column names of a `record_infos` row, in wire order.
///
/// Agents index into rows using this list, so the order is part of the
/// compatibility contract and must never change.
pub const RECORD_KEYS: [&str; 9] = [
    "id",
    "instance_group",
    "az",
    "az_id",
    "network",
    "deployment",
    "ip",
    "domain",
    "agent_id",
];

/// Domain used when a placement does not carry its own
pub const DEFAULT_DOMAIN: &str = "bosh";

/// Snapshot version, supplied by the caller and increasing across snapshots
pub type SnapshotVersion = u64;

/// 32-byte hash (Blake3)
pub type Hash = [u8; 32];

// =============================================================================
// RECORDS
// =============================================================================

/// Lightweight hostname resolution pair, serialized as `[ip, hostname]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub ip: String,
    pub hostname: String,
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.ip, &self.hostname).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (ip, hostname) = <(String, String)>::deserialize(deserializer)?;
        Ok(Self { ip, hostname })
    }
}

/// Rich metadata for one instance-network placement
///
/// Serialized as a 9-element array in [`RECORD_KEYS`] order. `instance_group`,
/// `network` and `deployment` hold canonicalized names; every other field is
/// carried through as supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInfo {
    pub id: String,
    pub instance_group: String,
    pub az: Option<String>,
    pub az_id: Option<String>,
    pub network: String,
    pub deployment: String,
    pub ip: String,
    pub domain: String,
    pub agent_id: Option<String>,
}

type RecordInfoRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
    String,
    Option<String>,
);

impl Serialize for RecordInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (
            &self.id,
            &self.instance_group,
            &self.az,
            &self.az_id,
            &self.network,
            &self.deployment,
            &self.ip,
            &self.domain,
            &self.agent_id,
        )
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (id, instance_group, az, az_id, network, deployment, ip, domain, agent_id) =
            RecordInfoRow::deserialize(deserializer)?;

        Ok(Self {
            id,
            instance_group,
            az,
            az_id,
            network,
            deployment,
            ip,
            domain,
            agent_id,
        })
    }
}

// =============================================================================
// SNAPSHOT FILE
// =============================================================================

/// Borrowed view of a snapshot, used to produce the wire bytes
///
/// Field declaration order is the serialized key order.
#[derive(Debug, Serialize)]
pub struct RecordsFileRef<'a> {
    pub records: &'a [Record],
    pub version: SnapshotVersion,
    pub record_keys: &'a [&'static str],
    pub record_infos: &'a [RecordInfo],
}

/// Owned snapshot as read back by consumers
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsFile {
    pub records: Vec<Record>,
    pub version: SnapshotVersion,
    pub record_keys: Vec<String>,
    pub record_infos: Vec<RecordInfo>,
}

// =============================================================================
// PLACEMENTS
// =============================================================================

/// One (instance, network) placement fact, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancePlacement {
    /// Unique instance id (usually a UUID)
    pub instance_id: String,

    /// Numeric index within the instance group
    pub index: u32,

    pub instance_group: String,

    /// Availability zone, absent for zoneless deployments
    #[serde(default)]
    pub az: Option<String>,

    pub network: String,

    pub deployment: String,

    pub ip: String,

    /// Overrides the configured default domain
    #[serde(default)]
    pub domain: Option<String>,

    /// Agent id, absent until the agent has registered
    #[serde(default)]
    pub agent_id: Option<String>,
}
