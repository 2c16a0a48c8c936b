//! Records File Publisher
//!
//! Builds a snapshot from the current placements and writes it to disk
//! when its fingerprint differs from the one already published.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::DnsRecordsConfig;
use crate::crypto;
use crate::encoder::AzIndex;
use crate::records::DnsSnapshot;
use crate::types::{InstancePlacement, SnapshotVersion};

/// Version and fingerprint of a records file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSnapshot {
    pub version: SnapshotVersion,
    pub digest: String,
}

/// Result of a publication attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new records file was written
    Published {
        snapshot: PublishedSnapshot,
        records: usize,
    },

    /// The published file already matches the placements
    Unchanged(PublishedSnapshot),
}

impl PublishOutcome {
    pub fn snapshot(&self) -> &PublishedSnapshot {
        match self {
            PublishOutcome::Published { snapshot, .. } => snapshot,
            PublishOutcome::Unchanged(snapshot) => snapshot,
        }
    }
}

/// Only the version is needed from a previously published file
#[derive(Deserialize)]
struct VersionHeader {
    version: SnapshotVersion,
}

/// Records file publisher
pub struct SnapshotPublisher {
    /// Configuration
    config: Arc<DnsRecordsConfig>,

    /// AZ table, built once from the configuration
    az_index: AzIndex,

    /// Output path for the file
    output_path: PathBuf,
}

impl SnapshotPublisher {
    /// Create a new publisher
    pub fn new(config: Arc<DnsRecordsConfig>) -> Self {
        let az_index = config.az_index();
        let output_path = config.output_path.clone();

        Self {
            config,
            az_index,
            output_path,
        }
    }

    /// Build a snapshot of the placements at the given version
    pub fn build(
        &self,
        version: SnapshotVersion,
        placements: &[InstancePlacement],
    ) -> anyhow::Result<DnsSnapshot> {
        let snapshot = DnsSnapshot::from_placements(
            version,
            self.config.include_index_records,
            &self.az_index,
            &self.config.default_domain,
            placements,
        )?;
        Ok(snapshot)
    }

    /// Read the currently published file, if any
    ///
    /// A missing or unparseable file counts as nothing published.
    pub async fn published(&self) -> anyhow::Result<Option<PublishedSnapshot>> {
        let content = match tokio::fs::read(&self.output_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // An unreadable file is replaced by the next publication
        let header: VersionHeader = match serde_json::from_slice(&content) {
            Ok(header) => header,
            Err(e) => {
                warn!("Ignoring unparseable records file {:?}: {}", self.output_path, e);
                return Ok(None);
            }
        };

        Ok(Some(PublishedSnapshot {
            version: header.version,
            digest: crypto::fingerprint(&content),
        }))
    }

    /// Publish the placements if they differ from the published file
    ///
    /// Without a requested version, unchanged placements keep the published
    /// version and changed ones get the next version.
    pub async fn publish(
        &self,
        placements: &[InstancePlacement],
        requested_version: Option<SnapshotVersion>,
    ) -> anyhow::Result<PublishOutcome> {
        let previous = self.published().await?;

        if let Some(prev) = &previous {
            let current_version = requested_version.unwrap_or(prev.version);
            let current = self.build(current_version, placements)?;

            if current.digest() == prev.digest {
                debug!("Records file unchanged at v{} ({})", prev.version, prev.digest);
                return Ok(PublishOutcome::Unchanged(prev.clone()));
            }

            if let Some(requested) = requested_version {
                if requested <= prev.version {
                    warn!(
                        "Publishing v{} over newer or equal published v{}",
                        requested, prev.version
                    );
                }
            }
        }

        let version = match (requested_version, &previous) {
            (Some(version), _) => version,
            (None, Some(prev)) => prev.version.checked_add(1).ok_or_else(|| {
                anyhow::anyhow!("Published version {} cannot be incremented", prev.version)
            })?,
            (None, None) => 1,
        };

        let snapshot = self.build(version, placements)?;
        self.save(&snapshot).await?;

        info!(
            "📝 Published records file v{}: {} records, digest {}",
            snapshot.version(),
            snapshot.record_count(),
            snapshot.digest()
        );

        Ok(PublishOutcome::Published {
            snapshot: PublishedSnapshot {
                version: snapshot.version(),
                digest: snapshot.digest().to_string(),
            },
            records: snapshot.record_count(),
        })
    }

    /// Write the snapshot bytes to disk
    async fn save(&self, snapshot: &DnsSnapshot) -> anyhow::Result<()> {
        // Ensure output directory exists
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write file atomically (write to temp, then rename)
        let temp_path = self.output_path.with_extension("json.tmp");

        tokio::fs::write(&temp_path, snapshot.content()).await?;
        tokio::fs::rename(&temp_path, &self.output_path).await?;

        debug!("Saved records file to {:?}", self.output_path);

        Ok(())
    }

    /// Get output path
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Read placements from a JSON array file
pub async fn load_placements(path: &Path) -> anyhow::Result<Vec<InstancePlacement>> {
    let content = tokio::fs::read(path).await?;
    let placements: Vec<InstancePlacement> = serde_json::from_slice(&content)?;
    debug!("Loaded {} placements from {:?}", placements.len(), path);
    Ok(placements)
}

/// Run periodic publication task
pub async fn run_periodic_publication(
    publisher: SnapshotPublisher,
    placements_path: PathBuf,
    interval_secs: u64,
) {
    info!("📝 Starting periodic records publication (every {}s)", interval_secs);

    let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let placements = match load_placements(&placements_path).await {
            Ok(placements) => placements,
            Err(e) => {
                warn!("Failed to load placements from {:?}: {}", placements_path, e);
                continue;
            }
        };

        if let Err(e) = publisher.publish(&placements, None).await {
            warn!("Failed to publish records file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn placement(id: &str, index: u32, ip: &str) -> InstancePlacement {
        InstancePlacement {
            instance_id: id.to_string(),
            index,
            instance_group: "web".to_string(),
            az: Some("z1".to_string()),
            network: "default".to_string(),
            deployment: "cf".to_string(),
            ip: ip.to_string(),
            domain: None,
            agent_id: None,
        }
    }

    fn publisher(dir: &Path) -> SnapshotPublisher {
        let config = DnsRecordsConfig {
            az_names: vec!["z1".to_string()],
            output_path: dir.join("out").join("records.json"),
            ..Default::default()
        };
        SnapshotPublisher::new(Arc::new(config))
    }

    #[tokio::test]
    async fn test_first_publication_is_version_one() {
        let dir = tempdir().unwrap();
        let publisher = publisher(dir.path());

        assert!(publisher.published().await.unwrap().is_none());

        let outcome = publisher
            .publish(&[placement("a", 0, "10.0.0.1")], None)
            .await
            .unwrap();

        match &outcome {
            PublishOutcome::Published { snapshot, records } => {
                assert_eq!(snapshot.version, 1);
                assert_eq!(*records, 1);
            }
            other => panic!("expected publication, got {:?}", other),
        }

        let on_disk = publisher.published().await.unwrap().unwrap();
        assert_eq!(&on_disk, outcome.snapshot());
    }

    #[tokio::test]
    async fn test_unchanged_placements_not_republished() {
        let dir = tempdir().unwrap();
        let publisher = publisher(dir.path());
        let placements = vec![placement("a", 0, "10.0.0.1")];

        publisher.publish(&placements, None).await.unwrap();
        let outcome = publisher.publish(&placements, None).await.unwrap();

        assert!(matches!(outcome, PublishOutcome::Unchanged(ref s) if s.version == 1));
    }

    #[tokio::test]
    async fn test_changed_placements_bump_version() {
        let dir = tempdir().unwrap();
        let publisher = publisher(dir.path());

        publisher
            .publish(&[placement("a", 0, "10.0.0.1")], None)
            .await
            .unwrap();
        let outcome = publisher
            .publish(&[placement("a", 0, "10.0.0.2")], None)
            .await
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Published { ref snapshot, .. } if snapshot.version == 2));

        let content = tokio::fs::read(publisher.output_path()).await.unwrap();
        let text = String::from_utf8(content).unwrap();
        assert!(text.contains("10.0.0.2"));
        assert!(text.starts_with(r#"{"records":"#));
    }

    #[tokio::test]
    async fn test_requested_version_used() {
        let dir = tempdir().unwrap();
        let publisher = publisher(dir.path());

        let outcome = publisher
            .publish(&[placement("a", 0, "10.0.0.1")], Some(42))
            .await
            .unwrap();

        assert_eq!(outcome.snapshot().version, 42);
    }

    #[tokio::test]
    async fn test_encoder_failure_writes_nothing() {
        let dir = tempdir().unwrap();
        let publisher = publisher(dir.path());

        let mut bad = placement("a", 0, "10.0.0.1");
        bad.az = Some("z7".to_string());

        assert!(publisher.publish(&[bad], None).await.is_err());
        assert!(publisher.published().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exhausted_version_is_error() {
        let dir = tempdir().unwrap();
        let publisher = publisher(dir.path());

        tokio::fs::create_dir_all(publisher.output_path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(publisher.output_path(), r#"{"version":18446744073709551615}"#)
            .await
            .unwrap();

        let result = publisher.publish(&[placement("a", 0, "10.0.0.1")], None).await;
        assert!(result.is_err());

        let on_disk = publisher.published().await.unwrap().unwrap();
        assert_eq!(on_disk.version, u64::MAX);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_replaced() {
        let dir = tempdir().unwrap();
        let publisher = publisher(dir.path());

        tokio::fs::create_dir_all(publisher.output_path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(publisher.output_path(), r#"{"records":["#)
            .await
            .unwrap();

        assert!(publisher.published().await.unwrap().is_none());

        let outcome = publisher
            .publish(&[placement("a", 0, "10.0.0.1")], None)
            .await
            .unwrap();
        assert!(matches!(outcome, PublishOutcome::Published { ref snapshot, .. } if snapshot.version == 1));

        let on_disk = publisher.published().await.unwrap().unwrap();
        assert_eq!(&on_disk, outcome.snapshot());
    }

    #[tokio::test]
    async fn test_load_placements() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("placements.json");
        let placements = vec![placement("a", 0, "10.0.0.1"), placement("b", 1, "10.0.0.2")];

        tokio::fs::write(&path, serde_json::to_vec(&placements).unwrap())
            .await
            .unwrap();

        assert_eq!(load_placements(&path).await.unwrap(), placements);
    }
}
