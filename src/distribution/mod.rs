//! Distribution Module
//!
//! Publishes DNS snapshots to a local records file for agents to pick up.
//! A new file is written only when the snapshot fingerprint changes:
//! - Unchanged placements keep the published version
//! - Changed placements bump the version by one

pub mod publisher;

pub use publisher::{
    load_placements, run_periodic_publication, PublishOutcome, PublishedSnapshot,
    SnapshotPublisher,
};
