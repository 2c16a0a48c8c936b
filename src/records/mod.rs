//! Record Set Module
//!
//! Accumulates instance placements into a versioned DNS record set and
//! produces its canonical serialized form and fingerprint.
//!
//! ## Lifecycle
//!
//! - `DnsRecordSet`: mutable builder, one per snapshot build
//! - `DnsSnapshot`: frozen result of `DnsRecordSet::finalize`

mod set;
mod snapshot;

pub use set::DnsRecordSet;
pub use snapshot::DnsSnapshot;

use crate::encoder::EncodeError;

#[derive(Debug, thiserror::Error)]
pub enum RecordSetError {
    #[error("AZ encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
