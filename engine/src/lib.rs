//! # Logbook Engine
//!
//! A deterministic merge engine for flight logbook replicas.
//!
//! This crate holds everything about reconciliation that does not touch I/O:
//! the record model, the strategies that decide how two lists combine, the
//! duplicate detector and the manifest arithmetic used by a remote sync.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of files, network, or storage
//! - **Deterministic**: Same inputs always produce same outputs
//! - **Total**: Merging and duplicate detection never fail
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`FlightRecord`] carries a stable integer id ([`UNASSIGNED_ID`] until
//! one is allocated), its time window, descriptive fields, a last-modified
//! timestamp and an "unknown to server" flag.
//!
//! ### Strategies
//!
//! [`merge_lists`] is generic over three strategies:
//! - [`CompareStrategy`] - are two items the same logical item?
//! - [`MergeStrategy`] - combine a matched (incoming, existing) pair
//! - [`IdStrategy`] - give unmatched items a collision-free id
//!
//! Closures work for the first two.
//!
//! ### Manifests
//!
//! A [`Manifest`] lists `(id, timestamp)` pairs. [`TransferPlan::compute`]
//! turns a local and a remote manifest into the ids to pull and push, and a
//! [`Checksum`] tells whether two replicas are already identical.
//!
//! ## Quick Start
//!
//! ```rust
//! use logbook_engine::{
//!     merge_lists, FlightRecord, MergeOnto, NextFreeId, SameFlight, UNASSIGNED_ID,
//! };
//!
//! let logbook = vec![FlightRecord {
//!     id: 1,
//!     ..FlightRecord::new("EHAM", "EGLL", 36_000, 40_500)
//! }];
//! let imported = vec![FlightRecord {
//!     remarks: "ILS 27L".into(),
//!     ..FlightRecord::new("EHAM", "EGLL", 36_000, 40_500)
//! }];
//!
//! let mut ids = NextFreeId::for_lists(&logbook, &imported);
//! let merged = merge_lists(
//!     &logbook,
//!     &imported,
//!     &SameFlight::default(),
//!     &MergeOnto::default(),
//!     &mut ids,
//! );
//!
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].id, 1);
//! assert_eq!(merged[0].remarks, "ILS 27L");
//! assert_ne!(merged[0].id, UNASSIGNED_ID);
//! ```

pub mod checksum;
pub mod compare;
pub mod duplicates;
pub mod error;
pub mod ids;
pub mod manifest;
pub mod merge;
pub mod reconcile;
pub mod record;
pub mod snapshot;

// Re-export main types at crate root
pub use checksum::Checksum;
pub use compare::{CompareStrategy, ContentMatch, ExactMatch, SameFlight};
pub use duplicates::{find_duplicates, split_duplicates};
pub use error::Error;
pub use ids::{IdStrategy, Identified, NextFreeId};
pub use manifest::{Manifest, ManifestEntry, TransferPlan};
pub use merge::{KeepId, MergeOnto, MergeStrategy};
pub use reconcile::{merge_lists, Reconciler};
pub use record::FlightRecord;
pub use snapshot::{parse_flights, LogbookSnapshot, SNAPSHOT_FORMAT_VERSION};

/// Type aliases for clarity
pub type RecordId = i64;
pub type Timestamp = i64;

/// Identifier of a record that has not been given one yet.
pub const UNASSIGNED_ID: RecordId = -1;
