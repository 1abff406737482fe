//! Target documents the merge engine writes into.
//!
//! The engine only needs a page count, a way to reach a page, and a way to
//! append an annotation record to it. It never reads annotations that are
//! already present.

pub mod lopdf_target;
pub mod memory;

pub use lopdf_target::{LopdfPage, LopdfTarget};
pub use memory::{MemoryPage, MemoryTarget};

use crate::error::Result;
use crate::merge::AnnotationRecord;

/// A page that accepts new annotations
pub trait PageHandle {
    fn add_annotation(&mut self, record: &AnnotationRecord) -> Result<()>;
}

/// Document-level access for one merge
pub trait DocumentAdapter {
    type Page<'a>: PageHandle
    where
        Self: 'a;

    fn page_count(&self) -> u32;

    /// One-based page lookup
    fn page(&mut self, number: u32) -> Result<Self::Page<'_>>;

    /// Called once per merge before the first record is committed. Record ids
    /// restart at zero in every session, so adapters that map them to their
    /// own identifiers reset that mapping here.
    fn begin_merge(&mut self) {}
}
