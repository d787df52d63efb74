//! The three-stage feed pipeline.
//!
//! Stages compose in sequence on the same [`Document`] shape:
//! aggregate → (optional) enrich → (optional) transform.
//!
//! [`Document`]: crate::document::Document

pub mod detail;
pub mod equipment;
pub mod paginate;

pub use detail::enrich;
pub use equipment::{transform, transform_fields, Equipment};
pub use paginate::aggregate;

/// Pipeline stage identifiers, used when applying stage hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Paginated retrieval and merge.
    Aggregate,
    /// Per-ad detail enrichment.
    Enrich,
    /// Field-to-equipment normalization.
    Transform,
}
