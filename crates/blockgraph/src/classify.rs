//! Classification of dependency types into blocking and non-blocking.
//!
//! Blocking dependencies affect readiness and count toward transitive
//! blocking totals. Everything else, including tags this crate does not
//! recognize, is informational and never blocks.

use crate::domain::DependencyType;

/// The dependency types that block work.
pub const BLOCKING_TYPES: [DependencyType; 4] = [
    DependencyType::Blocks,
    DependencyType::ParentChild,
    DependencyType::ConditionalBlocks,
    DependencyType::WaitsFor,
];

/// Returns `true` iff `dep_type` is one of [`BLOCKING_TYPES`].
///
/// Custom tags never hold a known tag, so they are always non-blocking.
#[must_use]
pub fn is_blocking(dep_type: &DependencyType) -> bool {
    BLOCKING_TYPES.contains(dep_type)
}
