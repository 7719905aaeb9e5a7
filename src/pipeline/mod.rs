//! Pure data steps of an update cycle: label normalization, table
//! extraction, override merging, CSV snapshots and change detection.

pub mod assemble;
pub mod diff;
pub mod extract;
pub mod merge;
pub mod normalize;
pub mod snapshot;
