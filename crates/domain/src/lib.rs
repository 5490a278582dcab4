//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod directory;
mod governance;
mod search;

pub use directory::{ApplicationRef, GroupRef, Resolution};
pub use governance::{
    AccessPackage, AccessPackageSummary, OriginSystem, ResourceRoleScope, ResourceScope,
};
pub use search::{MatchRecord, NOT_AVAILABLE, SearchCriterion, SearchType};
