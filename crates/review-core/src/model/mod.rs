//! Result model: builds, test modules and needle references
//!
//! Raw records from the fetch collaborator are validated once by
//! [`Build::load`] and never mutated afterwards.

mod build_id;
mod outcome;
mod raw;
mod types;

pub use build_id::BuildId;
pub use outcome::Outcome;
pub use raw::{RawBuild, RawId, RawModule, RawNeedle};
pub use types::{Build, BuildKey, NeedleRef, TestModule};
