//! Account-linking core: candidate discovery, primary selection, metadata
//! merge, and link execution.
//!
//! The steps compose sequentially (Discover → Select → Merge → Link) with
//! each step returning a `Result`; [`linker::AccountLinker`] drives them.

pub mod candidates;
pub mod linker;
pub mod merge;
pub mod select;

pub use candidates::find_link_candidates;
pub use linker::{AccountLinker, DirectoryFailurePolicy, LinkOutcome, LinkerOptions};
pub use merge::{merge_metadata, MergeOptions};
pub use select::{select_primary, PrimarySelectionPolicy, Selection};
