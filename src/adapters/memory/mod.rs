//! In-memory adapters for tests and offline simulation.

pub mod clock;
pub mod directory;
pub mod notifier;
pub mod profile_sync;

pub use clock::FixedClock;
pub use directory::{DirectoryCall, MemoryDirectory};
pub use notifier::CapturingNotifier;
pub use profile_sync::CapturingProfileSync;
