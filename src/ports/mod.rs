//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the rule pipeline and an
//! external system (time, the user directory, the notification sink, the
//! downstream profile endpoint). Implementations live in `src/adapters/`.

pub mod clock;
pub mod directory;
pub mod notifier;
pub mod profile_sync;

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

/// Boxed future type alias used by the async ports to keep the traits
/// dyn-compatible.
pub type PortFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

pub use clock::Clock;
pub use directory::{LinkDirective, UserDirectory};
pub use notifier::Notifier;
pub use profile_sync::ProfileSync;
