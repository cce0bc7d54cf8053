//! Live adapters backed by real services.

pub mod clock;
pub mod directory;
pub mod notifier;
pub mod profile_sync;
pub mod token;

pub use clock::LiveClock;
pub use directory::LiveDirectory;
pub use notifier::WebhookNotifier;
pub use profile_sync::JsonRpcProfileSync;
pub use token::TokenSource;
