pub mod loader;
pub mod session;
pub mod targets;

// Re-exports so other crates can just use `session::...` nicely.
pub use loader::{DocumentLoader, LoadError};
pub use session::{RepairOutcome, RepairSession, SessionConfig, SessionReport};
pub use targets::default_targets;
