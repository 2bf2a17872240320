pub mod apply;
pub mod target;

// Re-exports so other crates can just use `reconcile::...` nicely.
pub use apply::apply_target;
pub use target::{Change, Outcome, Strategy, Target, TargetReport};
