pub mod resolver;
pub mod syntax;

// Re-exports so other crates can just use `css::...` nicely.
pub use resolver::{all_declared_properties, resolve};
pub use syntax::{Declaration, Rule, Stylesheet, parse_declarations, parse_stylesheet};
