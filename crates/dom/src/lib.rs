pub mod dom_utils;
pub mod parser;
pub mod selector;
pub mod types;

// Re-exports so other crates can just use `dom::...` nicely.
pub use dom_utils::{collect_stylesheet_hrefs, query_selector, query_selector_all};
pub use parser::parse_document;
pub use selector::Selector;
pub use types::{NodeData, NodeId, NodeKind, Tree};
