use css::Stylesheet;
use dom::Tree;
use thiserror::Error;

/// Failure while materializing a document or stylesheet model.
/// Fatal to a repair session: without both models there is nothing to
/// reconcile, so no targets run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to parse {url}: {reason}")]
    Parse { url: String, reason: String },
    #[error("no stylesheet link matching {hint:?} in {url}")]
    MissingStylesheet { url: String, hint: String },
}

/// External collaborator that fetches and parses documents and stylesheets
/// into the in-memory models the engine operates on. The engine never touches
/// the network or a global document handle itself.
pub trait DocumentLoader {
    fn load(&self, url: &str) -> Result<Tree, LoadError>;

    fn load_stylesheet(&self, url: &str) -> Result<Stylesheet, LoadError>;

    /// Resolves a stylesheet href found in a document against that document's
    /// URL. The default keeps the href as-is, which suits in-memory loaders.
    fn resolve_href(&self, _base: &str, href: &str) -> String {
        href.to_string()
    }
}
