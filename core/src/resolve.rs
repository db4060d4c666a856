use crate::graph::Graph;

/// Maps free-text input to a canonical node name.
///
/// `None` means no such node. Implementations may consult anything (the graph
/// itself, a search service, a helper program); the engine only sees the
/// returned name.
pub trait Resolver {
    fn resolve(&self, query: &str) -> Option<String>;
}

/// Resolves against the loaded node names using page-title conventions:
/// exact match, then spaces as underscores, then a capitalized first letter.
pub struct TitleResolver<'g> {
    graph: &'g Graph,
}

impl<'g> TitleResolver<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }
}

impl Resolver for TitleResolver<'_> {
    fn resolve(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let underscored = query.replace(' ', "_");
        let mut chars = underscored.chars();
        let capitalized = chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect::<String>())
            .unwrap_or_default();

        [query.to_string(), underscored, capitalized]
            .into_iter()
            .find(|candidate| self.graph.id_of(candidate).is_some())
    }
}
