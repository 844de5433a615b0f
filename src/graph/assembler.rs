//! GraphAssembler - mentions to typed, optionally linked nodes
//!
//! Each mention contributes one type triple and, when the resolver finds an
//! identifier, one link triple. Unresolved mentions keep their node, unlinked.

use super::model::{Iri, OutputGraph};
use crate::extraction::EntityMention;
use crate::resolver::EntityResolver;
use std::sync::Arc;

pub struct GraphAssembler {
    resolver: Arc<EntityResolver>,
}

impl GraphAssembler {
    pub fn new(resolver: Arc<EntityResolver>) -> Self {
        Self { resolver }
    }

    /// Build the graph, resolving mentions one at a time in input order
    pub async fn assemble(&self, mentions: &[EntityMention]) -> OutputGraph {
        let mut graph = OutputGraph::new();

        for mention in mentions {
            let node = Iri::entity_node(&mention.text);
            graph.add(node.clone(), Iri::rdf_type(), Iri::entity_type(&mention.label));

            match self.resolver.resolve(&mention.text).await {
                Some(identifier) => {
                    graph.add(
                        node,
                        Iri::link_predicate(),
                        Iri::wikidata_entity(&identifier),
                    );
                }
                None => {
                    tracing::debug!(mention = %mention.text.trim(), "Mention left unlinked");
                }
            }
        }

        tracing::info!(
            mentions = mentions.len(),
            triples = graph.len(),
            linked = graph.linked_count(),
            "Graph assembled"
        );
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::error::SearchError;
    use crate::resolver::{EntitySearch, ResolutionCache};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixedSearch(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl EntitySearch for FixedSearch {
        async fn search(&self, text: &str) -> Result<Option<String>, SearchError> {
            Ok(self.0.get(text).map(|id| id.to_string()))
        }
    }

    fn assembler(known: &[(&'static str, &'static str)]) -> GraphAssembler {
        let resolver = EntityResolver::new(
            Arc::new(FixedSearch(known.iter().copied().collect())),
            Arc::new(ResolutionCache::new(16)),
            ResolverConfig::default(),
        );
        GraphAssembler::new(Arc::new(resolver))
    }

    #[tokio::test]
    async fn test_resolved_mention_is_typed_and_linked() {
        let assembler = assembler(&[("Dostoevsky", "Q192724")]);
        let graph = assembler
            .assemble(&[EntityMention::new("Dostoevsky", "PERSON", 0, 10)])
            .await;

        let node = Iri::entity_node("Dostoevsky");
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.subjects_of_type(&Iri::entity_type("PERSON")), vec![&node]);
        let link = Iri::link_predicate();
        let linked: Vec<&Iri> = graph.objects(&node, &link).collect();
        assert_eq!(linked, vec![&Iri::wikidata_entity("Q192724")]);
    }

    #[tokio::test]
    async fn test_unresolved_mention_keeps_type_only() {
        let assembler = assembler(&[]);
        let graph = assembler
            .assemble(&[EntityMention::new("Rogozhin", "MISC", 4, 12)])
            .await;

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.linked_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_gives_empty_graph() {
        let assembler = assembler(&[]);
        assert!(assembler.assemble(&[]).await.is_empty());
    }
}
