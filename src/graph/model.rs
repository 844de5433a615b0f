//! RDF-style triple model
//!
//! Two namespaces carry the data: the local ontology (`ex:`) for entity nodes,
//! their types and the link predicate, and Wikidata (`wd:`) for resolved items.

use crate::resolver::node_local_name;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

pub const EX_NAMESPACE: &str = "http://example.org/";
pub const WD_NAMESPACE: &str = "http://www.wikidata.org/entity/";
pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Local name of the predicate linking a node to its Wikidata item
pub const LINK_PREDICATE: &str = "wikidataEntity";

/// An absolute IRI
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `rdf:type`
    pub fn rdf_type() -> Self {
        Self(format!("{}type", RDF_NAMESPACE))
    }

    /// Node for a mention; identical normalized text gives the identical node
    pub fn entity_node(mention_text: &str) -> Self {
        Self(format!("{}{}", EX_NAMESPACE, node_local_name(mention_text)))
    }

    /// Local ontology class for an extraction label
    pub fn entity_type(label: &str) -> Self {
        Self(format!("{}{}", EX_NAMESPACE, urlencoding::encode(label.trim())))
    }

    pub fn link_predicate() -> Self {
        Self(format!("{}{}", EX_NAMESPACE, LINK_PREDICATE))
    }

    pub fn wikidata_entity(identifier: &str) -> Self {
        Self(format!("{}{}", WD_NAMESPACE, urlencoding::encode(identifier)))
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// A (subject, predicate, object) statement
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Triple {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Iri,
}

impl Triple {
    pub fn new(subject: Iri, predicate: Iri, object: Iri) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Set of triples; inserting a duplicate is a no-op
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputGraph {
    triples: BTreeSet<Triple>,
}

impl OutputGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the triple was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn add(&mut self, subject: Iri, predicate: Iri, object: Iri) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Triples in subject, predicate, object order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Distinct subjects, in order
    pub fn subjects(&self) -> Vec<&Iri> {
        let mut subjects: Vec<&Iri> = self.triples.iter().map(|t| &t.subject).collect();
        subjects.dedup();
        subjects
    }

    pub fn objects<'a>(
        &'a self,
        subject: &'a Iri,
        predicate: &'a Iri,
    ) -> impl Iterator<Item = &'a Iri> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn subjects_of_type(&self, class: &Iri) -> Vec<&Iri> {
        let rdf_type = Iri::rdf_type();
        self.triples
            .iter()
            .filter(|t| t.predicate == rdf_type && &t.object == class)
            .map(|t| &t.subject)
            .collect()
    }

    /// Number of nodes carrying a Wikidata link
    pub fn linked_count(&self) -> usize {
        let link = Iri::link_predicate();
        let mut linked: Vec<&Iri> = self
            .triples
            .iter()
            .filter(|t| t.predicate == link)
            .map(|t| &t.subject)
            .collect();
        linked.dedup();
        linked.len()
    }
}

impl<'a> IntoIterator for &'a OutputGraph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
