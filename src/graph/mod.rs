//! Output graph: triples, assembly from mentions, Turtle serialization

pub mod assembler;
pub mod model;
pub mod turtle;

pub use assembler::GraphAssembler;
pub use model::{Iri, OutputGraph, Triple};
