//! RDF term model and name resolution for SSE.
//!
//! This crate provides the atoms the SSE tree wraps (IRIs, blank nodes,
//! variables, and literals) together with the two pieces of lexical
//! scoping machinery the parser needs: functionally composed prefix
//! mappings and base-IRI resolution.

mod prefix;
mod resolver;
mod term;
pub mod xsd;

pub use prefix::PrefixMap;
pub use resolver::{IriResolver, ResolveError};
pub use term::{escape_lexical, BlankId, Literal, Term};
