//! Tokenizer and event-based parser for the SSE notation.
//!
//! SSE is the Lisp-like S-expression syntax used to write RDF terms and
//! SPARQL-algebra-shaped structures: nested parenthesized lists of
//! symbols, IRIs, prefixed names, variables, blank nodes, and literals.
//!
//! This crate covers the surface syntax only. It lexes source text and
//! drives a [`ParseSink`] with a well-nested stream of [`Event`]s; tree
//! construction and `base`/`prefix` scoping live in `sse-tree`.

mod event;
mod lexer;
mod location;
mod parser;
mod token;

pub use event::{DatatypeRef, Event, ParseError, ParseSink, SyntaxError, SyntaxErrorKind};
pub use lexer::{classify_number, Lexer};
pub use location::Location;
pub use parser::Parser;
pub use token::{Token, TokenKind};
